// TABLE_x / ROW_x wrapper shared by every schema

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use super::de::{OneOrMany, skip};

/// A row type stored under a fixed `ROW_x` key of its `TABLE_x` object.
pub trait TableRow {
    /// The member name holding the rows, e.g. `ROW_vrf`
    const KEY: &'static str;
}

/// A `TABLE_x` object holding the rows of its `ROW_x` member.
///
/// The device omits a table entirely when it has no rows, and writes a bare
/// row object instead of a one-element list; both cases land here as a plain
/// `Vec`. Only the member named by `T::KEY` is read; every other member,
/// including unrelated `ROW_*` ones, is ignored. A list of table objects
/// concatenates their rows in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T> Table<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Table { rows }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table { rows: Vec::new() }
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<'de, T> Deserialize<'de> for Table<T>
where
    T: Deserialize<'de> + TableRow,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TableVisitor(PhantomData))
    }
}

struct TableVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for TableVisitor<T>
where
    T: Deserialize<'de> + TableRow,
{
    type Value = Table<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a TABLE object with a {} member", T::KEY)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut rows = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            if key == T::KEY {
                let OneOrMany(found) = map.next_value::<OneOrMany<T>>()?;
                rows.extend(found);
            } else {
                skip(&mut map)?;
            }
        }
        Ok(Table { rows })
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut rows = Vec::new();
        while let Some(table) = seq.next_element::<Table<T>>()? {
            rows.extend(table.rows);
        }
        Ok(Table { rows })
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if value.trim().is_empty() {
            Ok(Table::default())
        } else {
            Err(E::invalid_value(de::Unexpected::Str(value), &self))
        }
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Table::default())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Table::default())
    }
}
