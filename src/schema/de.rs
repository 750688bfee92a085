// Lenient serde helpers shared by every NX-API schema
//
// The device is loose about scalar encodings: counters flip between JSON
// numbers and quoted strings across releases, booleans show up as text, and
// single-row tables drop the list brackets. These helpers absorb that.

use std::fmt;
use std::marker::PhantomData;

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Serialize, Serializer};

use crate::normalize::try_str_int;

/// Deserialize a string field that may also arrive as a number, a boolean,
/// or null. Integers keep their decimal rendering. Fractional numbers are
/// rendered in shortest round-trip form (`1.0` stays `1.0`, but `1.50`
/// becomes `1.5`), so the exact token is not preserved. Null becomes "".
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, number, boolean, or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            // Debug keeps the trailing ".0" that Display drops
            Ok(format!("{value:?}"))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

/// Deserialize an object that the device replaces with "" or null when it
/// has nothing to report (error replies carry `"body": ""`).
pub fn object_or_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    struct ObjectVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for ObjectVisitor<T>
    where
        T: Deserialize<'de> + Default,
    {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object, an empty string, or null")
        }

        fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            T::deserialize(MapAccessDeserializer::new(map))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if value.trim().is_empty() {
                Ok(T::default())
            } else {
                Err(E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(T::default())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(T::default())
        }
    }

    deserializer.deserialize_any(ObjectVisitor(PhantomData))
}

/// A `ROW_x` value: either a list of rows or one bare row object.
pub(crate) struct OneOrMany<T>(pub Vec<T>);

impl<'de, T> Deserialize<'de> for OneOrMany<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OneOrManyVisitor<T>(PhantomData<T>);

        impl<'de, T> Visitor<'de> for OneOrManyVisitor<T>
        where
            T: Deserialize<'de>,
        {
            type Value = OneOrMany<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a row object or a list of row objects")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut rows = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(row) = seq.next_element()? {
                    rows.push(row);
                }
                Ok(OneOrMany(rows))
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let row = T::deserialize(MapAccessDeserializer::new(map))?;
                Ok(OneOrMany(vec![row]))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(OneOrMany(Vec::new()))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(OneOrMany(Vec::new()))
            }
        }

        deserializer.deserialize_any(OneOrManyVisitor(PhantomData))
    }
}

/// Integer field that tolerates quoted numbers.
///
/// Values that cannot be read as an integer decode to zero and keep their
/// original text so the decoder can report them as warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LenientInt {
    value: i64,
    rejected: Option<String>,
}

impl LenientInt {
    pub fn new(value: i64) -> Self {
        LenientInt {
            value,
            rejected: None,
        }
    }

    pub fn get(&self) -> i64 {
        self.value
    }

    /// Original text of a value that failed to parse
    pub fn rejected(&self) -> Option<&str> {
        self.rejected.as_deref()
    }

    fn rejected_from(raw: impl Into<String>) -> Self {
        LenientInt {
            value: 0,
            rejected: Some(raw.into()),
        }
    }
}

impl From<i64> for LenientInt {
    fn from(value: i64) -> Self {
        LenientInt::new(value)
    }
}

impl Serialize for LenientInt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.value)
    }
}

impl<'de> Deserialize<'de> for LenientInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LenientIntVisitor;

        impl<'de> Visitor<'de> for LenientIntVisitor {
            type Value = LenientInt;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer or a quoted integer")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LenientInt::new(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(match i64::try_from(value) {
                    Ok(value) => LenientInt::new(value),
                    Err(_) => LenientInt::rejected_from(value.to_string()),
                })
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let integral = value.fract() == 0.0
                    && value >= i64::MIN as f64
                    && value < i64::MAX as f64;
                Ok(if integral {
                    LenientInt::new(value as i64)
                } else {
                    LenientInt::rejected_from(value.to_string())
                })
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(match try_str_int(value) {
                    Ok(parsed) => LenientInt::new(parsed),
                    Err(_) => LenientInt::rejected_from(value),
                })
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LenientInt::rejected_from(value.to_string()))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LenientInt::default())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(LenientInt::default())
            }
        }

        deserializer.deserialize_any(LenientIntVisitor)
    }
}

/// Skip a value of any shape.
pub(crate) fn skip<'de, A>(map: &mut A) -> Result<(), A::Error>
where
    A: MapAccess<'de>,
{
    map.next_value::<IgnoredAny>().map(|_| ())
}
