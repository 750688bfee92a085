// Out-of-band warnings for scalars that failed to normalize

use std::fmt;

use serde::Serialize;

use super::de::LenientInt;
use crate::error::ScalarError;
use crate::normalize::{try_parse_duration, try_str_int};

/// A field whose value could not be normalized. The flattener substitutes
/// the zero value for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScalarWarning {
    /// Row chain leading to the offending row, e.g. `ROW_vrf[0].ROW_neighbor[2]`
    pub path: String,
    /// Device field name
    pub field: &'static str,
    /// Value as received
    pub value: String,
    #[serde(serialize_with = "error_text")]
    pub error: ScalarError,
}

impl fmt::Display for ScalarWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.field, self.error)
        } else {
            write!(f, "{}.{}: {}", self.path, self.field, self.error)
        }
    }
}

fn error_text<S>(error: &ScalarError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(error)
}

/// Position of a row in the decoded tree, as a chain of `(ROW_x, index)`.
#[derive(Debug, Clone, Default)]
pub struct RowPath {
    segments: Vec<(&'static str, usize)>,
}

impl RowPath {
    pub fn root() -> Self {
        RowPath::default()
    }

    pub fn child(&self, row: &'static str, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push((row, index));
        RowPath { segments }
    }
}

impl fmt::Display for RowPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (row, index)) in self.segments.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{row}[{index}]")?;
        }
        Ok(())
    }
}

/// Collects warnings while a schema checks its scalar fields.
#[derive(Debug, Default)]
pub struct WarningSink {
    warnings: Vec<ScalarWarning>,
}

impl WarningSink {
    pub fn new() -> Self {
        WarningSink::default()
    }

    /// Check an integer-as-string field.
    pub fn str_int(&mut self, path: &RowPath, field: &'static str, value: &str) {
        if let Err(error) = try_str_int(value) {
            self.push(path, field, value, error);
        }
    }

    /// Check an ISO-8601 duration field.
    pub fn duration(&mut self, path: &RowPath, field: &'static str, value: &str) {
        if let Err(error) = try_parse_duration(value) {
            self.push(path, field, value, error);
        }
    }

    /// Check a plain integer field that the decoder had to zero out.
    pub fn int(&mut self, path: &RowPath, field: &'static str, value: &LenientInt) {
        if let Some(raw) = value.rejected() {
            let error = ScalarError::InvalidInteger {
                value: raw.to_string(),
            };
            self.push(path, field, raw, error);
        }
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<ScalarWarning> {
        self.warnings
    }

    fn push(&mut self, path: &RowPath, field: &'static str, value: &str, error: ScalarError) {
        let warning = ScalarWarning {
            path: path.to_string(),
            field,
            value: value.to_string(),
            error,
        };
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}
