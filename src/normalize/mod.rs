// Normalize module - scalar conversions shared by every command family

pub mod duration;

pub use duration::{parse_duration, try_parse_duration};

use crate::error::ScalarError;

/// Parse a device counter emitted as a decimal string.
///
/// Surrounding whitespace is ignored and an empty string is zero.
pub fn try_str_int(value: &str) -> Result<i64, ScalarError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    trimmed
        .parse::<i64>()
        .map_err(|_| ScalarError::InvalidInteger {
            value: value.to_string(),
        })
}

/// Total form of [`try_str_int`]: anything unparseable becomes zero.
pub fn str_int(value: &str) -> i64 {
    try_str_int(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_int_decimal() {
        assert_eq!(str_int("0"), 0);
        assert_eq!(str_int("42"), 42);
        assert_eq!(str_int("-17"), -17);
        assert_eq!(str_int("9223372036854775807"), i64::MAX);
    }

    #[test]
    fn test_str_int_trims_whitespace() {
        assert_eq!(str_int("  12\t"), 12);
        assert_eq!(try_str_int(" \n "), Ok(0));
    }

    #[test]
    fn test_str_int_empty_is_zero() {
        assert_eq!(try_str_int(""), Ok(0));
    }

    #[test]
    fn test_str_int_rejects_garbage() {
        assert_eq!(str_int("abc"), 0);
        assert_eq!(
            try_str_int("abc"),
            Err(ScalarError::InvalidInteger {
                value: "abc".to_string()
            })
        );
        assert!(try_str_int("1.5").is_err());
        assert!(try_str_int("99999999999999999999").is_err());
    }
}
