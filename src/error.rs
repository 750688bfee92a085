// Error types for decoding NX-API command responses

use thiserror::Error;

/// Fatal decode failure. No envelope is produced when this is returned.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed payload at byte {offset} (line {line}, column {column}): {message}")]
    Json {
        offset: usize,
        line: usize,
        column: usize,
        message: String,
        eof: bool,
    },

    #[error("failed to read payload: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using DecodeError
pub type DecodeResult<T> = Result<T, DecodeError>;

impl DecodeError {
    /// Build a decode error from a serde_json failure, translating its
    /// line/column position into a byte offset within `input`.
    pub(crate) fn from_json(err: serde_json::Error, input: &[u8], skipped: usize) -> Self {
        if err.is_io() {
            return DecodeError::Io(std::io::Error::other(err.to_string()));
        }

        let line = err.line();
        let column = err.column();
        let offset = skipped + byte_offset(&input[skipped..], line, column);

        // serde_json appends " at line X column Y" to Display; keep the bare message
        let full = err.to_string();
        let message = match full.rfind(" at line ") {
            Some(idx) => full[..idx].to_string(),
            None => full,
        };

        DecodeError::Json {
            offset,
            line,
            column,
            message,
            eof: err.is_eof(),
        }
    }

    /// Byte offset of the failure, when the failure has a position
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::Json { offset, .. } => Some(*offset),
            DecodeError::Io(_) => None,
        }
    }

    /// True when the document ended before it was complete
    pub fn is_eof(&self) -> bool {
        matches!(self, DecodeError::Json { eof: true, .. })
    }

    /// Short message suitable for showing to an operator
    pub fn user_message(&self) -> String {
        match self {
            DecodeError::Json { eof: true, .. } => {
                "Payload ended unexpectedly. The device response was truncated.".to_string()
            }
            DecodeError::Json { .. } => {
                "Payload is not a well-formed NX-API response.".to_string()
            }
            DecodeError::Io(_) => "Failed to read the payload stream.".to_string(),
        }
    }
}

/// Non-fatal failure of a scalar normalizer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScalarError {
    #[error("'{value}' is not a decimal integer")]
    InvalidInteger { value: String },

    #[error("'{value}' is not an ISO-8601 duration: {reason}")]
    InvalidDuration { value: String, reason: &'static str },
}

/// A command family name that matches no supported family
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown command family '{0}', expected one of bgp-sessions, ip-arp, ip-route")]
pub struct UnknownFamily(pub String);

// serde_json reports 1-based lines and columns; column 0 means "no position"
fn byte_offset(input: &[u8], line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }

    let mut line_start = 0;
    let mut current = 1;
    for (idx, byte) in input.iter().enumerate() {
        if current == line {
            break;
        }
        if *byte == b'\n' {
            current += 1;
            line_start = idx + 1;
        }
    }

    (line_start + column.saturating_sub(1)).min(input.len())
}
