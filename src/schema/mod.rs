// Schema module - the NX-API envelope shared by every command family
//
// {"ins_api": {"outputs": {"output": {"body": ..., "code", "input", "msg"}},
//              "sid", "type", "version"}}

pub mod de;
pub mod table;
pub mod warnings;

pub use de::LenientInt;
pub use table::{Table, TableRow};
pub use warnings::{RowPath, ScalarWarning, WarningSink};

use std::io::Read;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DecodeResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Body of one command family's response.
///
/// Implementors describe the nested `TABLE_x`/`ROW_x` layout (through their
/// `Deserialize` impl), how it flattens, and which scalars need checking.
pub trait Body: DeserializeOwned + Default {
    /// Flat record produced for every leaf row
    type Record: Serialize;

    /// The device command whose response this body describes
    const COMMAND: &'static str;

    /// Denormalize the body into leaf records, depth first in document order.
    fn flatten(&self) -> Vec<Self::Record>;

    /// Report every integer-as-string, duration, and integer field that
    /// does not normalize cleanly.
    fn scan(&self, sink: &mut WarningSink);
}

/// A decoded NX-API response together with its scalar warnings.
///
/// Built only by `from_bytes`, `from_reader` and `FromStr`, which always run
/// the body's warning scan. It has no `Deserialize` impl of its own.
#[derive(Debug, Clone, Default)]
pub struct Envelope<B> {
    pub ins_api: InsApi<B>,
    warnings: Vec<ScalarWarning>,
}

/// Top-level document as it arrives on the wire
#[derive(Deserialize)]
#[serde(bound(deserialize = "B: Body"))]
struct Document<B> {
    ins_api: InsApi<B>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(bound(deserialize = "B: Body"))]
pub struct InsApi<B> {
    pub outputs: Outputs<B>,
    #[serde(default, deserialize_with = "de::text")]
    pub sid: String,
    #[serde(default, rename = "type", deserialize_with = "de::text")]
    pub kind: String,
    #[serde(default, deserialize_with = "de::text")]
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(bound(deserialize = "B: Body"))]
pub struct Outputs<B> {
    pub output: Output<B>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(bound(deserialize = "B: Body"))]
pub struct Output<B> {
    #[serde(default, deserialize_with = "de::object_or_empty")]
    pub body: B,
    #[serde(default, deserialize_with = "de::text")]
    pub code: String,
    #[serde(default, deserialize_with = "de::text")]
    pub input: String,
    #[serde(default, deserialize_with = "de::text")]
    pub msg: String,
}

impl<B: Body> Envelope<B> {
    /// Decode a complete payload. A leading UTF-8 byte-order mark is skipped.
    pub fn from_bytes(bytes: &[u8]) -> DecodeResult<Self> {
        let skipped = if bytes.starts_with(UTF8_BOM) {
            UTF8_BOM.len()
        } else {
            0
        };

        let document: Document<B> = serde_json::from_slice(&bytes[skipped..])
            .map_err(|e| DecodeError::from_json(e, bytes, skipped))?;

        let mut sink = WarningSink::new();
        document.ins_api.outputs.output.body.scan(&mut sink);
        let envelope = Envelope {
            ins_api: document.ins_api,
            warnings: sink.into_warnings(),
        };

        tracing::debug!(
            command = B::COMMAND,
            bytes = bytes.len(),
            warnings = envelope.warnings.len(),
            "decoded NX-API response"
        );

        Ok(envelope)
    }

    /// Read `reader` to EOF, then decode.
    pub fn from_reader<R: Read>(mut reader: R) -> DecodeResult<Self> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    /// Flatten the body into leaf records. Repeated calls return equal results.
    pub fn flatten(&self) -> Vec<B::Record> {
        let records = self.body().flatten();
        tracing::debug!(
            command = B::COMMAND,
            records = records.len(),
            "flattened NX-API response"
        );
        records
    }

    pub fn output(&self) -> &Output<B> {
        &self.ins_api.outputs.output
    }

    pub fn body(&self) -> &B {
        &self.ins_api.outputs.output.body
    }

    pub fn warnings(&self) -> &[ScalarWarning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn code(&self) -> &str {
        &self.output().code
    }

    pub fn input(&self) -> &str {
        &self.output().input
    }

    pub fn msg(&self) -> &str {
        &self.output().msg
    }

    pub fn sid(&self) -> &str {
        &self.ins_api.sid
    }

    pub fn kind(&self) -> &str {
        &self.ins_api.kind
    }

    pub fn version(&self) -> &str {
        &self.ins_api.version
    }

    /// True when the device reported status code 200
    pub fn is_success(&self) -> bool {
        self.code().trim() == "200"
    }
}

impl<B: Body> FromStr for Envelope<B> {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}
