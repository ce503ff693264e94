//! Text representations of element trees.
//!
//! Encoders are for presentation (export, CLI output, debugging). They are
//! not the storage format: stores serialize records themselves.

use crate::{Result, data::Properties};

/// Turns an element tree into text.
pub trait Encoder: Send + Sync {
    /// Encodes `data` as text.
    fn encode(&self, data: &Properties) -> Result<String>;

    /// Media type of the produced text.
    fn media_type(&self) -> &'static str;
}

/// JSON encoder backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    pretty: bool,
}

impl JsonEncoder {
    /// Compact, single-line output.
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Indented output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, data: &Properties) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(text)
    }

    fn media_type(&self) -> &'static str {
        "application/json"
    }
}
