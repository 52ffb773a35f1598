//! Raw text to JSON document decoding.
//!
//! The parser never reads bytes itself; it asks a [`JsonDecoder`] for an
//! untyped document and validates that. Hosts needing a different JSON
//! dialect (comments, trailing commas, a faster parser) supply their own.

use serde_json::Value;

/// Turns request text into an untyped JSON document.
pub trait JsonDecoder: Send + Sync {
    /// Decode `text`, returning a human-readable message on failure.
    fn decode(&self, text: &str) -> Result<Value, String>;
}

/// Default decoder backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonDecoder;

impl JsonDecoder for SerdeJsonDecoder {
    fn decode(&self, text: &str) -> Result<Value, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }
}

impl<F> JsonDecoder for F
where
    F: Fn(&str) -> Result<Value, String> + Send + Sync,
{
    fn decode(&self, text: &str) -> Result<Value, String> {
        self(text)
    }
}
