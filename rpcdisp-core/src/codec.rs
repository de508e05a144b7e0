//! Pluggable serialization for the dispatch entry point
//!
//! The engine works on `serde_json::Value` internally. A [`Codec`] turns raw
//! request text into a `Value` and a response `Value` back into text, so a
//! host can swap in its own (de)serializer, e.g. one that accepts comments or
//! emits pretty output, without touching dispatch.
//!
//! # Error Mapping
//!
//! A deserialize failure becomes a Parse error (`-32700`) at the entry point.
//! A serialize failure is reported as `Error::Serialization`; the entry point
//! answers it with an Internal error (`-32603`) and `id: null`.
//!
//! # Examples
//!
//! ```rust
//! use rpcdisp_core::codec::{Codec, JsonCodec};
//!
//! let codec = JsonCodec::default();
//! let value = codec.deserialize(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();
//! assert!(value.is_object());
//! assert!(codec.deserialize("{").is_err());
//! ```

use crate::error::{Error, Result};
use serde_json::Value;

/// Converts between wire text and JSON values
pub trait Codec: Send + Sync {
    /// Parse incoming text
    ///
    /// The error string is a human-readable reason, surfaced as the `data`
    /// of a Parse error when debug output is enabled.
    fn deserialize(&self, text: &str) -> std::result::Result<Value, String>;

    /// Render an outgoing value
    fn serialize(&self, value: &Value) -> Result<String>;
}

/// Default codec backed by `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    /// Emit indented output
    pub pretty: bool,
}

impl JsonCodec {
    /// Codec producing indented output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn deserialize(&self, text: &str) -> std::result::Result<Value, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    fn serialize(&self, value: &Value) -> Result<String> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Codec built from a pair of plain functions
///
/// ```rust
/// use rpcdisp_core::codec::{Codec, FnCodec};
///
/// let codec = FnCodec::new(
///     |text| serde_json::from_str(text.trim_start_matches('\u{feff}')).map_err(|e| e.to_string()),
///     |value| Ok(value.to_string()),
/// );
/// assert!(codec.deserialize("\u{feff}{}").is_ok());
/// ```
pub struct FnCodec<D, S>
where
    D: Fn(&str) -> std::result::Result<Value, String> + Send + Sync,
    S: Fn(&Value) -> Result<String> + Send + Sync,
{
    deserialize: D,
    serialize: S,
}

impl<D, S> FnCodec<D, S>
where
    D: Fn(&str) -> std::result::Result<Value, String> + Send + Sync,
    S: Fn(&Value) -> Result<String> + Send + Sync,
{
    /// Wrap a deserializer and a serializer
    pub fn new(deserialize: D, serialize: S) -> Self {
        Self {
            deserialize,
            serialize,
        }
    }
}

impl<D, S> Codec for FnCodec<D, S>
where
    D: Fn(&str) -> std::result::Result<Value, String> + Send + Sync,
    S: Fn(&Value) -> Result<String> + Send + Sync,
{
    fn deserialize(&self, text: &str) -> std::result::Result<Value, String> {
        (self.deserialize)(text)
    }

    fn serialize(&self, value: &Value) -> Result<String> {
        (self.serialize)(value)
    }
}
