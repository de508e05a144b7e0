//! Error types for rpcdisp
//!
//! Two layers of errors live here:
//!
//! - **Error**: the Rust-side error a method body (or the engine) produces,
//!   derived with thiserror and used with `?`
//! - **JsonRpcErrorData**: the wire-format `error` member of a JSON-RPC 2.0
//!   response
//!
//! # Standard Error Codes
//!
//! - `-32700`: Parse error (payload is not valid JSON)
//! - `-32600`: Invalid Request (payload is not a JSON-RPC 2.0 request shape)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000`: Server error (an uncaught fault inside a method body)
//!
//! # Mapping Method Errors
//!
//! When a method body returns `Err(error)`, the dispatcher decides the
//! response from the variant:
//!
//! - `Error::JsonRpc(data)` passes through with the method's own code,
//!   message and data
//! - `Error::InvalidParams(msg)` becomes `-32602`
//! - `Error::Cancelled` is never turned into a response; dispatch returns it
//! - anything else is a fault and becomes `-32000` with `"{kind}: {message}"`
//!
//! # Examples
//!
//! ```rust
//! use rpcdisp_core::{Error, JsonRpcErrorData};
//!
//! let error = Error::Internal("cache unavailable".into());
//! assert_eq!(error.kind(), "Internal");
//!
//! let wire = JsonRpcErrorData::method_not_found();
//! assert_eq!(wire.code, -32601);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parse error: invalid JSON was received
pub const PARSE_ERROR: i32 = -32700;
/// Invalid Request: the JSON sent is not a valid Request object
pub const INVALID_REQUEST: i32 = -32600;
/// Method not found
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameter(s)
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error
pub const INTERNAL_ERROR: i32 = -32603;
/// Start of the implementation-defined server error range
pub const SERVER_ERROR: i32 = -32000;

/// Result type for rpcdisp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by method bodies and the engine
///
/// Method implementations return `Result<_, Error>` and use `?` freely. The
/// dispatcher maps each variant to a JSON-RPC response (see the module docs),
/// so a method never has to build wire errors by hand unless it wants a
/// custom code.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A method-declared error with a caller-chosen code, message and data
    ///
    /// Passes through to the wire unchanged.
    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] JsonRpcErrorData),

    /// Serialization or deserialization failure
    ///
    /// Raised for example when a method's return value cannot be turned into
    /// JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The arguments were structurally bound but rejected by the method body
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Unexpected condition inside a method body
    #[error("Internal error: {0}")]
    Internal(String),

    /// Any other host fault, tagged with the kind of fault
    #[error("{kind}: {message}")]
    Fault {
        /// Short name of the fault class, e.g. `"io"` or `"ZeroDivision"`
        kind: String,
        /// Human-readable description
        message: String,
    },

    /// The surrounding scheduler cancelled the method while it was suspended
    ///
    /// Dispatch propagates this out unchanged; it is never converted to a
    /// response.
    #[error("Cancelled")]
    Cancelled,
}

impl Error {
    /// Build a fault from any displayable error, naming its kind explicitly
    pub fn fault(kind: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Error::Fault {
            kind: kind.into(),
            message: message.to_string(),
        }
    }

    /// Name of the fault class, used in Server error diagnostics
    pub fn kind(&self) -> &str {
        match self {
            Error::JsonRpc(_) => "JsonRpc",
            Error::Serialization(_) => "Serialization",
            Error::InvalidParams(_) => "InvalidParams",
            Error::Internal(_) => "Internal",
            Error::Fault { kind, .. } => kind,
            Error::Cancelled => "Cancelled",
        }
    }

    /// The fault description without the kind prefix
    pub fn message(&self) -> String {
        match self {
            Error::JsonRpc(data) => data.message.clone(),
            Error::Serialization(msg) | Error::InvalidParams(msg) | Error::Internal(msg) => {
                msg.clone()
            }
            Error::Fault { message, .. } => message.clone(),
            Error::Cancelled => "Cancelled".to_string(),
        }
    }

    /// True for a scheduler-issued cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::fault("io", err)
    }
}

/// JSON-RPC 2.0 error object as it appears on the wire
///
/// `data` is optional and omitted from the JSON when absent. Custom
/// application errors may use any code; the reserved range is not enforced
/// (see [`JsonRpcErrorData::is_reserved_code`]).
///
/// # Examples
///
/// ```rust
/// use rpcdisp_core::JsonRpcErrorData;
/// use serde_json::json;
///
/// let custom = JsonRpcErrorData::with_data(
///     1001,
///     "Insufficient funds",
///     json!({"balance": 50, "required": 100}),
/// );
/// assert!(!custom.is_reserved_code());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// Numeric error code
    pub code: i32,

    /// Short description of the error
    pub message: String,

    /// Optional additional information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcErrorData {
    /// Create an error with code and message, no data
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error carrying additional data
    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Attach (or replace) the data member
    pub fn data(mut self, data: impl Into<serde_json::Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Drop the data member
    pub fn without_data(mut self) -> Self {
        self.data = None;
        self
    }

    /// Parse error (-32700)
    pub fn parse_error() -> Self {
        Self::new(PARSE_ERROR, "Parse error")
    }

    /// Invalid Request (-32600)
    pub fn invalid_request() -> Self {
        Self::new(INVALID_REQUEST, "Invalid Request")
    }

    /// Method not found (-32601)
    pub fn method_not_found() -> Self {
        Self::new(METHOD_NOT_FOUND, "Method not found")
    }

    /// Invalid params (-32602)
    pub fn invalid_params() -> Self {
        Self::new(INVALID_PARAMS, "Invalid params")
    }

    /// Internal error (-32603)
    pub fn internal_error() -> Self {
        Self::new(INTERNAL_ERROR, "Internal error")
    }

    /// Server error (-32000), used for uncaught method faults
    pub fn server_error() -> Self {
        Self::new(SERVER_ERROR, "Server error")
    }

    /// Whether `code` falls in the range JSON-RPC 2.0 reserves for itself
    /// (-32768 to -32000 inclusive)
    pub fn is_reserved_code(&self) -> bool {
        (-32768..=-32000).contains(&self.code)
    }
}

impl std::fmt::Display for JsonRpcErrorData {
    /// Formats as "[code] message"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorData {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_jsonrpc_error_codes() {
        let errors = vec![
            (JsonRpcErrorData::parse_error(), -32700, "Parse error"),
            (JsonRpcErrorData::invalid_request(), -32600, "Invalid Request"),
            (JsonRpcErrorData::method_not_found(), -32601, "Method not found"),
            (JsonRpcErrorData::invalid_params(), -32602, "Invalid params"),
            (JsonRpcErrorData::internal_error(), -32603, "Internal error"),
            (JsonRpcErrorData::server_error(), -32000, "Server error"),
        ];

        for (error, code, message) in errors {
            assert_eq!(error.code, code);
            assert_eq!(error.message, message);
            assert!(error.data.is_none());
            assert!(error.is_reserved_code());
        }
    }

    #[test]
    fn test_error_without_data_omits_member() {
        let serialized = serde_json::to_string(&JsonRpcErrorData::parse_error()).unwrap();
        assert_eq!(serialized, r#"{"code":-32700,"message":"Parse error"}"#);
    }

    #[test]
    fn test_error_with_null_data_keeps_member() {
        let error = JsonRpcErrorData::internal_error().data(serde_json::Value::Null);
        let serialized = serde_json::to_string(&error).unwrap();
        assert!(serialized.contains(r#""data":null"#));
    }

    #[test]
    fn test_reserved_range() {
        assert!(JsonRpcErrorData::new(-32768, "x").is_reserved_code());
        assert!(!JsonRpcErrorData::new(-32769, "x").is_reserved_code());
        assert!(!JsonRpcErrorData::new(-31999, "x").is_reserved_code());
        assert!(!JsonRpcErrorData::new(42, "x").is_reserved_code());
    }

    #[test]
    fn test_jsonrpc_error_display() {
        let display = JsonRpcErrorData::method_not_found().to_string();
        assert_eq!(display, "[-32601] Method not found");
    }

    #[test]
    fn test_error_kind_and_message() {
        let fault = Error::fault("ZeroDivision", "division by zero");
        assert_eq!(fault.kind(), "ZeroDivision");
        assert_eq!(fault.message(), "division by zero");
        assert_eq!(fault.to_string(), "ZeroDivision: division by zero");

        let internal = Error::Internal("boom".into());
        assert_eq!(internal.kind(), "Internal");
        assert_eq!(internal.message(), "boom");
    }

    #[test]
    fn test_error_from_serde() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = serde_error.into();
        assert_eq!(error.kind(), "Serialization");
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        assert_eq!(error.kind(), "io");
        assert_eq!(error.message(), "file not found");
    }

    #[test]
    fn test_cancelled() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::Internal("x".into()).is_cancelled());
    }

    #[test]
    fn test_error_roundtrip_with_data() {
        let error = JsonRpcErrorData::with_data(-32000, "Test error", json!({"key": "value"}));
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: JsonRpcErrorData = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, error);
    }
}
