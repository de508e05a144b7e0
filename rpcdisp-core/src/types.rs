//! JSON-RPC 2.0 request and response model
//!
//! Incoming payloads are canonicalized into [`Request`] values: the method
//! name, normalized [`Params`], and an optional [`Id`]. A request without an
//! id is a *notification*; its outcome never reaches the wire.
//!
//! Outgoing data is a [`JsonRpcResponse`] (success or error) per request, and
//! a [`DispatchOutput`] for the whole call, which is either a single
//! response, an ordered batch of responses, or nothing at all.
//!
//! ```rust
//! use rpcdisp_core::{Id, JsonRpcResponse};
//! use serde_json::json;
//!
//! let response = JsonRpcResponse::success(json!("pong"), Id::from(1i64));
//! assert_eq!(
//!     serde_json::to_string(&response).unwrap(),
//!     r#"{"jsonrpc":"2.0","result":"pong","id":1}"#
//! );
//! ```

use crate::error::{JsonRpcErrorData, Result, INVALID_REQUEST, PARSE_ERROR};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Protocol version carried in every message
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request identifier
///
/// Any non-structured JSON value is accepted so that the echoed id is exactly
/// the one the client sent, including float and boolean ids.
///
/// ```rust
/// use rpcdisp_core::Id;
///
/// let id1: Id = "req-123".into();
/// let id2: Id = 42i64.into();
///
/// assert_eq!(id1.to_string(), "\"req-123\"");
/// assert_eq!(id2.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier
    String(String),
    /// Numeric identifier, kept as the original JSON number
    Number(Number),
    /// Boolean identifier
    Bool(bool),
    /// Null identifier; also used when the id could not be determined
    Null,
}

impl Id {
    /// Convert a JSON value into an id, refusing arrays and objects
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Id::String(s)),
            Value::Number(n) => Some(Id::Number(n)),
            Value::Bool(b) => Some(Id::Bool(b)),
            Value::Null => Some(Id::Null),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => {
                let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
                f.write_str(&quoted)
            }
            Id::Number(n) => write!(f, "{}", n),
            Id::Bool(b) => write!(f, "{}", b),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n.into())
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id::Number(n.into())
    }
}

/// Normalized request parameters
///
/// An absent `params` member becomes [`Params::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    /// No parameters were sent
    #[default]
    Empty,
    /// Positional parameters (`"params": [...]`)
    Array(Vec<Value>),
    /// Named parameters (`"params": {...}`)
    Object(Map<String, Value>),
}

impl Params {
    /// Number of parameters, positional or named
    pub fn len(&self) -> usize {
        match self {
            Params::Empty => 0,
            Params::Array(items) => items.len(),
            Params::Object(map) => map.len(),
        }
    }

    /// True when no parameters are present
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The parameters as they would appear on the wire
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Params::Empty => None,
            Params::Array(items) => Some(Value::Array(items.clone())),
            Params::Object(map) => Some(Value::Object(map.clone())),
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(items: Vec<Value>) -> Self {
        Params::Array(items)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Object(map)
    }
}

/// A canonicalized JSON-RPC 2.0 request
///
/// `id == None` marks a notification. An explicit `"id": null` is a regular
/// request whose response echoes `null`.
///
/// ```rust
/// use rpcdisp_core::{Id, Params, Request};
///
/// let req = Request::new("ping", Params::Empty, Id::from(1i64));
/// assert!(!req.is_notification());
///
/// let notif = Request::notification("log", Params::Empty);
/// assert!(notif.is_notification());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Name of the method to invoke
    pub method: String,
    /// Normalized parameters
    pub params: Params,
    /// Identifier to echo, or `None` for a notification
    pub id: Option<Id>,
}

impl Request {
    /// Create a request expecting a response
    pub fn new(method: impl Into<String>, params: impl Into<Params>, id: Id) -> Self {
        Self {
            method: method.into(),
            params: params.into(),
            id: Some(id),
        }
    }

    /// Create a notification (no id, no response)
    pub fn notification(method: impl Into<String>, params: impl Into<Params>) -> Self {
        Self {
            method: method.into(),
            params: params.into(),
            id: None,
        }
    }

    /// True if this request carries no id
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// True for names that begin and end with a double underscore
    ///
    /// Such names are internal-only and always resolve to "Method not found".
    pub fn is_reserved_method(&self) -> bool {
        is_reserved_method_name(&self.method)
    }
}

/// Whether a method name matches the reserved `__name__` pattern
pub fn is_reserved_method_name(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("__")
}

/// Successful response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Value returned by the method
    pub result: Value,
    /// Echoed request id
    pub id: Id,
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Error details
    pub error: JsonRpcErrorData,
    /// Echoed request id, or null when it could not be determined
    pub id: Id,
}

/// JSON-RPC 2.0 response for a single request
///
/// Serializes untagged, so each variant produces exactly the members the
/// protocol requires: `result` xor `error`, plus `jsonrpc` and `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcResponse {
    /// The method returned a result
    Success(SuccessResponse),
    /// The request failed
    Error(ErrorResponse),
}

impl JsonRpcResponse {
    /// Build a success response
    pub fn success(result: Value, id: Id) -> Self {
        JsonRpcResponse::Success(SuccessResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result,
            id,
        })
    }

    /// Build an error response
    pub fn error(error: JsonRpcErrorData, id: Id) -> Self {
        JsonRpcResponse::Error(ErrorResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            error,
            id,
        })
    }

    /// True for a success response
    pub fn is_success(&self) -> bool {
        matches!(self, JsonRpcResponse::Success(_))
    }

    /// True for an error response
    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcResponse::Error(_))
    }

    /// The echoed id
    pub fn id(&self) -> &Id {
        match self {
            JsonRpcResponse::Success(s) => &s.id,
            JsonRpcResponse::Error(e) => &e.id,
        }
    }

    /// The result value, if this is a success
    pub fn result(&self) -> Option<&Value> {
        match self {
            JsonRpcResponse::Success(s) => Some(&s.result),
            JsonRpcResponse::Error(_) => None,
        }
    }

    /// The error details, if this is an error
    pub fn error_data(&self) -> Option<&JsonRpcErrorData> {
        match self {
            JsonRpcResponse::Success(_) => None,
            JsonRpcResponse::Error(e) => Some(&e.error),
        }
    }
}

/// Outcome of one dispatch call
///
/// `NoResponse` means nothing goes on the wire: a notification, or a batch
/// consisting only of notifications. It is distinct from an empty batch,
/// which is never produced.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutput {
    /// Response to a single request
    Single(JsonRpcResponse),
    /// Ordered responses to a batch, notifications removed
    Batch(Vec<JsonRpcResponse>),
    /// Nothing to send
    NoResponse,
}

impl DispatchOutput {
    /// True when there is no wire output
    pub fn is_empty(&self) -> bool {
        matches!(self, DispatchOutput::NoResponse)
    }

    /// The canonical serializable form, or `None` for no output
    pub fn to_value(&self) -> Result<Option<Value>> {
        let value = match self {
            DispatchOutput::Single(response) => serde_json::to_value(response)?,
            DispatchOutput::Batch(responses) => serde_json::to_value(responses)?,
            DispatchOutput::NoResponse => return Ok(None),
        };
        Ok(Some(value))
    }

    /// Status code a transport would typically send with this output
    ///
    /// - no output: 204
    /// - a single Parse error or Invalid Request: 400
    /// - everything else, including other errors: 200
    pub fn http_status(&self) -> u16 {
        match self {
            DispatchOutput::NoResponse => 204,
            DispatchOutput::Single(JsonRpcResponse::Error(e))
                if e.error.code == PARSE_ERROR || e.error.code == INVALID_REQUEST =>
            {
                400
            }
            _ => 200,
        }
    }
}
