//! Structural validation and request construction
//!
//! [`validate`] checks a deserialized payload against the JSON-RPC 2.0 request
//! shape. It runs once over the whole payload: one malformed member of a
//! batch rejects the entire batch with a single Invalid Request error, rather
//! than producing an error per member.
//!
//! [`create_requests`] then turns a validated payload into [`Request`]
//! values, preserving batch order.

use crate::types::{Id, Params, Request};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reason a payload failed structural validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Top level is neither an object nor an array
    #[error("request must be an object or an array of objects")]
    NotAnObject,

    /// Top level is an empty array
    #[error("batch must contain at least one request")]
    EmptyBatch,

    /// A batch member is not an object
    #[error("batch member {index} is not an object")]
    BatchMemberNotAnObject { index: usize },

    /// `jsonrpc` member missing or not exactly "2.0"
    #[error("{at}: \"jsonrpc\" must be exactly \"2.0\"")]
    BadVersion { at: String },

    /// `method` member missing or not a string
    #[error("{at}: \"method\" must be a string")]
    BadMethod { at: String },

    /// `params` present but neither array nor object
    #[error("{at}: \"params\" must be an array or an object")]
    BadParams { at: String },

    /// `id` present but an array or object
    #[error("{at}: \"id\" must not be an array or an object")]
    BadId { at: String },
}

/// A payload ready for dispatch: one request or an ordered batch
#[derive(Debug, Clone, PartialEq)]
pub enum Requests {
    /// A top-level object
    Single(Request),
    /// A top-level array
    Batch(Vec<Request>),
}

/// Check a deserialized payload against the JSON-RPC 2.0 request shape
///
/// Accepts an object, or a non-empty array of objects, where every object
/// has `"jsonrpc": "2.0"`, a string `method`, an optional array/object
/// `params`, and an optional non-structured `id`.
///
/// ```rust
/// use rpcdisp_core::schema::validate;
/// use serde_json::json;
///
/// assert!(validate(&json!({"jsonrpc": "2.0", "method": "ping"})).is_ok());
/// assert!(validate(&json!({})).is_err());
/// assert!(validate(&json!([1])).is_err());
/// ```
pub fn validate(payload: &Value) -> Result<(), SchemaError> {
    match payload {
        Value::Object(obj) => validate_object(obj, "request"),
        Value::Array(items) => {
            if items.is_empty() {
                return Err(SchemaError::EmptyBatch);
            }
            for (index, item) in items.iter().enumerate() {
                let obj = item
                    .as_object()
                    .ok_or(SchemaError::BatchMemberNotAnObject { index })?;
                validate_object(obj, &format!("batch member {}", index))?;
            }
            Ok(())
        }
        _ => Err(SchemaError::NotAnObject),
    }
}

fn validate_object(obj: &Map<String, Value>, at: &str) -> Result<(), SchemaError> {
    if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Err(SchemaError::BadVersion { at: at.to_string() });
    }
    if !obj.get("method").is_some_and(Value::is_string) {
        return Err(SchemaError::BadMethod { at: at.to_string() });
    }
    if let Some(params) = obj.get("params") {
        if !(params.is_array() || params.is_object()) {
            return Err(SchemaError::BadParams { at: at.to_string() });
        }
    }
    if let Some(id) = obj.get("id") {
        if id.is_array() || id.is_object() {
            return Err(SchemaError::BadId { at: at.to_string() });
        }
    }
    Ok(())
}

/// Build requests from a payload
///
/// A top-level array is always a batch, including an empty one; a top-level
/// object is a single request. Missing `params` normalize to
/// [`Params::Empty`] and a missing `id` marks a notification.
///
/// The payload is expected to have passed [`validate`]; shape violations are
/// reported rather than panicking.
pub fn create_requests(payload: Value) -> Result<Requests, SchemaError> {
    match payload {
        Value::Object(obj) => Ok(Requests::Single(request_from_object(obj, "request")?)),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(obj) => request_from_object(obj, &format!("batch member {}", index)),
                _ => Err(SchemaError::BatchMemberNotAnObject { index }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Requests::Batch),
        _ => Err(SchemaError::NotAnObject),
    }
}

fn request_from_object(mut obj: Map<String, Value>, at: &str) -> Result<Request, SchemaError> {
    let method = match obj.remove("method") {
        Some(Value::String(method)) => method,
        _ => return Err(SchemaError::BadMethod { at: at.to_string() }),
    };

    let params = match obj.remove("params") {
        None => Params::Empty,
        Some(Value::Array(items)) => Params::Array(items),
        Some(Value::Object(map)) => Params::Object(map),
        Some(_) => return Err(SchemaError::BadParams { at: at.to_string() }),
    };

    let id = match obj.remove("id") {
        None => None,
        Some(value) => {
            Some(Id::from_value(value).ok_or_else(|| SchemaError::BadId { at: at.to_string() })?)
        }
    };

    Ok(Request { method, params, id })
}
