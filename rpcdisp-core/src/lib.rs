//! Core JSON-RPC 2.0 model for rpcdisp
//!
//! This crate holds everything about the protocol that does not involve
//! calling methods:
//!
//! - **Types**: canonical [`Request`], [`JsonRpcResponse`] and the
//!   whole-call [`DispatchOutput`]
//! - **Schema**: structural validation of deserialized payloads and request
//!   construction
//! - **Codec**: pluggable text <-> JSON conversion
//! - **Errors**: the method-facing [`Error`] and the wire [`JsonRpcErrorData`]
//! - **Observability**: optional subscriber/exporter installation
//!
//! The crate is transport-agnostic. `rpcdisp-engine` builds the dispatcher
//! on top of it.
//!
//! # Example
//!
//! ```rust
//! use rpcdisp_core::schema::{create_requests, validate, Requests};
//! use serde_json::json;
//!
//! let payload = json!({"jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": 7});
//! validate(&payload).unwrap();
//!
//! match create_requests(payload).unwrap() {
//!     Requests::Single(req) => assert_eq!(req.method, "add"),
//!     Requests::Batch(_) => unreachable!(),
//! }
//! ```

pub mod codec;
pub mod error;
pub mod observability;
pub mod schema;
pub mod types;

pub use codec::{Codec, FnCodec, JsonCodec};
pub use error::{Error, JsonRpcErrorData, Result};
pub use observability::{init_observability, ObservabilityConfig};
pub use schema::{create_requests, validate, Requests, SchemaError};
pub use types::{
    is_reserved_method_name, DispatchOutput, ErrorResponse, Id, JsonRpcResponse, Params, Request,
    SuccessResponse, JSONRPC_VERSION,
};
