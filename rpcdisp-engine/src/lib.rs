//! Transport-independent JSON-RPC 2.0 dispatch
//!
//! Give [`dispatch`] the raw text a transport received, a [`Methods`]
//! registry and some [`DispatchOptions`]; it validates the payload, routes
//! every request to its method, and hands back the response body, or `None`
//! when nothing should be sent.
//!
//! # Core Features
//!
//! - **Protocol edge cases**: notifications, batches, parse errors and
//!   malformed requests are all handled per JSON-RPC 2.0
//! - **Argument binding**: positional and named params are checked against a
//!   declared [`Signature`] before the method runs
//! - **Fault isolation**: errors and panics in a method body become error
//!   responses; only cancellation escapes
//! - **Batch modes**: sequential by default, optionally concurrent, always in
//!   input order
//! - **Pluggable codec**: bring your own text <-> JSON conversion
//! - **Observability**: `tracing` request/response logs and optional
//!   OpenTelemetry metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rpcdisp_engine::{dispatch, from_typed_fn, DispatchOptions, Methods, Signature};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct AddParams { a: i64, b: i64 }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let methods = Methods::new().with(
//!         "add",
//!         Signature::new(["a", "b"]),
//!         from_typed_fn(|p: AddParams| async move { Ok(p.a + p.b) }),
//!     );
//!     let options = DispatchOptions::default();
//!
//!     let body = dispatch(
//!         r#"{"jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": 1}"#,
//!         &methods,
//!         &options,
//!     )
//!     .await?;
//!     println!("{}", body.unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! # Sharing
//!
//! The registry and options are plain values owned by the host. Both are
//! cheap to clone and read-only during dispatch, so one pair can serve any
//! number of concurrent calls.

pub mod batch;
pub mod binder;
pub mod config;
pub mod dispatch;
pub mod dispatcher;
pub mod handler;
pub mod logging;
pub mod methods;
pub mod metrics;
pub mod options;

pub use batch::{dispatch_batch, BatchMode};
pub use binder::{split_params, BoundArgs, Signature};
pub use config::{ConfigError, DispatchConfig};
pub use dispatch::{dispatch, dispatch_to_output};
pub use dispatcher::dispatch_request;
pub use handler::{
    from_fn, from_raw_fn, from_typed_fn, AsyncHandler, Context, Handler, HandlerResult,
    MethodResult,
};
pub use methods::{Method, Methods};
pub use metrics::DispatchMetrics;
pub use options::DispatchOptions;
