//! rpcdisp - transport-independent JSON-RPC 2.0 dispatch
//!
//! This is the convenience crate that re-exports the rpcdisp sub-crates.
//! Use it if you want a single dependency for both the protocol model and
//! the dispatcher.
//!
//! # Architecture
//!
//! - **rpcdisp-core**: wire types, errors, schema validation, codec,
//!   observability setup
//! - **rpcdisp-engine**: method registry, argument binding, per-request and
//!   batch dispatch, options and metrics
//!
//! # Quick Start
//!
//! A transport reads a body, hands it to [`dispatch`], and writes back
//! whatever comes out, or nothing at all:
//!
//! ```rust,no_run
//! use rpcdisp::{dispatch, from_fn, DispatchConfig, DispatchOptions, MethodResult, Methods, Signature};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let methods = Methods::new().with(
//!         "echo",
//!         Signature::new(["text"]),
//!         from_fn(|_ctx, args| async move {
//!             let text: String = args.get_as("text")?;
//!             Ok(MethodResult::success(text))
//!         }),
//!     );
//!     let options = DispatchOptions::from_config(&DispatchConfig::from_env()?);
//!
//!     let body = r#"{"jsonrpc": "2.0", "method": "echo", "params": ["hi"], "id": 1}"#;
//!     match dispatch(body, &methods, &options).await? {
//!         Some(response) => println!("{}", response),
//!         None => println!("(no response)"),
//!     }
//!     Ok(())
//! }
//! ```

// Sub-crates under short names
pub use rpcdisp_core as core;
pub use rpcdisp_engine as engine;

// Most commonly used items at the top level
pub use rpcdisp_core::{
    init_observability, Codec, DispatchOutput, Error, Id, JsonCodec, JsonRpcErrorData,
    JsonRpcResponse, ObservabilityConfig, Params, Request, Result,
};
pub use rpcdisp_engine::{
    dispatch, dispatch_to_output, from_fn, from_raw_fn, from_typed_fn, BatchMode, BoundArgs,
    Context, DispatchConfig, DispatchMetrics, DispatchOptions, MethodResult, Methods, Signature,
};
