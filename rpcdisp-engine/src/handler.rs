//! Method bodies and the context they run in
//!
//! A method body implements [`Handler`]: it receives the call [`Context`]
//! (the originating request plus the host's opaque extra value) and the
//! [`BoundArgs`] produced by the binder, and resolves to a tagged
//! [`MethodResult`].
//!
//! # Creating Handlers
//!
//! 1. **from_fn**: async closure over `(Context, BoundArgs)` returning
//!    `Result<MethodResult>`
//! 2. **from_typed_fn**: async closure over a `Deserialize` parameter type
//!    returning any `Serialize` value
//! 3. **from_raw_fn**: like `from_fn`, but the closure may finish without a
//!    result (`Ok(None)`), which dispatch reports as an Internal error
//!
//! # Errors Inside Handlers
//!
//! Handlers use `?` with [`rpcdisp_core::Error`]. The dispatcher maps the
//! variant to a response, catches panics as Server errors, and lets
//! `Error::Cancelled` escape untouched.
//!
//! ```rust
//! use rpcdisp_engine::{from_fn, from_typed_fn, MethodResult};
//! use serde::Deserialize;
//!
//! let ping = from_fn(|_ctx, _args| async { Ok(MethodResult::success("pong")) });
//!
//! #[derive(Deserialize)]
//! struct AddParams { a: i64, b: i64 }
//!
//! let add = from_typed_fn(|p: AddParams| async move { Ok(p.a + p.b) });
//! ```

use crate::binder::BoundArgs;
use rpcdisp_core::{Error, JsonRpcErrorData, Request, Result};
use serde_json::Value;
use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Tagged value a method body returns
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResult {
    /// The call succeeded with this result
    Success(Value),
    /// The method declares an error with its own code, message and data
    Error(JsonRpcErrorData),
}

impl MethodResult {
    /// Success with any value convertible to JSON
    pub fn success(result: impl Into<Value>) -> Self {
        MethodResult::Success(result.into())
    }

    /// Method-declared error without data
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        MethodResult::Error(JsonRpcErrorData::new(code, message))
    }

    /// Method-declared error with data
    pub fn error_with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        MethodResult::Error(JsonRpcErrorData::with_data(code, message, data))
    }

    /// Shortcut for a `-32602 Invalid params` error the method decided on
    /// itself, e.g. after checking argument values
    pub fn invalid_params(data: impl Into<Value>) -> Self {
        MethodResult::Error(JsonRpcErrorData::invalid_params().data(data))
    }
}

/// Per-call context handed to every method body
///
/// Gives the method the request it is serving and whatever the host passed
/// as `extra`, without reaching into global state.
#[derive(Clone)]
pub struct Context {
    /// The request being served
    pub request: Request,
    extra: Option<Arc<dyn Any + Send + Sync>>,
}

impl Context {
    /// Create a context for a request
    pub fn new(request: Request, extra: Option<Arc<dyn Any + Send + Sync>>) -> Self {
        Self { request, extra }
    }

    /// The host's extra value, if one was supplied and it has type `T`
    pub fn extra<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extra.as_deref().and_then(|extra| extra.downcast_ref::<T>())
    }

    /// True if the host supplied any extra value
    pub fn has_extra(&self) -> bool {
        self.extra.is_some()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("request", &self.request)
            .field("extra", &self.extra.is_some())
            .finish()
    }
}

/// Future returned by a handler
///
/// `Ok(None)` means the method finished without returning a result.
pub type HandlerResult = Pin<Box<dyn Future<Output = Result<Option<MethodResult>>> + Send>>;

/// A callable method body
///
/// Implementations must be `Send + Sync` because a registry is shared across
/// concurrent dispatch calls.
pub trait Handler: Send + Sync {
    /// Run the method
    fn call(&self, ctx: Context, args: BoundArgs) -> HandlerResult;
}

/// Adapts a closure into a [`Handler`]
pub struct AsyncHandler<F> {
    func: F,
}

impl<F, Fut> Handler for AsyncHandler<F>
where
    F: Fn(Context, BoundArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<MethodResult>>> + Send + 'static,
{
    fn call(&self, ctx: Context, args: BoundArgs) -> HandlerResult {
        Box::pin((self.func)(ctx, args))
    }
}

/// Handler from a closure that may finish without a result
pub fn from_raw_fn<F, Fut>(func: F) -> Arc<dyn Handler>
where
    F: Fn(Context, BoundArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<MethodResult>>> + Send + 'static,
{
    Arc::new(AsyncHandler { func })
}

/// Handler from a closure over the context and bound arguments
///
/// ```rust
/// use rpcdisp_engine::{from_fn, MethodResult};
///
/// let echo = from_fn(|ctx, _args| async move {
///     Ok(MethodResult::success(ctx.request.method.clone()))
/// });
/// ```
pub fn from_fn<F, Fut>(func: F) -> Arc<dyn Handler>
where
    F: Fn(Context, BoundArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<MethodResult>> + Send + 'static,
{
    let func = Arc::new(func);
    from_raw_fn(move |ctx, args| {
        let func = Arc::clone(&func);
        async move { func(ctx, args).await.map(Some) }
    })
}

/// Handler from a closure over a typed parameter struct
///
/// The bound arguments are deserialized into `P`:
///
/// - named parameters (and extra keywords) as a JSON object
/// - otherwise a variadic positional tail as a JSON array
/// - otherwise `null`, which suits `()` and `Option<_>`
///
/// A deserialization failure is reported as Invalid params. The return value
/// is serialized as the result; a serialization failure is a fault.
pub fn from_typed_fn<P, R, F, Fut>(func: F) -> Arc<dyn Handler>
where
    P: serde::de::DeserializeOwned + Send + 'static,
    R: serde::Serialize + Send + 'static,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    let func = Arc::new(func);
    from_fn(move |_ctx: Context, args: BoundArgs| {
        let func = Arc::clone(&func);
        async move {
            let params: P = serde_json::from_value(args.to_value())
                .map_err(|e| Error::InvalidParams(e.to_string()))?;
            let result = func(params).await?;
            let value =
                serde_json::to_value(result).map_err(|e| Error::Serialization(e.to_string()))?;
            Ok(MethodResult::Success(value))
        }
    })
}
