//! Per-request dispatch
//!
//! Runs one [`Request`] against a [`Methods`] registry:
//!
//! 1. Look the method up; unknown (or reserved) names are Method not found
//! 2. Bind the params to the method's signature; a mismatch is Invalid params
//! 3. Call the body with a [`Context`] carrying the request and host extra
//! 4. Map what the body produced to a response
//!
//! | Body produced                  | Response                               |
//! |--------------------------------|----------------------------------------|
//! | `Ok(Some(Success(v)))`         | result `v`                             |
//! | `Ok(Some(Error(e)))`           | `e` as declared                        |
//! | `Ok(None)`                     | `-32603`, method returned no Result    |
//! | `Err(Error::JsonRpc(e))`       | `e` as declared                        |
//! | `Err(Error::InvalidParams(m))` | `-32602` with `m`                      |
//! | `Err(Error::Cancelled)`        | not a response: returned as `Err`      |
//! | any other `Err`, or a panic    | `-32000` with `"{kind}: {message}"`    |
//!
//! Notifications run the same way, but their outcome is dropped.
//!
//! Diagnostic `data` generated by the engine is only attached with
//! `debug` on; data a method declares itself is always kept.

use crate::binder::split_params;
use crate::handler::{Context, MethodResult};
use crate::methods::Methods;
use crate::options::DispatchOptions;
use futures::FutureExt;
use rpcdisp_core::{Error, JsonRpcErrorData, JsonRpcResponse, Request, Result};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

pub(crate) const NO_RESULT: &str = "The method did not return a Result";

/// Dispatch one request
///
/// Returns `Ok(None)` for a notification and `Ok(Some(response))` otherwise.
/// The only error is [`Error::Cancelled`], raised by the method body.
#[tracing::instrument(skip_all, fields(method = %request.method, notification = request.is_notification()))]
pub async fn dispatch_request(
    methods: &Methods,
    request: Request,
    options: &DispatchOptions,
) -> Result<Option<JsonRpcResponse>> {
    let started = Instant::now();
    let method = request.method.clone();
    let id = request.id.clone();

    let outcome = evaluate(methods, request, options).await?;

    if let MethodResult::Error(error) = &outcome {
        tracing::debug!(code = error.code, message = %error.message, "request failed");
    }
    if let Some(metrics) = &options.metrics {
        let label = match (&id, &outcome) {
            (None, _) => "notification",
            (Some(_), MethodResult::Success(_)) => "success",
            (Some(_), MethodResult::Error(_)) => "error",
        };
        metrics.record_request(&method, label, started.elapsed().as_secs_f64());
        if let MethodResult::Error(error) = &outcome {
            metrics.record_error(error.code);
        }
    }

    let Some(id) = id else {
        return Ok(None);
    };
    Ok(Some(match outcome {
        MethodResult::Success(result) => JsonRpcResponse::success(result, id),
        MethodResult::Error(error) => JsonRpcResponse::error(error, id),
    }))
}

async fn evaluate(
    methods: &Methods,
    request: Request,
    options: &DispatchOptions,
) -> Result<MethodResult> {
    let Some(method) = methods.lookup(&request.method) else {
        let error = diagnostic(
            JsonRpcErrorData::method_not_found(),
            request.method.clone(),
            options,
        );
        return Ok(MethodResult::Error(error));
    };

    let (positional, keyword) = split_params(request.params.clone());
    let args = match method.signature().bind(positional, keyword) {
        Ok(args) => args,
        Err(reason) => {
            let error = diagnostic(JsonRpcErrorData::invalid_params(), reason, options);
            return Ok(MethodResult::Error(error));
        }
    };

    // Building the future may panic too, so it happens inside the guard.
    let ctx = Context::new(request, options.extra.clone());
    let handler = method.handler();
    let call = async move { handler.call(ctx, args).await };

    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(Some(MethodResult::Success(result)))) => Ok(MethodResult::Success(result)),
        Ok(Ok(Some(MethodResult::Error(error)))) | Ok(Err(Error::JsonRpc(error))) => {
            if error.is_reserved_code() {
                tracing::warn!(
                    code = error.code,
                    method = method.name(),
                    "method declared an error code in the reserved range"
                );
            }
            Ok(MethodResult::Error(error))
        }
        Ok(Ok(None)) => Ok(MethodResult::Error(diagnostic(
            JsonRpcErrorData::internal_error(),
            NO_RESULT,
            options,
        ))),
        Ok(Err(Error::Cancelled)) => {
            tracing::debug!(method = method.name(), "method cancelled");
            Err(Error::Cancelled)
        }
        Ok(Err(Error::InvalidParams(reason))) => Ok(MethodResult::Error(diagnostic(
            JsonRpcErrorData::invalid_params(),
            reason,
            options,
        ))),
        Ok(Err(fault)) => Ok(server_error(fault.kind(), &fault.message(), options)),
        Err(panic) => Ok(server_error("panic", &panic_message(panic.as_ref()), options)),
    }
}

fn server_error(kind: &str, message: &str, options: &DispatchOptions) -> MethodResult {
    tracing::error!(kind, message, "method raised a fault");
    MethodResult::Error(diagnostic(
        JsonRpcErrorData::server_error(),
        format!("{}: {}", kind, message),
        options,
    ))
}

/// Attach engine diagnostics only when debugging
pub(crate) fn diagnostic(
    error: JsonRpcErrorData,
    data: impl Into<serde_json::Value>,
    options: &DispatchOptions,
) -> JsonRpcErrorData {
    if options.debug {
        error.data(data)
    } else {
        error
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
