//! Shared fixture registry for integration tests

#![allow(dead_code)]

use rpcdisp_core::Error;
use rpcdisp_engine::{
    dispatch, from_fn, from_raw_fn, from_typed_fn, DispatchOptions, MethodResult, Methods,
    Signature,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Deserialize)]
struct AddParams {
    a: i64,
    b: i64,
}

/// Calculator-style methods covering every outcome a body can produce
pub fn registry(calls: Arc<AtomicUsize>) -> Methods {
    Methods::new()
        .with(
            "ping",
            Signature::empty(),
            from_fn(|_ctx, _args| async { Ok(MethodResult::success("pong")) }),
        )
        .with(
            "add",
            Signature::new(["a", "b"]),
            from_typed_fn(|p: AddParams| async move { Ok(p.a + p.b) }),
        )
        .with(
            "triple",
            Signature::new(["a", "b", "c"]),
            from_fn(|_ctx, args| async move {
                Ok(MethodResult::success(json!([
                    args.get("a"),
                    args.get("b"),
                    args.get("c")
                ])))
            }),
        )
        .with(
            "divide",
            Signature::new(["a", "b"]),
            from_fn(|_ctx, args| async move {
                let a: i64 = args.get_as("a")?;
                let b: i64 = args.get_as("b")?;
                if b == 0 {
                    return Err(Error::fault("ZeroDivisionError", "division by zero"));
                }
                Ok(MethodResult::success(a / b))
            }),
        )
        .with(
            "reject",
            Signature::empty(),
            from_fn(|_ctx, _args| async {
                Ok(MethodResult::error_with_data(42, "Rejected", json!({"why": "test"})))
            }),
        )
        .with(
            "silent",
            Signature::empty(),
            from_raw_fn(|_ctx, _args| async { Ok(None) }),
        )
        .with(
            "cancel",
            Signature::empty(),
            from_fn(|_ctx, _args| async { Err(Error::Cancelled) }),
        )
        .with(
            "count",
            Signature::empty(),
            from_fn(move |_ctx, _args| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(MethodResult::success(json!(null)))
                }
            }),
        )
        .with(
            "__internal__",
            Signature::empty(),
            from_fn(|_ctx, _args| async { Ok(MethodResult::success("secret")) }),
        )
}

pub fn methods() -> Methods {
    registry(Arc::new(AtomicUsize::new(0)))
}

pub fn debug() -> DispatchOptions {
    DispatchOptions::default().debug(true)
}

/// Dispatch and parse the body, `None` when there is no output
pub async fn call(text: &str, methods: &Methods, options: &DispatchOptions) -> Option<Value> {
    dispatch(text, methods, options)
        .await
        .expect("dispatch should not fail")
        .map(|body| serde_json::from_str(&body).expect("body should be JSON"))
}
