//! Top-level entry points
//!
//! `text -> deserialize -> validate -> build requests -> dispatch -> serialize`
//!
//! A payload that does not deserialize is a Parse error and a payload that
//! fails validation is an Invalid Request. Both are answered with a single
//! error with `id: null`, even if the payload looks like a notification or a
//! batch, since nothing about it can be trusted yet.

use crate::batch::dispatch_batch;
use crate::dispatcher::{diagnostic, dispatch_request};
use crate::logging::{log_request, log_response};
use crate::methods::Methods;
use crate::options::DispatchOptions;
use rpcdisp_core::{
    create_requests, validate, DispatchOutput, Error, Id, JsonRpcErrorData, JsonRpcResponse,
    Requests, Result,
};

/// Last-resort body when even the fallback error cannot be rendered
const UNRENDERABLE: &str =
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"},"id":null}"#;

/// Dispatch raw request text and return the unserialized outcome
///
/// The only error is [`Error::Cancelled`](rpcdisp_core::Error::Cancelled).
#[tracing::instrument(skip_all, fields(len = text.len()))]
pub async fn dispatch_to_output(
    text: &str,
    methods: &Methods,
    options: &DispatchOptions,
) -> Result<DispatchOutput> {
    log_request(text, options.trim_log_values);

    let payload = match options.codec.deserialize(text) {
        Ok(payload) => payload,
        Err(reason) => {
            tracing::debug!(%reason, "parse error");
            let error = diagnostic(JsonRpcErrorData::parse_error(), reason, options);
            return Ok(rejected(error, options));
        }
    };

    // Invalid Request never carries data; the reason is only logged.
    if let Err(reason) = validate(&payload) {
        tracing::debug!(%reason, "invalid request");
        return Ok(rejected(JsonRpcErrorData::invalid_request(), options));
    }

    match create_requests(payload) {
        Ok(Requests::Single(request)) => Ok(dispatch_request(methods, request, options)
            .await?
            .map_or(DispatchOutput::NoResponse, DispatchOutput::Single)),
        Ok(Requests::Batch(requests)) => dispatch_batch(methods, requests, options).await,
        Err(reason) => {
            tracing::debug!(%reason, "invalid request");
            Ok(rejected(JsonRpcErrorData::invalid_request(), options))
        }
    }
}

/// Dispatch raw request text and return the response body
///
/// `None` means there is nothing to send, which is distinct from an empty
/// body or `[]`. If the output cannot be serialized, the body is an
/// Internal error with `id: null` instead.
///
/// ```rust
/// use rpcdisp_engine::{dispatch, from_fn, DispatchOptions, Methods, MethodResult, Signature};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let methods = Methods::new().with("ping", Signature::empty(), from_fn(|_ctx, _args| async {
///     Ok(MethodResult::success("pong"))
/// }));
/// let options = DispatchOptions::default();
///
/// let body = dispatch(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#, &methods, &options)
///     .await
///     .unwrap();
/// let response: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
/// assert_eq!(response, serde_json::json!({"jsonrpc": "2.0", "result": "pong", "id": 1}));
///
/// let body = dispatch(r#"{"jsonrpc":"2.0","method":"ping"}"#, &methods, &options)
///     .await
///     .unwrap();
/// assert_eq!(body, None);
/// # }
/// ```
pub async fn dispatch(
    text: &str,
    methods: &Methods,
    options: &DispatchOptions,
) -> Result<Option<String>> {
    let output = dispatch_to_output(text, methods, options).await?;

    let body = match output.to_value() {
        Ok(None) => {
            tracing::debug!("no response");
            return Ok(None);
        }
        Ok(Some(value)) => options
            .codec
            .serialize(&value)
            .unwrap_or_else(|err| unserializable(err, options)),
        Err(err) => unserializable(err, options),
    };
    log_response(&body, options.trim_log_values);
    Ok(Some(body))
}

fn unserializable(err: Error, options: &DispatchOptions) -> String {
    tracing::error!(error = %err, "failed to serialize response");
    let error = diagnostic(
        JsonRpcErrorData::internal_error(),
        format!("{}: {}", err.kind(), err.message()),
        options,
    );
    if let Some(metrics) = &options.metrics {
        metrics.record_error(error.code);
    }
    serde_json::to_string(&JsonRpcResponse::error(error, Id::Null))
        .unwrap_or_else(|_| UNRENDERABLE.to_string())
}

fn rejected(error: JsonRpcErrorData, options: &DispatchOptions) -> DispatchOutput {
    if let Some(metrics) = &options.metrics {
        metrics.record_error(error.code);
    }
    DispatchOutput::Single(JsonRpcResponse::error(error, Id::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Signature;
    use crate::handler::{from_fn, MethodResult};
    use rpcdisp_core::FnCodec;
    use serde_json::{json, Value};

    fn methods() -> Methods {
        Methods::new().with(
            "ping",
            Signature::empty(),
            from_fn(|_ctx, _args| async { Ok(MethodResult::success("pong")) }),
        )
    }

    async fn error_of(text: &str, options: &DispatchOptions) -> (i32, Value) {
        let body = dispatch(text, &methods(), options).await.unwrap().unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        (
            value["error"]["code"].as_i64().unwrap() as i32,
            value["id"].clone(),
        )
    }

    #[tokio::test]
    async fn test_parse_error() {
        let (code, id) = error_of("{", &DispatchOptions::default()).await;
        assert_eq!(code, -32700);
        assert_eq!(id, Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_request() {
        let (code, id) = error_of("{}", &DispatchOptions::default()).await;
        assert_eq!(code, -32600);
        assert_eq!(id, Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_request_has_no_data_even_in_debug() {
        let output = dispatch_to_output("[1]", &methods(), &DispatchOptions::default().debug(true))
            .await
            .unwrap();
        let DispatchOutput::Single(response) = output else {
            panic!("Expected single response");
        };
        assert_eq!(response.error_data(), Some(&JsonRpcErrorData::invalid_request()));
    }

    #[tokio::test]
    async fn test_parse_error_data_only_in_debug() {
        let quiet = dispatch_to_output("{", &methods(), &DispatchOptions::default())
            .await
            .unwrap();
        let DispatchOutput::Single(quiet) = quiet else {
            panic!("Expected single response");
        };
        assert!(quiet.error_data().unwrap().data.is_none());

        let verbose = dispatch_to_output("{", &methods(), &DispatchOptions::default().debug(true))
            .await
            .unwrap();
        let DispatchOutput::Single(verbose) = verbose else {
            panic!("Expected single response");
        };
        assert!(verbose.error_data().unwrap().data.is_some());
    }

    #[tokio::test]
    async fn test_custom_codec() {
        let codec = FnCodec::new(
            |text| serde_json::from_str(text.trim()).map_err(|e| e.to_string()),
            |value| Ok(format!("{}\n", value)),
        );
        let options = DispatchOptions::default().codec(codec);

        let text = r#"  {"jsonrpc":"2.0","method":"ping","id":1}  "#;
        let body = dispatch(text, &methods(), &options).await.unwrap().unwrap();
        assert!(body.ends_with('\n'));
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "result": "pong", "id": 1}));
    }

    #[tokio::test]
    async fn test_serializer_failure_becomes_internal_error() {
        let codec = FnCodec::new(
            |text| serde_json::from_str(text).map_err(|e| e.to_string()),
            |_value| Err(Error::Serialization("nope".to_string())),
        );
        let text = r#"{"jsonrpc":"2.0","method":"ping","id":1}"#;

        let body = dispatch(text, &methods(), &DispatchOptions::default().codec(codec))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            body,
            r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"},"id":null}"#
        );
    }

    #[tokio::test]
    async fn test_serializer_failure_reason_in_debug() {
        let codec = FnCodec::new(
            |text| serde_json::from_str(text).map_err(|e| e.to_string()),
            |_value| Err(Error::Serialization("nope".to_string())),
        );
        let options = DispatchOptions::default().debug(true).codec(codec);

        let body = dispatch(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#, &methods(), &options)
            .await
            .unwrap()
            .unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["error"]["code"], json!(-32603));
        assert_eq!(value["error"]["data"], json!("Serialization: nope"));
        assert_eq!(value["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_body_member_order() {
        let text = r#"{"jsonrpc":"2.0","method":"nope","id":2}"#;
        let body = dispatch(text, &methods(), &DispatchOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            body,
            r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":2}"#
        );
    }

    #[tokio::test]
    async fn test_http_status() {
        let options = DispatchOptions::default();
        let ok = dispatch_to_output(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#, &methods(), &options)
            .await
            .unwrap();
        assert_eq!(ok.http_status(), 200);

        let none = dispatch_to_output(r#"{"jsonrpc":"2.0","method":"ping"}"#, &methods(), &options)
            .await
            .unwrap();
        assert_eq!(none.http_status(), 204);

        let bad = dispatch_to_output("{}", &methods(), &options).await.unwrap();
        assert_eq!(bad.http_status(), 400);

        let missing =
            dispatch_to_output(r#"{"jsonrpc":"2.0","method":"nope","id":1}"#, &methods(), &options)
                .await
                .unwrap();
        assert_eq!(missing.http_status(), 200);
    }

    #[tokio::test]
    async fn test_trimmed_logging_does_not_change_output() {
        let long = "z".repeat(64);
        let text = format!(r#"{{"jsonrpc":"2.0","method":"ping","id":"{}"}}"#, long);
        let plain = dispatch(&text, &methods(), &DispatchOptions::default()).await.unwrap();
        let trimmed = dispatch(&text, &methods(), &DispatchOptions::default().trim_log_values(true))
            .await
            .unwrap();
        assert_eq!(plain, trimmed);
        assert!(plain.unwrap().contains(&long));
    }
}
