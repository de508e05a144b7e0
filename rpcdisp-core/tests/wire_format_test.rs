//! Wire format integration tests: text in, requests out, responses back

use rpcdisp_core::{
    create_requests, validate, Codec, DispatchOutput, Id, JsonCodec, JsonRpcErrorData,
    JsonRpcResponse, Params, Requests,
};
use serde_json::{json, Value};

fn decode(text: &str) -> Value {
    JsonCodec::default().deserialize(text).unwrap()
}

#[test]
fn test_text_to_batch_requests() {
    let payload = decode(
        r#"[
            {"jsonrpc": "2.0", "method": "sum", "params": [1, 2, 4], "id": "1"},
            {"jsonrpc": "2.0", "method": "notify_hello", "params": [7]},
            {"jsonrpc": "2.0", "method": "get_data", "id": 9}
        ]"#,
    );
    validate(&payload).unwrap();

    let Requests::Batch(requests) = create_requests(payload).unwrap() else {
        panic!("Expected batch");
    };
    let methods: Vec<_> = requests.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, vec!["sum", "notify_hello", "get_data"]);
    assert_eq!(requests[0].id, Some(Id::from("1")));
    assert!(requests[1].is_notification());
    assert_eq!(requests[2].params, Params::Empty);
}

#[test]
fn test_reserved_method_names() {
    let payload = decode(r#"{"jsonrpc": "2.0", "method": "__init__", "id": 1}"#);
    validate(&payload).unwrap();
    let Requests::Single(request) = create_requests(payload).unwrap() else {
        panic!("Expected single request");
    };
    assert!(request.is_reserved_method());
    assert!(rpcdisp_core::is_reserved_method_name("__"));
    assert!(!rpcdisp_core::is_reserved_method_name("_private"));
}

#[test]
fn test_error_response_shape() {
    let response = JsonRpcResponse::error(
        JsonRpcErrorData::method_not_found().data("foo"),
        Id::from(1i64),
    );
    let text = JsonCodec::default()
        .serialize(&serde_json::to_value(&response).unwrap())
        .unwrap();
    let value = decode(&text);
    assert_eq!(
        value,
        json!({
            "jsonrpc": "2.0",
            "error": {"code": -32601, "message": "Method not found", "data": "foo"},
            "id": 1
        })
    );
}

#[test]
fn test_output_and_status() {
    let parse = DispatchOutput::Single(JsonRpcResponse::error(
        JsonRpcErrorData::parse_error(),
        Id::Null,
    ));
    assert_eq!(parse.http_status(), 400);
    assert_eq!(parse.to_value().unwrap().unwrap()["id"], Value::Null);

    let batch = DispatchOutput::Batch(vec![
        JsonRpcResponse::success(json!(7), Id::from(1i64)),
        JsonRpcResponse::error(JsonRpcErrorData::invalid_params(), Id::from(2i64)),
    ]);
    assert_eq!(batch.http_status(), 200);
    assert_eq!(batch.to_value().unwrap().unwrap().as_array().map(Vec::len), Some(2));

    assert_eq!(DispatchOutput::NoResponse.http_status(), 204);
    assert_eq!(DispatchOutput::NoResponse.to_value().unwrap(), None);
}
