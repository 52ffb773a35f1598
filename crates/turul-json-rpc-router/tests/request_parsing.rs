//! End-to-end request parsing through the public API.

use serde_json::json;
use turul_json_rpc_router::prelude::*;
use turul_json_rpc_router::JsonRpcErrorCode;

fn parse(raw: &str) -> Result<ParsedRequests, InvalidRequestError> {
    RequestParser::new(ParserConfig::default()).parse_requests(raw)
}

#[test]
fn subtract_example_parses_with_integer_id() {
    let parsed = parse(r#"{"jsonrpc":"2.0","method":"subtract","params":[42,23],"id":1}"#).unwrap();

    assert!(!parsed.is_batch);
    let request = parsed.requests.into_iter().next().unwrap();
    assert_eq!(request.id, Some(RequestId::Number(1)));
    assert_eq!(request.method, "subtract");
    assert_eq!(request.version.as_str(), turul_json_rpc_router::JSONRPC_VERSION);
    assert_eq!(request.params.to_value(), json!([42, 23]));
}

#[test]
fn string_id_round_trips_as_string() {
    let parsed =
        parse(r#"{"jsonrpc":"2.0","method":"subtract2","params":["42","23"],"id":"4"}"#).unwrap();
    let request = &parsed.requests[0];

    assert_eq!(request.id, Some(RequestId::String("4".to_string())));
    assert_eq!(request.id.as_ref().and_then(RequestId::as_i64), None);
    assert_eq!(serde_json::to_value(request).unwrap()["id"], json!("4"));
}

#[test]
fn batch_flag_reflects_array_wrapping() {
    let two = parse(
        r#"[{"jsonrpc":"2.0","method":"one","params":["1"],"id":"1"},
            {"jsonrpc":"2.0","method":"two","params":["2"],"id":"2"}]"#,
    )
    .unwrap();
    assert!(two.is_batch);
    assert_eq!(two.len(), 2);
    assert_eq!(two.requests[0].method, "one");
    assert_eq!(two.requests[0].params.to_value(), json!(["1"]));
    assert_eq!(two.requests[1].method, "two");

    let one = parse(r#"[{"jsonrpc":"2.0","method":"one","params":["1"],"id":"1"}]"#).unwrap();
    assert!(one.is_batch);
    assert_eq!(one.len(), 1);
}

#[test]
fn structural_violations_are_invalid_requests() {
    let parser = RequestParser::new(ParserConfig::default());
    assert!(parser.parse_optional(None).is_err());

    for raw in [
        "{}",
        r#"{"method":"datetime","params":["2000-12-15T22:11:03"],"id":"1"}"#,
        r#"{"jsonrpc":"2.0","params":["2000-12-15T22:11:03"],"id":"1"}"#,
    ] {
        let err = parse(raw).unwrap_err();
        assert_eq!(err.code(), JsonRpcErrorCode::InvalidRequest, "{}", raw);
    }
}

#[test]
fn missing_id_or_params_still_parses() {
    let notification =
        parse(r#"{"method":"datetime","jsonrpc":"2.0","params":["2000-12-15T22:11:03"]}"#).unwrap();
    assert!(!notification.is_batch);
    assert!(notification.requests[0].is_notification());

    let no_params = parse(r#"{"method":"datetime","jsonrpc":"2.0","id":"1"}"#).unwrap();
    assert!(!no_params.is_batch);
    assert!(no_params.requests[0].params.is_empty());
}

#[test]
fn malformed_json_maps_to_parse_error_code() {
    let err = parse(r#"{"jsonrpc": "2.0", "method": "#).unwrap_err();
    assert_eq!(err.code(), JsonRpcErrorCode::ParseError);
    assert_eq!(err.to_error_object().code, PARSE_ERROR);
}

#[test]
fn batch_error_names_offending_index() {
    let err = parse(
        r#"[{"jsonrpc":"2.0","method":"a","id":1},
            {"jsonrpc":"2.0","method":"b","id":2},
            {"jsonrpc":"2.0","method":"c","id":2.5}]"#,
    )
    .unwrap_err();

    assert_eq!(err.index, Some(2));
    assert!(matches!(err.reason, InvalidRequestReason::InvalidId(_)));
    assert!(err.to_string().contains("batch index 2"));
}

#[test]
fn parser_is_shareable_across_threads() {
    let parser = std::sync::Arc::new(RequestParser::new(ParserConfig::default()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = parser.clone();
            std::thread::spawn(move || {
                let raw = format!(r#"{{"jsonrpc":"2.0","method":"m{}","id":{}}}"#, i, i);
                parser.parse_requests(&raw).unwrap().requests[0].id.clone()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(RequestId::Number(i as i64)));
    }
}
