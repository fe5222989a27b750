use jsonsteps::document::JsonDocument;
use jsonsteps::Error;

#[test]
fn test_canonical_encoding_is_idempotent() {
    let samples = [
        r#"{"b": 2, "a": [1, 2.5, {"z": null, "y": true}]}"#,
        r#"  [ "x" , -0.5, 1e3 ] "#,
        r#""plain string""#,
        "42",
        "null",
        r#"{"nested": {"deeper": {"deepest": []}}}"#,
    ];

    for text in samples {
        let once = JsonDocument::parse(text).unwrap().encode();
        let twice = JsonDocument::parse(&once).unwrap().encode();
        assert_eq!(once, twice, "encoding of {} is not stable", text);
    }
}

#[test]
fn test_member_order_is_preserved() {
    let doc = JsonDocument::parse(r#"{"zebra": 1, "apple": 2, "mango": 3}"#).unwrap();
    assert_eq!(doc.encode(), r#"{"zebra":1,"apple":2,"mango":3}"#);
}

#[test]
fn test_documents_with_different_member_order_differ() {
    let left = JsonDocument::parse(r#"{"a":1,"b":2}"#).unwrap();
    let right = JsonDocument::parse(r#"{"b":2,"a":1}"#).unwrap();
    assert_ne!(left, right);
}

#[test]
fn test_invalid_body_reports_context() {
    let err = JsonDocument::parse("{'single': 'quotes'}").unwrap_err();
    assert!(err.is_invalid_json());
    assert!(err.to_string().starts_with("The response is not valid JSON"));
}

#[test]
fn test_html_error_page_is_not_json() {
    let err = JsonDocument::parse("<html><body>502 Bad Gateway</body></html>").unwrap_err();
    assert!(matches!(err, Error::InvalidJson { .. }));
}

#[test]
fn test_pretty_output_parses_back_to_same_document() {
    let doc = JsonDocument::parse(r#"{"user":{"id":7,"tags":["a","b"]}}"#).unwrap();
    let pretty = doc.encode_pretty();
    assert!(pretty.contains('\n'));
    assert_eq!(JsonDocument::parse(&pretty).unwrap(), doc);
}
