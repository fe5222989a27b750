use jsonsteps::config::EvaluationMode;
use jsonsteps::document::JsonDocument;
use jsonsteps::evaluator::NodeEvaluator;
use jsonsteps::Error;
use serde_json::json;

fn evaluate(body: &str, node: &str) -> jsonsteps::Result<serde_json::Value> {
    let doc = JsonDocument::parse(body).unwrap();
    NodeEvaluator::new(EvaluationMode::Path).evaluate(&doc, node)
}

#[test]
fn test_member_then_index() {
    assert_eq!(evaluate(r#"{"a":{"b":[1,2,3]}}"#, "a.b[1]").unwrap(), json!(2));
}

#[test]
fn test_member_of_scalar_is_not_found() {
    let err = evaluate(r#"{"a":1}"#, "a.b").unwrap_err();
    assert!(err.is_node_not_found());
    assert_eq!(err.to_string(), "The node 'a.b' does not exist.");
}

#[test]
fn test_index_out_of_bounds_is_not_found() {
    let err = evaluate(r#"{"a":[1]}"#, "a[5]").unwrap_err();
    assert!(err.is_node_not_found());
}

#[test]
fn test_nested_arrays() {
    let body = r#"{"grid":[[1,2],[3,4]]}"#;
    assert_eq!(evaluate(body, "grid[1][0]").unwrap(), json!(3));
    assert_eq!(evaluate(body, "grid[0]").unwrap(), json!([1, 2]));
}

#[test]
fn test_null_value_is_found() {
    assert_eq!(evaluate(r#"{"a":null}"#, "a").unwrap(), json!(null));
}

#[test]
fn test_root_alias() {
    let body = r#"[{"id":"first"},{"id":"second"}]"#;
    assert_eq!(evaluate(body, "root[1].id").unwrap(), json!("second"));
    assert_eq!(evaluate(body, "root").unwrap(), json!([{"id": "first"}, {"id": "second"}]));
}

#[test]
fn test_malformed_path_is_not_node_not_found() {
    for node in ["a..b", "a[x]", "a[1", ""] {
        let err = evaluate(r#"{"a":1}"#, node).unwrap_err();
        assert!(
            matches!(err, Error::Expression { .. }),
            "'{}' should be a syntax error, got {}",
            node,
            err
        );
    }
}

#[test]
fn test_scalar_document_has_no_nodes() {
    for node in ["root", "a", "root[0]"] {
        assert!(evaluate("42", node).unwrap_err().is_node_not_found());
    }

    // The expression language still binds `root` to the whole document.
    let doc = JsonDocument::parse("42").unwrap();
    let value = NodeEvaluator::new(EvaluationMode::Expression).evaluate(&doc, "root");
    assert_eq!(value.unwrap(), json!(42));
}
