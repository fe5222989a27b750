use std::fs;

use jsonsteps::config::EvaluationMode;
use jsonsteps::steps::{JsonSteps, NodeTable};
use jsonsteps::Error;
use tempfile::TempDir;

const USERS: &str = r#"{
    "users": [
        {"id": 1, "name": "Ada", "admin": true, "email": null},
        {"id": 2, "name": "Grace", "admin": false, "tags": ["ops", "db"]},
        {"id": 3, "name": "Linus", "admin": false, "score": 4.5}
    ],
    "total": 3
}"#;

fn both_modes() -> [JsonSteps; 2] {
    [
        JsonSteps::new(EvaluationMode::Path),
        JsonSteps::new(EvaluationMode::Expression),
    ]
}

fn table(rows: &[(&str, &str)]) -> NodeTable {
    rows.iter()
        .map(|(node, value)| (node.to_string(), value.to_string()))
        .collect()
}

#[test]
fn test_response_in_json() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    assert!(steps.the_response_should_be_in_json(USERS).is_ok());
    assert!(steps.the_response_should_not_be_in_json(USERS).is_err());

    assert!(steps.the_response_should_be_in_json("Internal Server Error").is_err());
    assert!(steps.the_response_should_not_be_in_json("Internal Server Error").is_ok());
}

#[test]
fn test_node_equality_is_loose() {
    for steps in both_modes() {
        steps.the_json_node_should_be_equal_to(USERS, "users[0].name", "Ada").unwrap();
        steps.the_json_node_should_be_equal_to(USERS, "total", "3").unwrap();
        steps.the_json_node_should_be_equal_to(USERS, "users[2].score", "4.50").unwrap();
        steps.the_json_node_should_be_equal_to(USERS, "users[0].admin", "true").unwrap();
        steps.the_json_node_should_be_equal_to(USERS, "users[1].admin", "0").unwrap();
        steps.the_json_node_should_be_equal_to(USERS, "users[0].email", "null").unwrap();
        steps
            .the_json_node_should_be_equal_to(USERS, "users[1].tags", r#"["ops", "db"]"#)
            .unwrap();
    }
}

#[test]
fn test_node_equality_failure_shows_actual_value() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    let err = steps
        .the_json_node_should_be_equal_to(USERS, "users[1].name", "Ada")
        .unwrap_err();
    assert!(err.is_assertion_mismatch());
    assert!(err.to_string().contains("\"Grace\""));
}

#[test]
fn test_table_equality_stops_at_first_bad_row() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    let rows = table(&[
        ("users[0].id", "1"),
        ("users[1].name", "Grace"),
        ("total", "3"),
    ]);
    assert!(steps.the_json_nodes_should_be_equal_to(USERS, &rows).is_ok());

    let rows = table(&[
        ("users[0].id", "1"),
        ("users[9].id", "9"),
        ("total", "4"),
    ]);
    let err = steps.the_json_nodes_should_be_equal_to(USERS, &rows).unwrap_err();
    assert_eq!(err.to_string(), "The node 'users[9].id' does not exist.");
}

#[test]
fn test_element_count() {
    let body = r#"{"items":[1,2,3],"meta":{"a":1,"b":2},"none":null,"name":"x"}"#;
    for steps in both_modes() {
        assert!(steps.the_json_node_should_have_elements(body, "items", "3").is_ok());
        assert!(steps.the_json_node_should_have_elements(body, "items", "2").is_err());
        assert!(steps.the_json_node_should_have_elements(body, "meta", "2").is_ok());
        assert!(steps.the_json_node_should_have_elements(body, "none", "0").is_ok());
        assert!(steps.the_json_node_should_have_elements(body, "name", "1").is_ok());
    }
}

#[test]
fn test_element_count_must_be_a_number() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    let err = steps
        .the_json_node_should_have_elements(r#"{"items":[]}"#, "items", "many")
        .unwrap_err();
    assert!(err.is_assertion_mismatch());
}

#[test]
fn test_contains() {
    for steps in both_modes() {
        steps.the_json_node_should_contain(USERS, "users[1].name", "rac").unwrap();
        steps.the_json_node_should_contain(USERS, "users[1].tags", "\"db\"").unwrap();
        steps.the_json_node_should_contain(USERS, "total", "3").unwrap();
        assert!(steps.the_json_node_should_contain(USERS, "users[1].name", "Ada").is_err());

        steps.the_json_node_should_not_contain(USERS, "users[1].name", "Ada").unwrap();
        assert!(steps.the_json_node_should_not_contain(USERS, "users[1].name", "Gr").is_err());
    }
}

#[test]
fn test_not_contain_requires_the_node() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    let err = steps
        .the_json_node_should_not_contain(USERS, "users[0].nickname", "x")
        .unwrap_err();
    assert!(err.is_node_not_found());
}

#[test]
fn test_table_containment() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    let rows = table(&[("users[0].name", "A"), ("users[2].name", "nu")]);
    assert!(steps.the_json_nodes_should_contain(USERS, &rows).is_ok());
    assert!(steps.the_json_nodes_should_not_contain(USERS, &rows).is_err());

    let rows = table(&[("users[0].name", "Z"), ("users[2].name", "Q")]);
    assert!(steps.the_json_nodes_should_not_contain(USERS, &rows).is_ok());
}

#[test]
fn test_exactly_one_of_exist_and_not_exist_passes() {
    let nodes = [
        "users",
        "users[0]",
        "users[0].email",
        "users[3]",
        "users[0].nickname",
        "total.value",
        "root",
    ];
    for steps in both_modes() {
        for node in nodes {
            let exists = steps.the_json_node_should_exist(USERS, node).is_ok();
            let not_exists = steps.the_json_node_should_not_exist(USERS, node).is_ok();
            assert!(exists != not_exists, "node '{}' in {} mode", node, steps.evaluator().mode());
        }
    }
}

#[test]
fn test_exist_returns_value() {
    let steps = JsonSteps::new(EvaluationMode::Expression);
    let value = steps.the_json_node_should_exist(USERS, "users.length").unwrap();
    assert_eq!(value, serde_json::json!(3));
}

#[test]
fn test_not_exist_keeps_other_failures() {
    let steps = JsonSteps::new(EvaluationMode::Path);

    let err = steps.the_json_node_should_not_exist("not json", "a").unwrap_err();
    assert!(err.is_invalid_json());

    let err = steps.the_json_node_should_not_exist(USERS, "users[").unwrap_err();
    assert!(matches!(err, Error::Expression { .. }));

    let err = steps.the_json_node_should_not_exist(USERS, "total").unwrap_err();
    assert_eq!(err.to_string(), "The node 'total' exists.");
}

#[test]
fn test_inline_schema_steps() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    let schema = r#"{"type":"object","required":["users","total"]}"#;
    let strict = r#"{"type":"object","required":["next_page"]}"#;

    steps.the_json_should_be_valid_according_to_this_schema(USERS, schema).unwrap();
    assert!(steps.the_json_should_be_invalid_according_to_this_schema(USERS, schema).is_err());

    let err = steps
        .the_json_should_be_valid_according_to_this_schema(USERS, strict)
        .unwrap_err();
    assert!(err.to_string().contains("next_page"));
    steps.the_json_should_be_invalid_according_to_this_schema(USERS, strict).unwrap();
}

#[test]
fn test_negated_schema_step_keeps_schema_errors() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    let err = steps
        .the_json_should_be_invalid_according_to_this_schema(USERS, "{not a schema")
        .unwrap_err();
    assert!(err.is_invalid_json());

    let dir = TempDir::new().unwrap();
    let err = steps
        .clone()
        .with_working_dir(dir.path())
        .the_json_should_be_invalid_according_to_the_schema(USERS, "missing.json")
        .unwrap_err();
    assert!(matches!(err, Error::SchemaNotFound { .. }));
}

#[test]
fn test_file_schema_steps() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("schemas")).unwrap();
    fs::write(
        dir.path().join("schemas").join("users.json"),
        r#"{"type":"object","properties":{"users":{"type":"array","items":{"$ref":"user.json"}}}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("schemas").join("user.json"),
        r#"{"type":"object","required":["id","name"]}"#,
    )
    .unwrap();

    let steps = JsonSteps::new(EvaluationMode::Path).with_working_dir(dir.path());
    steps
        .the_json_should_be_valid_according_to_the_schema(USERS, "schemas/users.json")
        .unwrap();

    let nameless = r#"{"users":[{"id":1}]}"#;
    steps
        .the_json_should_be_invalid_according_to_the_schema(nameless, "schemas/users.json")
        .unwrap();
}

#[test]
fn test_document_equality_is_order_sensitive() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    let body = r#"{"b":2,"a":1}"#;

    steps.the_json_should_be_equal_to(body, r#"{ "b": 2, "a": 1 }"#).unwrap();

    let err = steps.the_json_should_be_equal_to(body, r#"{"a":1,"b":2}"#).unwrap_err();
    assert!(err.is_assertion_mismatch());
    assert!(err.to_string().contains(r#"{"a":1,"b":2}"#));
}

#[test]
fn test_document_equality_rejects_invalid_expected_text() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    let err = steps.the_json_should_be_equal_to("{}", "{oops").unwrap_err();
    assert!(err.is_invalid_json());
    assert!(err.to_string().starts_with("The expected JSON is not a valid"));
}

#[test]
fn test_print_last_response() {
    let steps = JsonSteps::new(EvaluationMode::Path);
    let mut out = Vec::new();
    steps.print_last_json_response(r#"{"b":[1],"a":null}"#, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with('\n'));
    assert!(text.find("\"b\"").unwrap() < text.find("\"a\"").unwrap());

    assert!(steps.print_last_json_response("nope", &mut Vec::new()).is_err());
}

#[test]
fn test_long_missing_path_is_absent_in_both_modes() {
    let node = format!("a{}", ".b".repeat(70));
    for steps in both_modes() {
        steps.the_json_node_should_not_exist(r#"{"a":1}"#, &node).unwrap();
    }
}

#[test]
fn test_large_integers_are_compared_exactly() {
    let body = r#"{"id": 9007199254740993}"#;
    for steps in both_modes() {
        let err = steps
            .the_json_node_should_be_equal_to(body, "id", "9007199254740992")
            .unwrap_err();
        assert!(err.is_assertion_mismatch());
        steps.the_json_node_should_be_equal_to(body, "id", "9007199254740993").unwrap();
    }
}
