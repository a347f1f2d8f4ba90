use jsonschema::JSONSchema;
use serde_json::{json, Value};

fn compiled_schema() -> JSONSchema {
    let schema_json: Value = serde_json::from_str(include_str!("../schemas/rule_spec.v1.json")).unwrap();
    let schema_static: &'static Value = Box::leak(Box::new(schema_json));
    JSONSchema::options().compile(schema_static).unwrap()
}

fn yaml_to_json(yaml: &str) -> Value {
    let document: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
    serde_json::to_value(document).unwrap()
}

#[test]
fn orders_spec_is_valid() {
    let instance = yaml_to_json(include_str!("resources/orders_rules.yaml"));
    assert!(compiled_schema().is_valid(&instance));
}

#[test]
fn events_spec_is_valid() {
    let instance = yaml_to_json(include_str!("resources/events_rules.yaml"));
    assert!(compiled_schema().is_valid(&instance));
}

#[test]
fn unknown_rule_type_is_rejected() {
    let mut instance = yaml_to_json(include_str!("resources/orders_rules.yaml"));
    instance["validations"][0]["type"] = json!("telepathy");
    assert!(!compiled_schema().is_valid(&instance));
}

#[test]
fn range_without_bounds_is_rejected() {
    let instance = json!({
        "version": "1",
        "data_source": "orders",
        "validations": [{ "type": "range", "field": "amount" }]
    });
    assert!(!compiled_schema().is_valid(&instance));
}

#[test]
fn schema_and_loader_agree_on_empty_validations() {
    let instance = json!({ "version": "1", "data_source": "orders", "validations": [] });
    assert!(!compiled_schema().is_valid(&instance));

    let err = data_health_engine::parse_rule_spec("version: '1'\ndata_source: orders\nvalidations: []\n").unwrap_err();
    assert_eq!(err.message(), "The validations list must not be empty.");
}

fn spec_with(version: Value, data_source: Value, severity: &str) -> Value {
    json!({
        "version": version,
        "data_source": data_source,
        "validations": [{ "type": "not_null", "field": "id", "severity": severity }]
    })
}

fn loader_accepts(instance: &Value) -> bool {
    let yaml = serde_yaml::to_string(instance).unwrap();
    data_health_engine::parse_rule_spec(&yaml)
        .and_then(|spec| spec.build_rules(5).map(|_| ()))
        .is_ok()
}

#[test]
fn schema_and_loader_agree_on_scalar_fields() {
    let cases = [
        (spec_with(json!("1.0"), json!("orders"), "error"), true),
        (spec_with(json!(2), json!("orders"), "error"), true),
        (spec_with(json!(true), json!(42), "error"), true),
        (spec_with(json!(1.5), json!("orders"), "error"), false),
        (spec_with(json!(""), json!("orders"), "error"), false),
        (spec_with(json!("1"), json!(["orders"]), "error"), false),
    ];

    let schema = compiled_schema();
    for (instance, expected) in cases {
        assert_eq!(schema.is_valid(&instance), expected, "schema on {}", instance);
        assert_eq!(loader_accepts(&instance), expected, "loader on {}", instance);
    }
}

#[test]
fn schema_and_loader_agree_on_severity_spelling() {
    let schema = compiled_schema();
    for (severity, expected) in [("warn", true), ("WARNING", true), ("Critical", true), ("fatal", false)] {
        let instance = spec_with(json!("1"), json!("orders"), severity);
        assert_eq!(schema.is_valid(&instance), expected, "schema on {}", severity);
        assert_eq!(loader_accepts(&instance), expected, "loader on {}", severity);
    }
}
