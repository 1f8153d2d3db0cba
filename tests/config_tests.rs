//! Loading global rules from configuration files.

mod common;

use std::io::Write;

use common::{error_message, schema_with};
use osom::{Blueprint, Kind, NormalizerConfig};
use serde_json::json;

#[test]
fn load_rules_from_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[rules]\ncasting = false\nrequired = true\nrequired_message = \"mandatory\"").unwrap();

    let config = NormalizerConfig::load_from(Some(file.path().to_str().unwrap())).unwrap();
    assert!(!config.rules.casting);
    assert!(config.rules.required);

    let schema = schema_with(Blueprint::new().field("age", Kind::Number), &config.global_rules());
    assert_eq!(error_message(&schema, &json!({})), "mandatory");
    assert_eq!(error_message(&schema, &json!({"age": "23"})), "mandatory");
    assert_eq!(schema.apply_value(&json!({"age": 23})).unwrap(), json!({"age": 23}));
}

#[test]
fn save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("osom.toml");
    let path = path.to_str().unwrap();

    let mut config = NormalizerConfig::default();
    config.rules.required = true;
    config.save(path).unwrap();

    let loaded = NormalizerConfig::load_from(Some(path)).unwrap();
    assert!(loaded.rules.required);
    assert!(loaded.rules.casting);
    assert_eq!(loaded.rules.required_message, None);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(NormalizerConfig::load_from(Some(path.to_str().unwrap())).is_err());
}
