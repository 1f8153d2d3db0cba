//! Shared test helpers for normalizer tests.

#![allow(dead_code)]

use osom::{compile, Blueprint, RuleDescriptor, Schema};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Compile a blueprint with no global rules.
pub fn schema(blueprint: Blueprint) -> Schema {
    init_tracing();
    compile(blueprint, None).expect("blueprint should compile")
}

/// Compile a blueprint on top of global rules.
pub fn schema_with(blueprint: Blueprint, globals: &RuleDescriptor) -> Schema {
    init_tracing();
    compile(blueprint, Some(globals)).expect("blueprint should compile")
}

/// Error message produced by normalizing `input`.
pub fn error_message(schema: &Schema, input: &Value) -> String {
    schema
        .apply_value(input)
        .expect_err("normalization should fail")
        .to_string()
}
