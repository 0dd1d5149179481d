//! Machine-readable schema export for database viewers and tooling.

use crate::catalog::types::{NewCharacter, NewItem};
use schemars::{schema::RootSchema, schema_for};
use serde_json::{Value, json};

/// Describe both catalog shapes as JSON Schema, keyed by collection.
pub fn schema_export() -> Value {
    json!({
        "character": schema_value(schema_for!(NewCharacter)),
        "item": schema_value(schema_for!(NewItem)),
    })
}

fn schema_value(schema: RootSchema) -> Value {
    serde_json::to_value(schema).expect("schema serializes to JSON")
}
