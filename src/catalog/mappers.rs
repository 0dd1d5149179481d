//! Mapping helpers turning stored documents into client-facing records.

use crate::store::types::stringify_document_id;
use mongodb::bson::{Bson, Document};
use serde_json::Value;

/// Identifier field assigned by the store.
const NATIVE_ID_FIELD: &str = "_id";
/// Identifier field exposed to clients.
const CLIENT_ID_FIELD: &str = "id";

/// Rewrite a stored document for client output.
///
/// The store-native `_id` is removed and re-inserted as a text `id`; the
/// remaining fields are rendered as relaxed Extended JSON so numbers, arrays,
/// and maps come out as plain JSON values. Documents without `_id` pass
/// through untouched.
pub(crate) fn normalize_document(mut document: Document) -> Value {
    let id = document.remove(NATIVE_ID_FIELD).map(stringify_document_id);
    let mut value = Bson::Document(document).into_relaxed_extjson();
    if let (Some(id), Some(map)) = (id, value.as_object_mut()) {
        map.insert(CLIENT_ID_FIELD.into(), Value::String(id));
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn normalize_document_rewrites_object_id_to_text() {
        let oid = ObjectId::new();
        let normalized = normalize_document(doc! {
            "_id": oid,
            "name": "Sword",
            "rarity": "Epic",
        });

        assert_eq!(normalized["id"], json!(oid.to_hex()));
        assert!(normalized.get("_id").is_none());
        assert_eq!(normalized["name"], json!("Sword"));
    }

    #[test]
    fn normalize_document_preserves_field_values_and_tag_order() {
        let normalized = normalize_document(doc! {
            "_id": ObjectId::new(),
            "name": "Maple",
            "tags": ["a", "b"],
            "stats": { "atk": 7i64 },
            "bio": Bson::Null,
        });

        assert_eq!(normalized["tags"], json!(["a", "b"]));
        assert_eq!(normalized["stats"]["atk"], json!(7));
        assert_eq!(normalized["bio"], Value::Null);
    }

    #[test]
    fn normalize_document_leaves_records_without_native_id_untouched() {
        let normalized = normalize_document(doc! { "name": "Sword" });
        assert!(normalized.get("id").is_none());
        assert_eq!(normalized["name"], json!("Sword"));
    }
}
