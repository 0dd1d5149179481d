//! Shared types used by the document store adapter.

use mongodb::bson::Bson;
use thiserror::Error;

/// Errors returned while interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No store connection was configured at startup.
    #[error("Document store is not configured; set DATABASE_URL and DATABASE_NAME")]
    NotConfigured,
    /// Payload could not be encoded into a BSON document.
    #[error("Failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    /// Underlying driver call failed.
    #[error("Database request failed: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Connectivity snapshot produced by the store probe.
///
/// The probe never fails: every failure mode is folded into a variant here and
/// rendered as status text at the HTTP boundary. Used only for diagnostics,
/// never for correctness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreHealth {
    /// No connection was configured at startup.
    NotConfigured,
    /// The store did not answer the liveness ping.
    ConnectionFailed(String),
    /// The store answered the ping but the collections query failed.
    QueryFailed(String),
    /// The store is reachable; carries the first collection names found.
    Healthy(Vec<String>),
}

/// Render a store-native identifier as text.
///
/// ObjectIds become their 24-char hex form; anything else falls back to a
/// total stringification so an unexpected identifier type still renders.
pub(crate) fn stringify_document_id(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(text) => text,
        other => other.to_string(),
    }
}
