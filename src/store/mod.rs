//! MongoDB document store integration.

use async_trait::async_trait;
use mongodb::bson::Document;

pub mod client;
pub mod types;

pub use client::MongoStore;
pub use types::{StoreError, StoreHealth};

/// Interface implemented by document store backends.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `fields` as a new record in the named collection, returning the
    /// store-assigned identifier rendered as text.
    async fn create_document(
        &self,
        collection: &str,
        fields: Document,
    ) -> Result<String, StoreError>;

    /// Fetch up to `limit` records from the named collection in store-defined
    /// order, each still carrying the store's native identifier field.
    ///
    /// An unreachable store is an error, distinct from an empty result.
    async fn get_documents(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<Document>, StoreError>;

    /// Probe connectivity. Failures are captured in the snapshot, never raised.
    async fn probe(&self) -> StoreHealth;
}
