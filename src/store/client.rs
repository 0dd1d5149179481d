//! MongoDB-backed implementation of the document store.

use crate::store::DocumentStore;
use crate::store::types::{StoreError, StoreHealth, stringify_document_id};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{
    Client, Database,
    bson::{Document, doc},
};

/// Number of collection names included in a health probe.
const PROBE_COLLECTION_CAP: usize = 10;
/// Character budget for probe failure reasons.
const PROBE_REASON_CAP: usize = 50;

/// Document store backed by a MongoDB database handle.
///
/// The handle is created once at process start and shared read-only across
/// requests; the driver maintains its own connection pool underneath.
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect to the database named `name` at `url`.
    ///
    /// The driver resolves the deployment lazily, so this succeeds for a
    /// well-formed connection string even when the server is down; the first
    /// operation (or [`DocumentStore::probe`]) surfaces reachability.
    pub async fn connect(url: &str, name: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url).await?;
        tracing::debug!(database = name, "Initialized MongoDB client");
        Ok(Self {
            database: client.database(name),
        })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn create_document(
        &self,
        collection: &str,
        fields: Document,
    ) -> Result<String, StoreError> {
        let result = self
            .database
            .collection::<Document>(collection)
            .insert_one(fields, None)
            .await?;
        let id = stringify_document_id(result.inserted_id);
        tracing::debug!(collection, id = %id, "Document inserted");
        Ok(id)
    }

    async fn get_documents(
        &self,
        collection: &str,
        limit: u32,
    ) -> Result<Vec<Document>, StoreError> {
        // The driver reads a zero limit as "unbounded"; callers keep zero away.
        let options = FindOptions::builder().limit(i64::from(limit)).build();
        let mut cursor = self
            .database
            .collection::<Document>(collection)
            .find(doc! {}, options)
            .await?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            documents.push(document);
        }
        tracing::debug!(collection, count = documents.len(), "Documents fetched");
        Ok(documents)
    }

    async fn probe(&self) -> StoreHealth {
        if let Err(error) = self.database.run_command(doc! { "ping": 1 }, None).await {
            tracing::warn!(error = %error, "Store liveness ping failed");
            return StoreHealth::ConnectionFailed(clip_reason(&error.to_string()));
        }

        match self.database.list_collection_names(None).await {
            Ok(mut names) => {
                names.truncate(PROBE_COLLECTION_CAP);
                StoreHealth::Healthy(names)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Store collections query failed");
                StoreHealth::QueryFailed(clip_reason(&error.to_string()))
            }
        }
    }
}

/// Clip a diagnostic reason to the probe's character budget.
fn clip_reason(reason: &str) -> String {
    if reason.chars().count() <= PROBE_REASON_CAP {
        reason.to_string()
    } else {
        reason.chars().take(PROBE_REASON_CAP).collect()
    }
}
