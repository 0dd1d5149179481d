//! Catalog service coordinating validation, persistence, and normalization.

use crate::catalog::mappers::normalize_document;
use crate::catalog::types::{
    CHARACTER_COLLECTION, CatalogError, ITEM_COLLECTION, NewCharacter, NewItem, validate_rarity,
};
use crate::config::get_config;
use crate::store::{DocumentStore, MongoStore, StoreError, StoreHealth};
use async_trait::async_trait;
use mongodb::bson::to_document;
use serde::Serialize;
use serde_json::Value;

/// Abstraction over the catalog operations used by the HTTP surface.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Validate and persist a character, returning the new identifier.
    async fn create_character(&self, payload: NewCharacter) -> Result<String, CatalogError>;

    /// Validate and persist an item, returning the new identifier.
    async fn create_item(&self, payload: NewItem) -> Result<String, CatalogError>;

    /// List up to `limit` characters with normalized identifiers.
    async fn list_characters(&self, limit: u32) -> Result<Vec<Value>, CatalogError>;

    /// List up to `limit` items with normalized identifiers.
    async fn list_items(&self, limit: u32) -> Result<Vec<Value>, CatalogError>;

    /// Report document store connectivity for diagnostics. Never fails.
    async fn store_health(&self) -> StoreHealth;
}

/// Coordinates payload validation and document persistence.
///
/// The service owns the long-lived store handle so every surface reuses the
/// same connection pool. Construct it once near process start and share it
/// through an `Arc`; request handlers never mutate it.
pub struct CatalogService {
    store: Option<Box<dyn DocumentStore>>,
}

impl CatalogService {
    /// Build the service from configuration, connecting to MongoDB when
    /// `DATABASE_URL` and `DATABASE_NAME` are present.
    ///
    /// Missing or unusable configuration leaves the store offline rather than
    /// aborting startup: data routes then surface the store as unavailable
    /// while `/test` renders the reason inline.
    pub async fn connect() -> Self {
        let config = get_config();
        let (Some(url), Some(name)) = (&config.database_url, &config.database_name) else {
            tracing::warn!("DATABASE_URL or DATABASE_NAME unset; document store offline");
            return Self { store: None };
        };

        match MongoStore::connect(url, name).await {
            Ok(store) => Self {
                store: Some(Box::new(store)),
            },
            Err(error) => {
                tracing::warn!(error = %error, "Failed to initialize document store");
                Self { store: None }
            }
        }
    }

    /// Build the service over an explicit store handle.
    pub fn with_store(store: Box<dyn DocumentStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Build a service with no store attached.
    pub fn detached() -> Self {
        Self { store: None }
    }

    fn store(&self) -> Result<&dyn DocumentStore, StoreError> {
        self.store.as_deref().ok_or(StoreError::NotConfigured)
    }

    async fn create<T: Serialize + Sync>(
        &self,
        collection: &str,
        rarity: &str,
        payload: &T,
    ) -> Result<String, CatalogError> {
        validate_rarity(rarity)?;
        let fields = to_document(payload).map_err(StoreError::from)?;
        let id = self.store()?.create_document(collection, fields).await?;
        tracing::info!(collection, id = %id, "Document created");
        Ok(id)
    }

    async fn list(&self, collection: &str, limit: u32) -> Result<Vec<Value>, CatalogError> {
        // Zero means "none" here; the driver would read it as unbounded.
        if limit == 0 {
            return Ok(Vec::new());
        }
        let documents = self.store()?.get_documents(collection, limit).await?;
        Ok(documents.into_iter().map(normalize_document).collect())
    }
}

#[async_trait]
impl CatalogApi for CatalogService {
    async fn create_character(&self, payload: NewCharacter) -> Result<String, CatalogError> {
        self.create(CHARACTER_COLLECTION, &payload.rarity, &payload)
            .await
    }

    async fn create_item(&self, payload: NewItem) -> Result<String, CatalogError> {
        self.create(ITEM_COLLECTION, &payload.rarity, &payload).await
    }

    async fn list_characters(&self, limit: u32) -> Result<Vec<Value>, CatalogError> {
        self.list(CHARACTER_COLLECTION, limit).await
    }

    async fn list_items(&self, limit: u32) -> Result<Vec<Value>, CatalogError> {
        self.list(ITEM_COLLECTION, limit).await
    }

    async fn store_health(&self) -> StoreHealth {
        match &self.store {
            Some(store) => store.probe().await,
            None => StoreHealth::NotConfigured,
        }
    }
}
