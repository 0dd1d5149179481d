//! HTTP surface for the Art Vault backend.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `GET /` and `GET /api/hello` – Static greetings used by frontend smoke checks.
//! - `GET /test` – Database diagnostics. Never returns an error status: every failure
//!   mode (store unconfigured, unreachable, query error) is rendered as status text
//!   inside the response body.
//! - `GET /schema` – JSON Schema description of the character and item shapes.
//! - `GET /api/characters`, `GET /api/items` – List records (optional `limit`,
//!   default 100) with store-native identifiers rewritten to a text `id`.
//! - `POST /api/characters`, `POST /api/items` – Validate and persist a payload,
//!   returning `{ "id": <text> }`.
//!
//! CORS mirrors the request's origin, methods, and headers with credentials
//! allowed, so any frontend origin can talk to the API.

use crate::catalog::{CatalogApi, CatalogError, NewCharacter, NewItem, schema_export};
use crate::config::get_config;
use crate::store::StoreHealth;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build the HTTP router exposing the catalog API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: CatalogApi + 'static,
{
    // tower-http refuses wildcard origins combined with credentials, so the
    // layer mirrors whatever the request sends instead.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/", get(read_root))
        .route("/api/hello", get(hello))
        .route("/test", get(test_database::<S>))
        .route("/schema", get(get_schema))
        .route(
            "/api/characters",
            get(list_characters::<S>).post(create_character::<S>),
        )
        .route("/api/items", get(list_items::<S>).post(create_item::<S>))
        .layer(cors)
        .with_state(service)
}

/// Response body for the greeting endpoints.
#[derive(Serialize)]
struct GreetingResponse {
    message: &'static str,
}

async fn read_root() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello from the Art Vault backend!",
    })
}

async fn hello() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello from the backend API!",
    })
}

/// Response body for the `GET /test` diagnostics endpoint.
#[derive(Serialize)]
struct DiagnosticsResponse {
    backend: &'static str,
    database: String,
    database_url: &'static str,
    database_name: &'static str,
    connection_status: &'static str,
    collections: Vec<String>,
}

impl DiagnosticsResponse {
    /// Render a store health snapshot to status text.
    fn render(health: StoreHealth, url_set: bool, name_set: bool) -> Self {
        let (database, connection_status, collections) = match health {
            StoreHealth::NotConfigured => ("❌ Not Available".to_string(), "Not Connected", Vec::new()),
            StoreHealth::ConnectionFailed(reason) => {
                (format!("❌ Error: {reason}"), "Not Connected", Vec::new())
            }
            StoreHealth::QueryFailed(reason) => (
                format!("⚠️  Connected but Error: {reason}"),
                "Connected",
                Vec::new(),
            ),
            StoreHealth::Healthy(names) => {
                ("✅ Connected & Working".to_string(), "Connected", names)
            }
        };

        Self {
            backend: "✅ Running",
            database,
            database_url: presence_flag(url_set),
            database_name: presence_flag(name_set),
            connection_status,
            collections,
        }
    }
}

fn presence_flag(set: bool) -> &'static str {
    if set { "✅ Set" } else { "❌ Not Set" }
}

/// Probe the document store and report its state as plain text.
///
/// This handler never fails; broken stores show up in the body, not the status.
async fn test_database<S>(State(service): State<Arc<S>>) -> Json<DiagnosticsResponse>
where
    S: CatalogApi,
{
    let config = get_config();
    let health = service.store_health().await;
    Json(DiagnosticsResponse::render(
        health,
        config.database_url.is_some(),
        config.database_name.is_some(),
    ))
}

/// Export the character and item shapes as JSON Schema.
async fn get_schema() -> Json<Value> {
    Json(schema_export())
}

/// Query parameters accepted by the list endpoints.
#[derive(Deserialize)]
struct ListQuery {
    /// Maximum number of records to return.
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    100
}

/// Response body for the list endpoints.
#[derive(Serialize)]
struct ListResponse {
    items: Vec<Value>,
}

async fn list_characters<S>(
    State(service): State<Arc<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError>
where
    S: CatalogApi,
{
    let items = service.list_characters(query.limit).await?;
    Ok(Json(ListResponse { items }))
}

async fn list_items<S>(
    State(service): State<Arc<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError>
where
    S: CatalogApi,
{
    let items = service.list_items(query.limit).await?;
    Ok(Json(ListResponse { items }))
}

/// Success response for the create endpoints.
#[derive(Serialize)]
struct CreateResponse {
    /// Store-assigned identifier of the new record, rendered as text.
    id: String,
}

async fn create_character<S>(
    State(service): State<Arc<S>>,
    Json(payload): Json<NewCharacter>,
) -> Result<Json<CreateResponse>, ApiError>
where
    S: CatalogApi,
{
    let id = service.create_character(payload).await?;
    Ok(Json(CreateResponse { id }))
}

async fn create_item<S>(
    State(service): State<Arc<S>>,
    Json(payload): Json<NewItem>,
) -> Result<Json<CreateResponse>, ApiError>
where
    S: CatalogApi,
{
    let id = service.create_item(payload).await?;
    Ok(Json(CreateResponse { id }))
}

struct ApiError(CatalogError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CatalogError::InvalidRarity(_) => StatusCode::BAD_REQUEST,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.0.to_string()).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(inner: CatalogError) -> Self {
        Self(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use crate::catalog::CatalogService;
    use crate::config::{CONFIG, Config};
    use crate::store::{DocumentStore, StoreError, StoreHealth};
    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use mongodb::bson::{Document, doc, oid::ObjectId};
    use serde_json::{Value, json};
    use std::sync::{Arc, Once};
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const STUB_ID: &str = "0123456789abcdef01234567";

    #[derive(Clone)]
    struct StubStore {
        inserts: Arc<Mutex<Vec<(String, Document)>>>,
        limits: Arc<Mutex<Vec<u32>>>,
        canned: Vec<Document>,
        health: StoreHealth,
    }

    impl StubStore {
        fn new() -> Self {
            Self {
                inserts: Arc::new(Mutex::new(Vec::new())),
                limits: Arc::new(Mutex::new(Vec::new())),
                canned: Vec::new(),
                health: StoreHealth::Healthy(vec!["character".into(), "item".into()]),
            }
        }

        fn router(&self) -> Router {
            ensure_test_config();
            create_router(Arc::new(CatalogService::with_store(Box::new(self.clone()))))
        }

        async fn recorded_inserts(&self) -> Vec<(String, Document)> {
            self.inserts.lock().await.clone()
        }

        async fn recorded_limits(&self) -> Vec<u32> {
            self.limits.lock().await.clone()
        }
    }

    #[async_trait]
    impl DocumentStore for StubStore {
        async fn create_document(
            &self,
            collection: &str,
            fields: Document,
        ) -> Result<String, StoreError> {
            self.inserts
                .lock()
                .await
                .push((collection.to_string(), fields));
            Ok(STUB_ID.to_string())
        }

        async fn get_documents(
            &self,
            _collection: &str,
            limit: u32,
        ) -> Result<Vec<Document>, StoreError> {
            self.limits.lock().await.push(limit);
            Ok(self.canned.clone())
        }

        async fn probe(&self) -> StoreHealth {
            self.health.clone()
        }
    }

    fn detached_router() -> Router {
        ensure_test_config();
        create_router(Arc::new(CatalogService::detached()))
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    async fn get(router: Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response")
    }

    async fn post_json(router: Router, uri: &str, payload: Value) -> axum::response::Response {
        router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response")
    }

    #[tokio::test]
    async fn greeting_routes_respond() {
        let stub = StubStore::new();

        let response = get(stub.router(), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Hello from the Art Vault backend!");

        let response = get(stub.router(), "/api/hello").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Hello from the backend API!");
    }

    #[tokio::test]
    async fn create_item_returns_store_identifier() {
        let stub = StubStore::new();
        let response = post_json(
            stub.router(),
            "/api/items",
            json!({ "name": "Sword", "type": "Weapon", "rarity": "Epic" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["id"], STUB_ID);

        let inserts = stub.recorded_inserts().await;
        assert_eq!(inserts.len(), 1);
        let (collection, fields) = &inserts[0];
        assert_eq!(collection, "item");
        assert_eq!(fields.get_str("name").expect("name field"), "Sword");
        assert_eq!(fields.get_str("type").expect("type field"), "Weapon");
        assert_eq!(fields.get_str("rarity").expect("rarity field"), "Epic");
        assert!(fields.get_array("tags").expect("tags field").is_empty());
    }

    #[tokio::test]
    async fn create_character_rejects_unknown_rarity_without_persisting() {
        let stub = StubStore::new();
        let response = post_json(
            stub.router(),
            "/api/characters",
            json!({ "name": "Maple", "rarity": "Mythic" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let message = String::from_utf8(bytes.to_vec()).expect("utf8 body");
        assert!(message.contains("Invalid rarity"));

        assert!(stub.recorded_inserts().await.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_malformed_payloads_before_validation() {
        let stub = StubStore::new();

        // Missing required field.
        let response = post_json(
            stub.router(),
            "/api/items",
            json!({ "name": "Sword", "rarity": "Epic" }),
        )
        .await;
        assert!(response.status().is_client_error());

        // Malformed URL.
        let response = post_json(
            stub.router(),
            "/api/items",
            json!({
                "name": "Sword",
                "type": "Weapon",
                "rarity": "Epic",
                "image_url": "not a url"
            }),
        )
        .await;
        assert!(response.status().is_client_error());

        assert!(stub.recorded_inserts().await.is_empty());
    }

    #[tokio::test]
    async fn list_characters_normalizes_identifiers() {
        let oid = ObjectId::new();
        let mut stub = StubStore::new();
        stub.canned = vec![doc! {
            "_id": oid,
            "name": "Maple",
            "rarity": "Legendary",
            "tags": ["a", "b"],
        }];

        let response = get(stub.router(), "/api/characters").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;

        let items = body["items"].as_array().expect("items array");
        assert_eq!(items.len(), 1);
        let record = &items[0];
        assert_eq!(record["id"], json!(oid.to_hex()));
        assert!(record.get("_id").is_none());
        assert_eq!(record["tags"], json!(["a", "b"]));
    }

    #[tokio::test]
    async fn list_limit_defaults_and_zero_short_circuits() {
        let stub = StubStore::new();

        let response = get(stub.router(), "/api/items").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(stub.recorded_limits().await, vec![100]);

        let response = get(stub.router(), "/api/items?limit=5").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(stub.recorded_limits().await, vec![100, 5]);

        let response = get(stub.router(), "/api/items?limit=0").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["items"], json!([]));
        // The store is never consulted for a zero limit.
        assert_eq!(stub.recorded_limits().await, vec![100, 5]);
    }

    #[tokio::test]
    async fn list_without_store_is_a_server_error() {
        let response = get(detached_router(), "/api/characters").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_route_reports_each_store_state_without_failing() {
        let healthy = StubStore::new();
        let response = get(healthy.router(), "/test").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["database"], "✅ Connected & Working");
        assert_eq!(body["connection_status"], "Connected");
        assert_eq!(body["database_url"], "✅ Set");
        assert_eq!(body["collections"], json!(["character", "item"]));

        let mut unreachable = StubStore::new();
        unreachable.health = StoreHealth::ConnectionFailed("connection refused".into());
        let response = get(unreachable.router(), "/test").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["database"], "❌ Error: connection refused");
        assert_eq!(body["connection_status"], "Not Connected");

        let mut broken = StubStore::new();
        broken.health = StoreHealth::QueryFailed("unauthorized".into());
        let response = get(broken.router(), "/test").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["database"], "⚠️  Connected but Error: unauthorized");
        assert_eq!(body["connection_status"], "Connected");

        let response = get(detached_router(), "/test").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["database"], "❌ Not Available");
        assert_eq!(body["collections"], json!([]));
    }

    #[tokio::test]
    async fn schema_route_exports_both_shapes() {
        let stub = StubStore::new();
        let response = get(stub.router(), "/schema").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["character"]["properties"].is_object());
        assert!(body["item"]["properties"].is_object());
    }

    #[tokio::test]
    async fn preflight_mirrors_origin_and_allows_credentials() {
        let stub = StubStore::new();
        let response = stub
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/characters")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(
            headers
                .get("access-control-allow-origin")
                .expect("allow-origin header"),
            "http://localhost:3000"
        );
        assert_eq!(
            headers
                .get("access-control-allow-credentials")
                .expect("allow-credentials header"),
            "true"
        );
    }

    fn ensure_test_config() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = CONFIG.set(Config {
                database_url: Some("mongodb://127.0.0.1:27017".into()),
                database_name: Some("artvault".into()),
                server_port: 8000,
            });
        });
    }
}
