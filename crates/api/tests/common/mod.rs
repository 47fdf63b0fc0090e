//! Shared fixtures for the API integration tests.
//!
//! Tests drive the real router over an in-memory entity store, so no
//! database is needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use cms_core_api::{
    app::{router, AppState},
    config::Config,
};
use domain::services::{EntityStore, InMemoryStore};
use fake::{faker::lorem::en::Words, Fake};
use serde_json::Value;
use shared::jwt::{JwtConfig, TokenSubject};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub jwt: Arc<JwtConfig>,
}

impl TestApp {
    /// Router over a seeded store (component catalog plus English).
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::seeded(), &[])
    }

    pub fn with_overrides(overrides: &[(&str, &str)]) -> Self {
        Self::with_store(InMemoryStore::seeded(), overrides)
    }

    pub fn with_store(store: InMemoryStore, overrides: &[(&str, &str)]) -> Self {
        let store = Arc::new(store);
        let state = AppState::new(test_config(overrides), store.clone() as Arc<dyn EntityStore>)
            .expect("Failed to build app state");
        let jwt = state.jwt.clone();

        Self {
            router: router(state),
            store,
            jwt,
        }
    }

    /// Access token carrying `permissions` as its snapshot.
    pub fn token(&self, permissions: &[&str]) -> String {
        self.token_for(Uuid::new_v4(), None, permissions)
    }

    pub fn token_for(&self, user_id: Uuid, role_id: Option<Uuid>, permissions: &[&str]) -> String {
        let subject = TokenSubject {
            user_id,
            email: Some(format!("user_{}@example.com", user_id.simple())),
            role_id,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        };
        self.jwt
            .generate_access_token(&subject)
            .expect("Failed to sign token")
            .0
    }

    pub fn admin_token(&self) -> String {
        self.token(&["*"])
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Sends the request and returns the status with the parsed body.
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(request(Method::GET, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(request(Method::PUT, uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(request(Method::DELETE, uri, token, None)).await
    }

    /// Creates a page through the API and returns its id.
    pub async fn create_page(&self, slug: &str, published: bool) -> Uuid {
        let token = self.admin_token();
        let (status, body) = self
            .post(
                "/api/pages",
                Some(&token),
                serde_json::json!({
                    "name": random_title(),
                    "slug": slug,
                    "is_published": published
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create page failed: {}", body);
        id_of(&body["data"])
    }

    /// Catalog id of the given component type.
    pub async fn catalog_id(&self, component_type: &str) -> Uuid {
        let token = self.admin_token();
        let (_, body) = self.get("/api/components", Some(&token)).await;
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["type"] == component_type)
            .map(id_of)
            .unwrap_or_else(|| panic!("no catalog entry for {}", component_type))
    }

    /// Adds a component to a page with the given props and returns its id.
    pub async fn add_component(&self, page_id: Uuid, component_type: &str, props: Value) -> Uuid {
        let token = self.admin_token();
        let component_id = self.catalog_id(component_type).await;
        let (status, body) = self
            .post(
                &format!("/api/pages/{}/components", page_id),
                Some(&token),
                serde_json::json!({"component_id": component_id, "props": props}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add component failed: {}", body);
        id_of(&body["data"])
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut all = vec![("database.url", "postgres://unused@localhost/cms_test")];
    all.extend_from_slice(overrides);
    Config::load_for_test(&all).expect("Failed to load test config")
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub fn id_of(value: &Value) -> Uuid {
    value["id"]
        .as_str()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(|| panic!("missing id in {}", value))
}

pub fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

pub fn random_title() -> String {
    let words: Vec<String> = Words(2..4).fake();
    words.join(" ")
}
