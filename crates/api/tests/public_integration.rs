//! Public site endpoints: localized products and posts, rate limiting.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{request, TestApp};
use domain::models::{CanonicalEntity, EntityType, FieldMap};
use serde_json::{json, Value};
use uuid::Uuid;

fn fields(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        _ => FieldMap::new(),
    }
}

async fn seed_product(app: &TestApp, slug: &str, published: bool) -> Uuid {
    let id = Uuid::new_v4();
    app.store
        .insert_entity(
            EntityType::Product,
            CanonicalEntity {
                id,
                slug: slug.to_string(),
                fields: fields(json!({
                    "name": "Cotton Kurta",
                    "description": "Hand-stitched",
                    "price": 1499
                })),
            },
            published,
        )
        .await;
    id
}

async fn add_hindi(app: &TestApp) {
    let token = app.admin_token();
    let (status, _) = app
        .post(
            "/api/i18n/languages",
            Some(&token),
            json!({"code": "hi", "name": "Hindi"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_localized_product_overlays_only_translated_fields() {
    let app = TestApp::new();
    add_hindi(&app).await;
    let id = seed_product(&app, "cotton-kurta", true).await;

    let token = app.admin_token();
    app.post(
        "/api/i18n/content",
        Some(&token),
        json!({
            "entity_type": "product",
            "entity_id": id,
            "language_code": "hi",
            "field_name": "name",
            "field_value": "सूती कुर्ता"
        }),
    )
    .await;

    let (status, body) = app
        .get("/api/public/products/cotton-kurta?lang=hi", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["language"], "hi");
    assert_eq!(body["data"]["fields"]["name"], "सूती कुर्ता");
    assert_eq!(body["data"]["fields"]["description"], "Hand-stitched");
    assert_eq!(body["data"]["fields"]["price"], 1499);

    let (_, body) = app
        .get("/api/public/products/cotton-kurta?lang=de", None)
        .await;
    assert_eq!(body["data"]["fields"]["name"], "Cotton Kurta");
}

#[tokio::test]
async fn test_unpublished_or_missing_product_is_not_found() {
    let app = TestApp::new();
    seed_product(&app, "draft-item", false).await;

    let (status, _) = app.get("/api/public/products/draft-item", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/api/public/posts/no-such-post", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Post not found");
}

#[tokio::test]
async fn test_list_products_paginated() {
    let app = TestApp::new();
    for i in 0..3 {
        seed_product(&app, &format!("item-{}", i), true).await;
    }
    seed_product(&app, "hidden", false).await;

    let (status, body) = app.get("/api/public/products?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["data"][0]["language"], "en");

    let (status, body) = app.get("/api/public/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_unpublished_page_is_not_public() {
    let app = TestApp::new();
    app.create_page("draft", false).await;

    let (status, body) = app.get("/api/public/pages/draft", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Page not found");
}

#[tokio::test]
async fn test_hidden_components_are_not_rendered() {
    let app = TestApp::new();
    let token = app.admin_token();
    let page_id = app.create_page("landing", true).await;
    app.add_component(page_id, "hero", json!({"title": "Shown"})).await;
    let hidden = app
        .add_component(page_id, "cta", json!({"title": "Hidden"}))
        .await;
    app.put(
        &format!("/api/pages/components/{}", hidden),
        Some(&token),
        json!({"is_visible": false}),
    )
    .await;

    let (_, body) = app.get("/api/public/pages/landing", None).await;
    let components = body["data"]["components"].as_array().unwrap();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0]["props"]["title"], "Shown");
}

#[tokio::test]
async fn test_public_rate_limit_per_client() {
    let app = TestApp::with_overrides(&[("security.public_rate_limit_per_minute", "2")]);

    let from = |ip: &str| {
        let mut req = request(Method::GET, "/api/public/redirects", None, None);
        req.headers_mut()
            .insert("x-forwarded-for", ip.parse().unwrap());
        req
    };

    assert_eq!(app.send(from("203.0.113.1")).await.status(), StatusCode::OK);
    assert_eq!(app.send(from("203.0.113.1")).await.status(), StatusCode::OK);

    let limited = app.send(from("203.0.113.1")).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers().contains_key(header::RETRY_AFTER));

    // Other clients and admin routes are unaffected
    assert_eq!(app.send(from("203.0.113.2")).await.status(), StatusCode::OK);
    let (status, _) = app.get("/api/pages", Some(&app.admin_token())).await;
    assert_eq!(status, StatusCode::OK);
}
