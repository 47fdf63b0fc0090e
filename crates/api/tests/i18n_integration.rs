//! Language management, translation entries and localized page rendering.

mod common;

use axum::http::StatusCode;
use common::{id_of, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

async fn create_language(app: &TestApp, code: &str, name: &str) -> Value {
    let token = app.token(&["settings.update"]);
    let (status, body) = app
        .post(
            "/api/i18n/languages",
            Some(&token),
            json!({"code": code, "name": name}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create language failed: {}", body);
    body["data"].clone()
}

async fn translate(app: &TestApp, entity_type: &str, entity_id: Uuid, lang: &str, field: &str, value: Value) -> Value {
    let token = app.token(&["settings.update"]);
    let (status, body) = app
        .post(
            "/api/i18n/content",
            Some(&token),
            json!({
                "entity_type": entity_type,
                "entity_id": entity_id,
                "language_code": lang,
                "field_name": field,
                "field_value": value
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "upsert failed: {}", body);
    body["data"].clone()
}

#[tokio::test]
async fn test_language_lifecycle() {
    let app = TestApp::new();
    let reader = app.token(&["settings.read"]);
    let writer = app.token(&["settings.update"]);

    let hindi = create_language(&app, "hi", "Hindi").await;
    assert_eq!(hindi["is_default"], false);
    assert_eq!(hindi["is_active"], true);

    let (status, body) = app.get("/api/i18n/languages", Some(&reader)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .post(
            "/api/i18n/languages",
            Some(&writer),
            json!({"code": "hi", "name": "Hindi again"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = app
        .post(
            "/api/i18n/languages",
            Some(&writer),
            json!({"code": "Hindi", "name": "Hindi"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(
            &format!("/api/i18n/languages/{}", id_of(&hindi)),
            Some(&writer),
            json!({"native_name": "हिन्दी"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["native_name"], "हिन्दी");

    let (status, _) = app
        .delete(&format!("/api/i18n/languages/{}", id_of(&hindi)), Some(&writer))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_default_language_switch_and_protection() {
    let app = TestApp::new();
    let reader = app.token(&["settings.read"]);
    let writer = app.token(&["settings.update"]);
    let hindi = create_language(&app, "hi", "Hindi").await;

    let (_, body) = app.get("/api/i18n/languages", Some(&reader)).await;
    let english = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["code"] == "en")
        .cloned()
        .unwrap();

    let (status, _) = app
        .delete(&format!("/api/i18n/languages/{}", id_of(&english)), Some(&writer))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            &format!("/api/i18n/languages/{}", id_of(&english)),
            Some(&writer),
            json!({"is_default": false}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            &format!("/api/i18n/languages/{}", id_of(&hindi)),
            Some(&writer),
            json!({"is_default": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/i18n/languages", Some(&reader)).await;
    let defaults: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|l| l["is_default"] == true)
        .map(|l| l["code"].as_str().unwrap())
        .collect();
    assert_eq!(defaults, vec!["hi"]);
}

#[tokio::test]
async fn test_translation_entries() {
    let app = TestApp::new();
    let reader = app.token(&["settings.read"]);
    let writer = app.token(&["settings.update"]);
    create_language(&app, "hi", "Hindi").await;
    let entity_id = Uuid::new_v4();

    let first = translate(&app, "post", entity_id, "hi", "title", json!("पहला")).await;
    let replaced = translate(&app, "post", entity_id, "hi", "title", json!("दूसरा")).await;
    assert_eq!(replaced["field_value"], "दूसरा");
    assert_eq!(replaced["language_code"], "hi");
    assert_eq!(first["id"], replaced["id"]);

    let uri = format!(
        "/api/i18n/content?entity_type=post&entity_id={}&language_code=hi",
        entity_id
    );
    let (status, body) = app.get(&uri, Some(&reader)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .delete(&format!("/api/i18n/content/{}", id_of(&first)), Some(&writer))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .delete(&format!("/api/i18n/content/{}", id_of(&first)), Some(&writer))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_translation_for_unknown_language_is_not_found() {
    let app = TestApp::new();
    let writer = app.token(&["settings.update"]);

    let (status, _) = app
        .post(
            "/api/i18n/content",
            Some(&writer),
            json!({
                "entity_type": "page",
                "entity_id": Uuid::new_v4(),
                "language_code": "fr",
                "field_name": "name",
                "field_value": "Accueil"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_query_requires_entity() {
    let app = TestApp::new();
    let reader = app.token(&["settings.read"]);

    let (status, body) = app
        .get("/api/i18n/content?entity_type=lead", Some(&reader))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_public_page_language_fallback() {
    let app = TestApp::new();
    create_language(&app, "hi", "Hindi").await;

    let page_id = app.create_page("home", true).await;
    let hero = app
        .add_component(page_id, "hero", json!({"title": "Welcome", "subtitle": "Hello"}))
        .await;

    let (_, canonical) = app.get("/api/public/pages/home", None).await;
    let canonical_name = canonical["data"]["name"].clone();

    translate(&app, "page", page_id, "hi", "name", json!("मुखपृष्ठ")).await;
    translate(&app, "page_component", hero, "hi", "title", json!("स्वागत")).await;

    let (status, body) = app.get("/api/public/pages/home?lang=hi", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["language"], "hi");
    assert_eq!(body["data"]["name"], "मुखपृष्ठ");
    let props = &body["data"]["components"][0]["props"];
    assert_eq!(props["title"], "स्वागत");
    assert_eq!(props["subtitle"], "Hello");

    // Unknown language falls back to canonical values
    let (status, body) = app.get("/api/public/pages/home?lang=de", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], canonical_name);
    assert_eq!(body["data"]["components"][0]["props"]["title"], "Welcome");

    let (_, body) = app.get("/api/public/pages/home", None).await;
    assert_eq!(body["data"]["language"], "en");
}
