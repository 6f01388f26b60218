//! Grants-directory relay, categories, and the general surface
//! (root banner, health, unknown-route envelope).

mod common;

use axum::http::StatusCode;
use serde_json::json;

use api_core::kernel::test_dependencies::MockGrantsDirectory;
use common::TestApp;

#[tokio::test]
async fn aid_search_is_relayed_with_translated_parameters() {
    let grants = MockGrantsDirectory::with_search_response(json!({
        "count": 1,
        "results": [{"id": 42, "name": "Bike lanes fund"}],
    }));
    let app = TestApp::builder().grants(grants).build();
    let (_, _, token) = app.signup("a@b.com", "Org").await;

    let (status, body) = app
        .get(
            "/proxy/aides-territoires/aids?text=velo&itemsPerPage=20&category_ids=1,2",
            Some(&token),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["count"], 1);

    // the directory saw translated parameters
    let calls = app.grants.search_calls();
    assert_eq!(calls.len(), 1);
    let params = &calls[0];
    assert!(params.contains(&("text".to_string(), "velo".to_string())));
    assert!(params.contains(&("limit".to_string(), "20".to_string())));
    assert!(params.contains(&("category_ids".to_string(), "1".to_string())));
    assert!(params.contains(&("category_ids".to_string(), "2".to_string())));
    assert!(!params.iter().any(|(k, _)| k == "itemsPerPage"));
}

#[tokio::test]
async fn proxy_routes_require_authentication() {
    let app = TestApp::new();

    let (status, _) = app.get("/proxy/aides-territoires/aids", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/proxy/aides-territoires/token", None, json!({}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_relay_wraps_the_directory_token() {
    let app = TestApp::new();
    let (_, _, token) = app.signup("a@b.com", "Org").await;

    let (status, body) = app
        .post("/proxy/aides-territoires/token", Some(&token), json!({}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());
}

#[tokio::test]
async fn backer_lookup_is_relayed_by_id() {
    let app = TestApp::new();
    let (_, _, token) = app.signup("a@b.com", "Org").await;

    let (status, body) = app
        .get("/proxy/aides-territoires/backers/77", Some(&token))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "77");
}

#[tokio::test]
async fn categories_are_grouped_by_theme() {
    let app = TestApp::new();
    let (_, _, token) = app.signup("a@b.com", "Org").await;
    app.store.seed(
        "categories_aides_territoire",
        vec![
            json!({"id": "1", "categorie": "Vélo", "groupe": "Mobilité"}),
            json!({"id": "2", "categorie": "Covoiturage", "groupe": "Mobilité"}),
            json!({"id": "3", "categorie": "Rénovation", "groupe": "Bâtiments"}),
        ],
    );

    let (status, body) = app.get("/categories/aides-territoire", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    let groups = body["data"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["groupe"], "Mobilité");
    assert_eq!(groups[0]["categories"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn root_banner_and_health_are_public() {
    let app = TestApp::new();

    let (status, body) = app.get("/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_routes_answer_with_the_error_envelope() {
    let app = TestApp::new();

    let (status, body) = app.get("/nope/nothing/here", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], "NOT_FOUND");
}
