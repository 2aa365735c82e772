mod common;

use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_redirect_success() {
    let (server, _store) = common::create_test_server();
    let token = common::register_and_login(&server, "alice").await;
    let created = common::shorten(&server, &token, "https://example.com/target").await;
    let code = created["shortUrlCode"].as_str().unwrap();

    let response = server.get(&format!("/{code}")).await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_counts_visit() {
    let (server, _store) = common::create_test_server();
    let token = common::register_and_login(&server, "alice").await;
    let created = common::shorten(&server, &token, "https://example.com/target").await;
    let code = created["shortUrlCode"].as_str().unwrap();

    server
        .get(&format!("/{code}"))
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);

    let visits = server
        .get(&format!("/api/v1/url/visits/{code}"))
        .authorization_bearer(&token)
        .await
        .json::<Value>();

    assert_eq!(visits["visits"], 1);
}

#[tokio::test]
async fn test_redirect_percent_encodes_location() {
    let (server, _store) = common::create_test_server();
    let token = common::register_and_login(&server, "alice").await;
    let created = common::shorten(&server, &token, "https://example.com/café").await;
    let code = created["shortUrlCode"].as_str().unwrap();

    let response = server.get(&format!("/{code}")).await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/caf%C3%A9");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (server, _store) = common::create_test_server();

    let response = server.get("/nonexistent").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["path"], "/nonexistent");
}

#[tokio::test]
async fn test_redirect_expired() {
    let (server, store) = common::create_test_server();
    let owner_id = common::register(&server, "alice").await;
    common::insert_expired(&store, owner_id, "Expired1").await;

    let response = server.get("/Expired1").await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["message"], "Short URL has expired");
}
