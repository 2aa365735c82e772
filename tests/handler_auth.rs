mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_register_success() {
    let (server, _store) = common::create_test_server();

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "login": "alice",
            "email": "Alice@Example.com",
            "password": "Secret123"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<Value>();
    assert!(json["id"].is_i64());
    assert_eq!(json["login"], "alice");
    assert_eq!(json["email"], "alice@example.com");
    assert!(json["createdAt"].is_string());
    assert!(json.get("password").is_none());
    assert!(json.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_login() {
    let (server, _store) = common::create_test_server();
    common::register(&server, "alice").await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "login": "alice",
            "email": "other@example.com",
            "password": "Secret123"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["message"], "Login is already taken");
}

#[tokio::test]
async fn test_register_duplicate_email_case_insensitive() {
    let (server, _store) = common::create_test_server();
    common::register(&server, "alice").await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "login": "alice2",
            "email": "ALICE@example.com",
            "password": "Secret123"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>()["message"],
        "Email is already registered"
    );
}

#[tokio::test]
async fn test_register_validation_errors() {
    let (server, _store) = common::create_test_server();

    let cases = [
        json!({ "login": "al", "email": "al@example.com", "password": "Secret123" }),
        json!({ "login": "bad login", "email": "b@example.com", "password": "Secret123" }),
        json!({ "login": "carol", "email": "not-an-email", "password": "Secret123" }),
        json!({ "login": "dave", "email": "dave@example.com", "password": "short1" }),
        json!({ "login": "erin", "email": "erin@example.com", "password": "lettersonly" }),
    ];

    for body in cases {
        let response = server.post("/api/v1/auth/register").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<Value>();
        assert_eq!(json["status"], 400);
        assert_eq!(json["path"], "/api/v1/auth/register");
    }
}

#[tokio::test]
async fn test_register_malformed_json() {
    let (server, _store) = common::create_test_server();

    let response = server
        .post("/api/v1/auth/register")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Bad Request");
}

#[tokio::test]
async fn test_login_with_login_and_email() {
    let (server, _store) = common::create_test_server();
    common::register(&server, "alice").await;

    for identifier in ["alice", "ALICE@example.com"] {
        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({ "identifier": identifier, "password": common::PASSWORD }))
            .await;

        response.assert_status_ok();

        let json = response.json::<Value>();
        assert_eq!(json["token"].as_str().unwrap().len(), 48);
        assert_eq!(json["tokenType"], "Bearer");
        assert!(json["expiresAt"].is_string());
    }
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (server, _store) = common::create_test_server();
    common::register(&server, "alice").await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "identifier": "alice", "password": "Wrong1234" }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(
        response.json::<Value>()["message"],
        "Invalid login or password"
    );
}

#[tokio::test]
async fn test_login_unknown_user_same_message() {
    let (server, _store) = common::create_test_server();

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "identifier": "nobody", "password": "Secret123" }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(
        response.json::<Value>()["message"],
        "Invalid login or password"
    );
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let (server, _store) = common::create_test_server();
    let token = common::register_and_login(&server, "alice").await;

    server
        .get("/api/v1/url/all")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    server
        .post("/api/v1/auth/logout")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get("/api/v1/url/all")
        .authorization_bearer(&token)
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_logout_keeps_other_sessions() {
    let (server, _store) = common::create_test_server();
    let first = common::register_and_login(&server, "alice").await;
    let second = common::login(&server, "alice").await;

    server
        .post("/api/v1/auth/logout")
        .authorization_bearer(&first)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get("/api/v1/url/all")
        .authorization_bearer(&second)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (server, _store) = common::create_test_server();

    let response = server.get("/api/v1/url/all").await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");

    let json = response.json::<Value>();
    assert_eq!(json["status"], 401);
    assert_eq!(json["error"], "Unauthorized");
    assert_eq!(json["path"], "/api/v1/url/all");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let (server, _store) = common::create_test_server();

    server
        .get("/api/v1/url/all")
        .authorization_bearer("not-a-real-token")
        .await
        .assert_status_unauthorized();
}
