mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::{memory_app, send, send_raw};

#[tokio::test]
async fn signup_login_and_lookup() -> anyhow::Result<()> {
    let app = memory_app().await?;

    let (status, body) = send(&app, "POST", "/signup", Some(json!({"username": "alice", "password": "pw1"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let user_id = body["userID"].as_str().unwrap().to_string();
    assert_eq!(user_id.len(), 12);

    let (status, body) = send(&app, "POST", "/login", Some(json!({"username": "alice", "password": "pw1"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(&app, "POST", "/login", Some(json!({"username": "alice", "password": "wrong"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, "GET", "/get-user-id?username=alice", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userID"], user_id.as_str());

    let (status, body) = send(&app, "GET", &format!("/api/user-favorites/{user_id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["favorites"], json!([]));
    Ok(())
}

#[tokio::test]
async fn duplicate_signup_conflicts() -> anyhow::Result<()> {
    let app = memory_app().await?;
    send(&app, "POST", "/signup", Some(json!({"username": "alice", "password": "pw1"}))).await?;

    let (status, body) = send(&app, "POST", "/signup", Some(json!({"username": "alice", "password": "pw2"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // the first password still works
    let (status, _) = send(&app, "POST", "/login", Some(json!({"username": "alice", "password": "pw1"}))).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn unknown_users_are_not_found() -> anyhow::Result<()> {
    let app = memory_app().await?;

    let (status, body) = send(&app, "GET", "/get-user-id?username=ghost", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "GET", "/api/user-favorites/000000000000", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = memory_app().await?;
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn malformed_input_gets_json_error_body() -> anyhow::Result<()> {
    let app = memory_app().await?;

    let (status, body) = send_raw(&app, "POST", "/signup", "{\"username\": ").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 1001);

    let (status, body) = send(&app, "POST", "/login", Some(json!({"username": "alice"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1001);

    let (status, body) = send(&app, "GET", "/get-user-id", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    Ok(())
}
