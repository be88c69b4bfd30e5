//! End-to-end auth flows against the router with an in-memory store.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::json;

use authgate_core::types::UserId;
use authgate_database::UserStore;

use common::{spawn_app, spawn_app_with_lifetimes};

#[tokio::test]
async fn signup_creates_user_and_rejects_duplicates() {
    let app = spawn_app();

    let (status, body) = app.signup("alice01", "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["username"], "alice01");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body.get("accessToken").is_none());

    let stored = app.repo.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "secret1");

    let (status, body) = app.signup("alice02", "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "User with this email or username already exists"
    );

    let (status, _) = app.signup("alice01", "other@x.com", "secret1").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_normalizes_input() {
    let app = spawn_app();

    let (status, body) = app.signup("  alice01 ", "A@X.COM", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "alice01");
    assert_eq!(body["user"]["email"], "a@x.com");

    let (status, _) = app.login("a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn signup_validation_failures_are_400_with_field_errors() {
    let app = spawn_app();

    let (status, body) = app.signup("ab", "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["field"], "username");

    let (status, body) = app.signup("bad-name!", "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"][0]["message"],
        "Username can only contain letters, numbers, and underscores"
    );

    let (status, body) = app.signup("alice01", "nope", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "email");

    let (status, body) = app.signup("alice01", "a@x.com", "abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "password");

    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn signup_reports_all_failing_fields_together() {
    let app = spawn_app();

    let (status, body) = app.signup("ab", "a@x.com", "abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"username"));
    assert!(fields.contains(&"password"));

    let (status, body) = app
        .post(
            "/api/auth/signup",
            json!({"username": "alice01", "email": "a@x.com"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"][0]["field"], "password");
    assert_eq!(
        body["errors"][0]["message"],
        "Password must be at least 6 characters long"
    );

    assert!(app.repo.is_empty().await);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = spawn_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/refresh-token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("[1,"))
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_bad_credentials_and_issues_tokens() {
    let app = spawn_app();
    app.signup("alice01", "a@x.com", "secret1").await;

    let (status, body) = app.login("a@x.com", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, unknown) = app.login("nobody@x.com", "secret1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["message"], body["message"]);

    let (status, body) = app.login("a@x.com", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "password");

    let (status, body) = app.login("a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["username"], "alice01");

    let access = body["accessToken"].as_str().unwrap();
    let refresh = body["refreshToken"].as_str().unwrap();
    let from_access = app.state.tokens.verify_access_token(access).unwrap();
    let from_refresh = app.state.tokens.verify_refresh_token(refresh).unwrap();
    assert_eq!(from_access, from_refresh);
    assert_eq!(
        from_access.user_id.to_string(),
        body["user"]["id"].as_str().unwrap()
    );
}

#[tokio::test]
async fn profile_requires_a_valid_access_token() {
    let app = spawn_app();
    let (access, refresh) = app.logged_in_alice().await;

    let (status, body) = app
        .request(Method::GET, "/api/auth/profile", None, Some(&access))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile retrieved successfully");
    assert_eq!(body["user"]["username"], "alice01");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"]["createdAt"].is_string());
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("refresh_token").is_none());

    let (status, body) = app
        .request(Method::GET, "/api/auth/profile", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Access token required");

    let (status, body) = app
        .request(Method::GET, "/api/auth/profile", None, Some("garbage"))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid or expired access token");

    let (status, _) = app
        .request(Method::GET, "/api/auth/profile", None, Some(&refresh))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn profile_for_deleted_user_is_401() {
    let app = spawn_app();
    let (access, _) = app.logged_in_alice().await;

    let payload = app.state.tokens.verify_access_token(&access).unwrap();
    let id: UserId = payload.user_id;
    assert!(app.repo.remove(id).await);

    let (status, body) = app
        .request(Method::GET, "/api/auth/profile", None, Some(&access))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token - user not found");
}

#[tokio::test]
async fn refresh_rotates_and_old_token_is_single_use() {
    let app = spawn_app();
    let (_, refresh) = app.logged_in_alice().await;

    let (status, body) = app.refresh(&refresh).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Tokens refreshed successfully");
    let rotated = body["refreshToken"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);
    assert!(body["accessToken"].is_string());

    let (status, body) = app.refresh(&refresh).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid refresh token");

    let (status, _) = app.refresh(&rotated).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_without_token_is_401() {
    let app = spawn_app();

    let (status, body) = app.post("/api/auth/refresh-token", json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Refresh token required");

    let (status, _) = app
        .post("/api/auth/refresh-token", json!({"refreshToken": ""}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::POST, "/api/auth/refresh-token", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_with_garbage_or_access_token_is_403() {
    let app = spawn_app();
    let (access, _) = app.logged_in_alice().await;

    let (status, body) = app.refresh("not-a-token").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid or expired refresh token");

    let (status, _) = app.refresh(&access).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post("/api/auth/refresh-token", json!({"refreshToken": 123}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid or expired refresh token");
}

#[tokio::test]
async fn expired_refresh_token_is_403() {
    let app = spawn_app_with_lifetimes(
        chrono::Duration::minutes(15),
        chrono::Duration::seconds(-120),
    );
    let (access, refresh) = app.logged_in_alice().await;

    let (status, body) = app.refresh(&refresh).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Invalid or expired refresh token");

    let (status, _) = app
        .request(Method::GET, "/api/auth/profile", None, Some(&access))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn expired_access_token_is_403() {
    let app = spawn_app_with_lifetimes(
        chrono::Duration::seconds(-120),
        chrono::Duration::days(7),
    );
    let (access, _) = app.logged_in_alice().await;

    let (status, _) = app
        .request(Method::GET, "/api/auth/profile", None, Some(&access))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_clears_refresh_token_but_not_access_token() {
    let app = spawn_app();
    let (access, refresh) = app.logged_in_alice().await;

    let (status, body) = app
        .request(Method::POST, "/api/auth/logout", None, Some(&access))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Logout successful"}));

    let (status, _) = app.refresh(&refresh).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::GET, "/api/auth/profile", None, Some(&access))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn logout_requires_authentication() {
    let app = spawn_app();

    let (status, _) = app
        .request(Method::POST, "/api/auth/logout", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn second_login_supersedes_first_refresh_token() {
    let app = spawn_app();
    let (first_access, first_refresh) = app.logged_in_alice().await;

    let (status, body) = app.login("a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    let second_refresh = body["refreshToken"].as_str().unwrap().to_string();

    let (status, _) = app.refresh(&first_refresh).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.refresh(&second_refresh).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::GET, "/api/auth/profile", None, Some(&first_access))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = spawn_app();

    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn health_is_503_when_store_is_down() {
    let app = spawn_app();
    app.repo.close().await;

    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unavailable");
}
