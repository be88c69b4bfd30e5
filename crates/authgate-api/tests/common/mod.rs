//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use authgate_api::{AppState, build_router};
use authgate_auth::{AuthGate, SessionManager, TokenService};
use authgate_core::config::{AppConfig, AuthConfig, DatabaseProvider};
use authgate_database::MemoryUserRepository;

/// A router over a fresh in-memory store.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub repo: MemoryUserRepository,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.provider = DatabaseProvider::Memory;
    config.auth = AuthConfig {
        access_secret: "integration-access-secret".to_string(),
        refresh_secret: "integration-refresh-secret".to_string(),
        ..AuthConfig::default()
    };
    config
}

pub fn spawn_app() -> TestApp {
    let repo = MemoryUserRepository::new();
    let state = AppState::new(test_config(), Arc::new(repo.clone())).unwrap();
    TestApp {
        router: build_router(state.clone()),
        state,
        repo,
    }
}

/// Like [`spawn_app`] but with explicit token lifetimes.
pub fn spawn_app_with_lifetimes(access: chrono::Duration, refresh: chrono::Duration) -> TestApp {
    let config = test_config();
    let repo = MemoryUserRepository::new();
    let store: Arc<dyn authgate_database::UserStore> = Arc::new(repo.clone());
    let tokens = Arc::new(
        TokenService::new(&config.auth)
            .unwrap()
            .with_lifetimes(access, refresh),
    );
    let sessions = Arc::new(SessionManager::new(store.clone(), tokens.clone(), &config.auth));
    let gate = Arc::new(AuthGate::new(tokens.clone(), store.clone()));

    let state = AppState {
        config: Arc::new(config),
        store,
        tokens,
        sessions,
        gate,
    };
    TestApp {
        router: build_router(state.clone()),
        state,
        repo,
    }
}

impl TestApp {
    /// Sends a request and returns the status and parsed JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    /// Sends a prepared request.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/signup",
            serde_json::json!({"username": username, "email": email, "password": password}),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/login",
            serde_json::json!({"email": email, "password": password}),
        )
        .await
    }

    pub async fn refresh(&self, token: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/refresh-token",
            serde_json::json!({"refreshToken": token}),
        )
        .await
    }

    /// Signs up alice01 and logs in, returning (access, refresh).
    pub async fn logged_in_alice(&self) -> (String, String) {
        let (status, _) = self.signup("alice01", "a@x.com", "secret1").await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self.login("a@x.com", "secret1").await;
        assert_eq!(status, StatusCode::OK);
        (
            body["accessToken"].as_str().unwrap().to_string(),
            body["refreshToken"].as_str().unwrap().to_string(),
        )
    }
}
