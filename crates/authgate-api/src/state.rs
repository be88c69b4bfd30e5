//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use authgate_auth::{AuthGate, SessionManager, TokenService};
use authgate_core::config::AppConfig;
use authgate_core::result::AppResult;
use authgate_database::UserStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Credential store (PostgreSQL or in-memory)
    pub store: Arc<dyn UserStore>,
    /// Access/refresh token issuance and verification
    pub tokens: Arc<TokenService>,
    /// Signup, login, rotation, logout
    pub sessions: Arc<SessionManager>,
    /// Bearer token authentication
    pub gate: Arc<AuthGate>,
}

impl AppState {
    /// Wires the auth components over an already opened store.
    pub fn new(config: AppConfig, store: Arc<dyn UserStore>) -> AppResult<Self> {
        let tokens = Arc::new(TokenService::new(&config.auth)?);
        let sessions = Arc::new(SessionManager::new(
            store.clone(),
            tokens.clone(),
            &config.auth,
        ));
        let gate = Arc::new(AuthGate::new(tokens.clone(), store.clone()));

        Ok(Self {
            config: Arc::new(config),
            store,
            tokens,
            sessions,
            gate,
        })
    }
}
