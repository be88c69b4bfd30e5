//! Bearer token authentication middleware.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

/// Rejects requests without a valid access token and attaches the
/// resulting `AuthContext` to the request extensions.
///
/// Missing token or vanished user: 401. Invalid or expired token: 403.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let ctx = state.gate.authenticate(header.as_deref()).await?;
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}
