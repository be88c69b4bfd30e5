//! Auth handlers: signup, login, refresh-token, logout, profile.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;

use authgate_core::error::AppError;

use crate::dto::request::{LoginRequest, RefreshRequest, SignupRequest};
use crate::dto::response::{
    ApiResponse, Empty, LoginResponse, ProfileResponse, SignupResponse, TokenResponse,
};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, NormalizedJson, ValidatedJson};
use crate::state::AppState;

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    NormalizedJson(req): NormalizedJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SignupResponse>>)> {
    req.validate_with_policy(state.sessions.password_policy())?;

    let user = state
        .sessions
        .register(&req.username, &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "User registered successfully",
            SignupResponse { user: user.into() },
        )),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    let result = state.sessions.login(&req.email, &req.password).await?;

    Ok(Json(ApiResponse::ok("Login successful", result.into())))
}

/// POST /api/auth/refresh-token
///
/// An empty body counts as a missing token (401), not a malformed one.
pub async fn refresh_token(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ApiResponse<TokenResponse>>> {
    let req: RefreshRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?
    };

    let presented = req.into_token()?;

    let tokens = state.sessions.rotate(&presented).await?;

    Ok(Json(ApiResponse::ok(
        "Tokens refreshed successfully",
        tokens.into(),
    )))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Empty>>> {
    state.sessions.logout(auth.user.id).await?;

    Ok(Json(ApiResponse::message("Logout successful")))
}

/// GET /api/auth/profile
pub async fn profile(auth: AuthUser) -> Json<ApiResponse<ProfileResponse>> {
    let AuthUser(ctx) = auth;

    Json(ApiResponse::ok(
        "Profile retrieved successfully",
        ProfileResponse {
            user: ctx.user.into(),
        },
    ))
}
