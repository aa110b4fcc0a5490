use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{ApiResponse, AuthResponse, LinkSent, MagicLinkRequest, Success, VerifyQuery};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};

/// POST /auth/magic-link
pub async fn request_magic_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<MagicLinkRequest>, JsonRejection>,
) -> Result<ApiResponse<LinkSent>, AppError> {
    let Json(request) = payload?;

    let sent = state
        .magic_link_service
        .request_link(&request.email, request.remember_me)
        .await?;

    Ok(ApiResponse::ok(sent).message("If the address is valid, a login link is on its way"))
}

/// GET /auth/verify?token=
pub async fn verify_magic_link_handler(
    State(state): State<AppState>,
    query: Result<Query<VerifyQuery>, QueryRejection>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    let Query(query) = query?;
    let token = query
        .token
        .ok_or_else(|| AppError::Unauthorized("Missing login token".to_string()))?;

    let session = state.magic_link_service.verify_link(&token).await?;
    Ok(ApiResponse::ok(session))
}

/// POST /auth/refresh
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    let session = state.magic_link_service.refresh(&user.id).await?;
    Ok(ApiResponse::ok(session))
}

/// POST /auth/logout
///
/// Sessions are stateless; the client discards its token.
pub async fn logout_handler(user: AuthUser) -> ApiResponse<Success> {
    tracing::debug!("User {} logged out", user.id);
    ApiResponse::ok(Success::yes())
}
