use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{ApiResponse, UpdateProfileRequest, User};
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};

/// GET /users/me
pub async fn get_profile_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<ApiResponse<User>, AppError> {
    let profile = state.user_service.get_user(&user.id).await?;
    Ok(ApiResponse::ok(profile))
}

/// PUT /users/me
pub async fn update_profile_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<ApiResponse<User>, AppError> {
    let Json(request) = payload?;
    let profile = state.user_service.update_profile(&user.id, request).await?;
    Ok(ApiResponse::ok(profile).message("Profile updated"))
}
