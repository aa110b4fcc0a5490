use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{
    ApiResponse, CreateRoutineRequest, RoutineDetail, Success, UpdateRoutineRequest,
};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

pub async fn list_routines_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<ApiResponse<Vec<RoutineDetail>>, AppError> {
    let routines = state.routine_service.list_routines(&user.id).await?;
    Ok(ApiResponse::ok(routines))
}

pub async fn get_routine_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<RoutineDetail>, AppError> {
    let routine = state.routine_service.get_routine(&id, &user.id).await?;
    Ok(ApiResponse::ok(routine))
}

pub async fn create_routine_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateRoutineRequest>, JsonRejection>,
) -> Result<ApiResponse<RoutineDetail>, AppError> {
    let Json(request) = payload?;
    let routine = state
        .routine_service
        .create_routine(&user.id, request)
        .await?;
    Ok(ApiResponse::created(routine).message("Routine created"))
}

pub async fn update_routine_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateRoutineRequest>, JsonRejection>,
) -> Result<ApiResponse<RoutineDetail>, AppError> {
    let Json(request) = payload?;
    let routine = state
        .routine_service
        .update_routine(&id, &user.id, request)
        .await?;
    Ok(ApiResponse::ok(routine).message("Routine updated"))
}

pub async fn delete_routine_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Success>, AppError> {
    state.routine_service.delete_routine(&id, &user.id).await?;
    Ok(ApiResponse::ok(Success::yes()).message("Routine deleted"))
}
