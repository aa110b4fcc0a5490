use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{
    ApiResponse, CreateExerciseRequest, Exercise, Success, UpdateExerciseRequest,
};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

/// GET /routines/{routine_id}/exercises
pub async fn list_exercises_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(routine_id): Path<String>,
) -> Result<ApiResponse<Vec<Exercise>>, AppError> {
    let exercises = state
        .exercise_service
        .list_for_routine(&routine_id, &user.id)
        .await?;
    Ok(ApiResponse::ok(exercises))
}

/// POST /routines/{routine_id}/exercises
pub async fn create_exercise_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(routine_id): Path<String>,
    payload: Result<Json<CreateExerciseRequest>, JsonRejection>,
) -> Result<ApiResponse<Exercise>, AppError> {
    let Json(request) = payload?;
    let exercise = state
        .exercise_service
        .add_exercise(&routine_id, &user.id, request)
        .await?;
    Ok(ApiResponse::created(exercise).message("Exercise added"))
}

pub async fn get_exercise_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Exercise>, AppError> {
    let exercise = state.exercise_service.get_exercise(&id, &user.id).await?;
    Ok(ApiResponse::ok(exercise))
}

pub async fn update_exercise_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateExerciseRequest>, JsonRejection>,
) -> Result<ApiResponse<Exercise>, AppError> {
    let Json(request) = payload?;
    let exercise = state
        .exercise_service
        .update_exercise(&id, &user.id, request)
        .await?;
    Ok(ApiResponse::ok(exercise).message("Exercise updated"))
}

pub async fn delete_exercise_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Success>, AppError> {
    state.exercise_service.delete_exercise(&id, &user.id).await?;
    Ok(ApiResponse::ok(Success::yes()).message("Exercise deleted"))
}
