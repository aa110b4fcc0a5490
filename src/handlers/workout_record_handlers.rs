use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{ApiResponse, CreateWorkoutRecordRequest, Success, WorkoutRecordDetail};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

pub async fn list_workout_records_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<ApiResponse<Vec<WorkoutRecordDetail>>, AppError> {
    let records = state.workout_record_service.list_records(&user.id).await?;
    Ok(ApiResponse::ok(records))
}

pub async fn get_workout_record_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<WorkoutRecordDetail>, AppError> {
    let record = state
        .workout_record_service
        .get_record(&id, &user.id)
        .await?;
    Ok(ApiResponse::ok(record))
}

pub async fn create_workout_record_handler(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateWorkoutRecordRequest>, JsonRejection>,
) -> Result<ApiResponse<WorkoutRecordDetail>, AppError> {
    let Json(request) = payload?;
    let record = state
        .workout_record_service
        .create_record(&user.id, request)
        .await?;
    Ok(ApiResponse::created(record).message("Workout recorded"))
}

pub async fn delete_workout_record_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<Success>, AppError> {
    state
        .workout_record_service
        .delete_record(&id, &user.id)
        .await?;
    Ok(ApiResponse::ok(Success::yes()).message("Workout record deleted"))
}
