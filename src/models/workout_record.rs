use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: String,
    pub user_id: String,
    pub routine_id: Option<String>,
    pub routine_name: String,
    pub date: DateTime<Utc>,
    /// Seconds.
    pub duration: i64,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of an exercise as it was when the workout was logged.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedExercise {
    pub id: String,
    pub workout_record_id: String,
    pub exercise_id: String,
    pub position: i64,
    pub name: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecordDetail {
    #[serde(flatten)]
    pub record: WorkoutRecord,
    pub completed_exercises: Vec<CompletedExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRecordRequest {
    pub routine_id: String,
    /// Accepted for client compatibility; the stored routine's name wins.
    pub routine_name: Option<String>,
    pub date: DateTime<Utc>,
    pub duration: i64,
    #[serde(default)]
    pub completed_exercises: Vec<String>,
}
