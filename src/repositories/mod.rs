pub mod comment_repository;
pub mod exercise_repository;
pub mod magic_link_repository;
pub mod post_repository;
pub mod routine_repository;
pub mod user_repository;
pub mod workout_record_repository;

pub use comment_repository::{CommentRepository, SqliteCommentRepository};
pub use exercise_repository::{ExerciseRepository, SqliteExerciseRepository};
pub use magic_link_repository::{MagicLinkRepository, SqliteMagicLinkRepository};
pub use post_repository::{PostRepository, SqlitePostRepository};
pub use routine_repository::{RoutineRepository, SqliteRoutineRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};
pub use workout_record_repository::{SqliteWorkoutRecordRepository, WorkoutRecordRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Record already exists")]
    AlreadyExists,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn map_unique_violation(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::AlreadyExists,
        _ => RepositoryError::Database(err),
    }
}
