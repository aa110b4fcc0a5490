pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod router;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

pub use router::build_router;

use repositories::{
    SqliteCommentRepository, SqliteExerciseRepository, SqliteMagicLinkRepository,
    SqlitePostRepository, SqliteRoutineRepository, SqliteUserRepository,
    SqliteWorkoutRecordRepository,
};
use services::{
    BoardService, EmailService, ExerciseService, MagicLinkService, RoutineService, TokenService,
    UserService, WorkoutRecordService,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub magic_link_service: Arc<MagicLinkService>,
    pub token_service: Arc<TokenService>,
    pub routine_service: Arc<RoutineService>,
    pub exercise_service: Arc<ExerciseService>,
    pub workout_record_service: Arc<WorkoutRecordService>,
    pub board_service: Arc<BoardService>,
    pub pool: sqlx::SqlitePool,
}

impl AppState {
    /// Wires the SQLite repositories into every service.
    pub fn new(
        pool: sqlx::SqlitePool,
        jwt_config: &config::JwtConfig,
        email_service: Box<dyn EmailService>,
        frontend_url: &str,
    ) -> Self {
        let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
        let magic_link_repository = Arc::new(SqliteMagicLinkRepository::new(pool.clone()));
        let routine_repository = Arc::new(SqliteRoutineRepository::new(pool.clone()));
        let exercise_repository = Arc::new(SqliteExerciseRepository::new(pool.clone()));
        let workout_record_repository = Arc::new(SqliteWorkoutRecordRepository::new(pool.clone()));
        let post_repository = Arc::new(SqlitePostRepository::new(pool.clone()));
        let comment_repository = Arc::new(SqliteCommentRepository::new(pool.clone()));

        let token_service = Arc::new(TokenService::new(jwt_config));
        let user_service = Arc::new(UserService::new(user_repository.clone()));
        let magic_link_service = Arc::new(MagicLinkService::new(
            magic_link_repository,
            user_service.clone(),
            token_service.clone(),
            email_service,
            frontend_url,
        ));
        let routine_service = Arc::new(RoutineService::new(
            routine_repository.clone(),
            exercise_repository.clone(),
        ));
        let exercise_service = Arc::new(ExerciseService::new(
            exercise_repository.clone(),
            routine_repository.clone(),
        ));
        let workout_record_service = Arc::new(WorkoutRecordService::new(
            workout_record_repository,
            routine_repository,
            exercise_repository,
        ));
        let board_service = Arc::new(BoardService::new(
            post_repository,
            comment_repository,
            user_repository,
        ));

        Self {
            user_service,
            magic_link_service,
            token_service,
            routine_service,
            exercise_service,
            workout_record_service,
            board_service,
            pool,
        }
    }
}
