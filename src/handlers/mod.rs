pub mod auth_handlers;
pub mod board_handlers;
pub mod exercise_handlers;
pub mod health_handlers;
pub mod routine_handlers;
pub mod user_handlers;
pub mod workout_record_handlers;

pub use auth_handlers::*;
pub use board_handlers::*;
pub use exercise_handlers::*;
pub use health_handlers::*;
pub use routine_handlers::*;
pub use user_handlers::*;
pub use workout_record_handlers::*;
