pub mod board_service;
pub mod email_service;
pub mod exercise_service;
pub mod magic_link_service;
pub mod routine_service;
pub mod token_service;
pub mod user_service;
pub mod workout_record_service;

pub use board_service::BoardService;
pub use email_service::{create_email_service, EmailError, EmailService, LogEmailService};
pub use exercise_service::ExerciseService;
pub use magic_link_service::{IssuedLink, MagicLinkError, MagicLinkService};
pub use routine_service::RoutineService;
pub use token_service::{Claims, TokenError, TokenService};
pub use user_service::{UserService, UserServiceError};
pub use workout_record_service::WorkoutRecordService;

use crate::error::{AppError, Result};

/// Fails with 403 unless `caller_id` owns the resource.
pub(crate) fn ensure_owner(owner_id: &str, caller_id: &str, what: &str) -> Result<()> {
    if owner_id != caller_id {
        tracing::warn!("User {} denied access to {} owned by {}", caller_id, what, owner_id);
        return Err(AppError::Forbidden(format!(
            "You do not have access to this {}",
            what
        )));
    }
    Ok(())
}

/// Trims `value` and checks it is non-empty and at most `max` characters.
pub(crate) fn required_text(value: &str, field: &str, max: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{} must be {} characters or less",
            field, max
        )));
    }
    Ok(trimmed.to_string())
}
