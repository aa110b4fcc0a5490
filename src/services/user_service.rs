use crate::error::AppError;
use crate::models::{UpdateProfileRequest, User};
use crate::repositories::{RepositoryError, UserRepository};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

const MAX_NAME_CHARS: usize = 50;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Name must be 50 characters or less")]
    NameTooLong,
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidEmail | UserServiceError::NameTooLong => {
                AppError::Validation(err.to_string())
            }
            UserServiceError::UserNotFound => AppError::NotFound("User not found".to_string()),
            UserServiceError::RepositoryError(e) => e.into(),
        }
    }
}

/// Trims and lowercases an address, then checks it has the `local@domain.tld` shape.
pub fn normalize_email(raw: &str) -> Result<String, UserServiceError> {
    let email = raw.trim().to_lowercase();
    if email.len() > 255 || !EMAIL_PATTERN.is_match(&email) {
        return Err(UserServiceError::InvalidEmail);
    }
    Ok(email)
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Looks the user up by normalized email, creating the account on first login.
    pub async fn find_or_create_by_email(&self, email: &str) -> Result<User, UserServiceError> {
        let email = normalize_email(email)?;

        if let Some(user) = self.repository.find_by_email(&email).await? {
            return Ok(user);
        }

        match self.repository.create_user(&email).await {
            Ok(user) => {
                tracing::info!("Created account for {}", email);
                Ok(user)
            }
            // A concurrent login created it between the lookup and the insert.
            Err(RepositoryError::AlreadyExists) => self
                .repository
                .find_by_email(&email)
                .await?
                .ok_or(UserServiceError::UserNotFound),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        let email = normalize_email(email)?;
        Ok(self.repository.find_by_email(&email).await?)
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn get_user(&self, id: &str) -> Result<User, UserServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserServiceError::UserNotFound)
    }

    /// A blank name clears it.
    pub async fn update_profile(
        &self,
        id: &str,
        request: UpdateProfileRequest,
    ) -> Result<User, UserServiceError> {
        let name = request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if let Some(ref name) = name {
            if name.chars().count() > MAX_NAME_CHARS {
                return Err(UserServiceError::NameTooLong);
            }
        }

        match self.repository.update_name(id, name).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users(limit, offset).await?)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), UserServiceError> {
        match self.repository.delete_user(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(e.into()),
        }
    }
}
