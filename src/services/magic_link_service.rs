use crate::error::AppError;
use crate::models::{AuthResponse, LinkSent, MagicLink, User, UserSummary};
use crate::repositories::{new_id, MagicLinkRepository, RepositoryError};
use crate::services::email_service::{EmailError, EmailService};
use crate::services::token_service::{TokenError, TokenService};
use crate::services::user_service::{normalize_email, UserService, UserServiceError};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::sync::Arc;

/// How long an emailed login link stays valid.
pub const LINK_TTL_MINUTES: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum MagicLinkError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Invalid or expired login link")]
    InvalidOrExpired,
    #[error("User not found")]
    UserNotFound,
    #[error("Email error: {0}")]
    EmailError(#[from] EmailError),
    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl From<UserServiceError> for MagicLinkError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidEmail | UserServiceError::NameTooLong => {
                MagicLinkError::InvalidEmail
            }
            UserServiceError::UserNotFound => MagicLinkError::UserNotFound,
            UserServiceError::RepositoryError(e) => MagicLinkError::RepositoryError(e),
        }
    }
}

impl From<MagicLinkError> for AppError {
    fn from(err: MagicLinkError) -> Self {
        match err {
            MagicLinkError::InvalidEmail => AppError::Validation(err.to_string()),
            MagicLinkError::InvalidOrExpired | MagicLinkError::UserNotFound => {
                AppError::Unauthorized(err.to_string())
            }
            MagicLinkError::EmailError(e) => {
                tracing::error!("Login email could not be sent: {}", e);
                AppError::EmailDelivery
            }
            MagicLinkError::TokenError(e) => AppError::Internal(e.to_string()),
            MagicLinkError::RepositoryError(e) => e.into(),
        }
    }
}

/// A freshly stored link, before (or instead of) delivery.
#[derive(Debug, Clone)]
pub struct IssuedLink {
    pub email: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

pub struct MagicLinkService {
    links: Arc<dyn MagicLinkRepository>,
    user_service: Arc<UserService>,
    tokens: Arc<TokenService>,
    email_service: Box<dyn EmailService>,
    frontend_url: String,
}

impl MagicLinkService {
    pub fn new(
        links: Arc<dyn MagicLinkRepository>,
        user_service: Arc<UserService>,
        tokens: Arc<TokenService>,
        email_service: Box<dyn EmailService>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            links,
            user_service,
            tokens,
            email_service,
            frontend_url: frontend_url.into(),
        }
    }

    fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
        hex::encode(bytes)
    }

    /// Stores a new link for `email`, retiring any unused ones, without sending it.
    pub async fn issue_link(
        &self,
        email: &str,
        remember_me: bool,
    ) -> Result<IssuedLink, MagicLinkError> {
        let email = normalize_email(email)?;
        let now = Utc::now();

        let retired = self.links.invalidate_unused(&email).await?;
        if retired > 0 {
            tracing::debug!("Invalidated {} unused login link(s) for {}", retired, email);
        }

        let link = MagicLink {
            id: new_id(),
            email: email.clone(),
            token: Self::generate_token(),
            used: false,
            remember_me,
            expires_at: now + Duration::minutes(LINK_TTL_MINUTES),
            created_at: now,
        };
        self.links.insert(&link).await?;

        Ok(IssuedLink {
            url: format!("{}/login?token={}", self.frontend_url, link.token),
            email,
            expires_at: link.expires_at,
        })
    }

    /// Issues a link and hands it to the email service. Succeeds whether or not
    /// an account exists for the address.
    pub async fn request_link(
        &self,
        email: &str,
        remember_me: bool,
    ) -> Result<LinkSent, MagicLinkError> {
        let issued = self.issue_link(email, remember_me).await?;

        tracing::info!("Sending login link to: {}", issued.email);
        self.email_service
            .send_magic_link(&issued.email, &issued.url, issued.expires_at)
            .await?;

        Ok(LinkSent { success: true })
    }

    /// Exchanges a login link token for a session token.
    pub async fn verify_link(&self, token: &str) -> Result<AuthResponse, MagicLinkError> {
        self.verify_link_at(token, Utc::now()).await
    }

    pub(crate) async fn verify_link_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthResponse, MagicLinkError> {
        if token.trim().is_empty() {
            return Err(MagicLinkError::InvalidOrExpired);
        }

        let link = self
            .links
            .find_unused_by_token(token)
            .await?
            .ok_or(MagicLinkError::InvalidOrExpired)?;

        if link.is_expired_at(now) {
            return Err(MagicLinkError::InvalidOrExpired);
        }

        if !self.links.mark_used(&link.id).await? {
            return Err(MagicLinkError::InvalidOrExpired);
        }

        let user = self.user_service.find_or_create_by_email(&link.email).await?;
        tracing::info!("User {} logged in via magic link", user.id);

        self.session_for(&user, TokenService::session_ttl(link.remember_me))
    }

    /// Re-issues a short-lived session for an already authenticated user.
    pub async fn refresh(&self, user_id: &str) -> Result<AuthResponse, MagicLinkError> {
        let user = self
            .user_service
            .find_user_by_id(user_id)
            .await?
            .ok_or(MagicLinkError::UserNotFound)?;

        self.session_for(&user, TokenService::session_ttl(false))
    }

    pub async fn cleanup_expired(&self) -> Result<u64, MagicLinkError> {
        let removed = self.links.delete_expired(Utc::now()).await?;
        tracing::info!("Removed {} expired login link(s)", removed);
        Ok(removed)
    }

    fn session_for(&self, user: &User, ttl: Duration) -> Result<AuthResponse, MagicLinkError> {
        let issued = self.tokens.issue(user, ttl)?;
        Ok(AuthResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user: UserSummary::from(user),
        })
    }
}
