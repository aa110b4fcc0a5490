use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use std::env;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Failed to build email message: {0}")]
    MessageBuild(String),
    #[error("Failed to send email: {0}")]
    SendFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send_magic_link(
        &self,
        to_email: &str,
        link_url: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), EmailError>;
}

/// Writes login links to the log instead of mailing them.
pub struct LogEmailService;

#[async_trait]
impl EmailService for LogEmailService {
    async fn send_magic_link(
        &self,
        to_email: &str,
        link_url: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), EmailError> {
        tracing::info!("📧 [DEV EMAIL] Magic login link to: {}", to_email);
        tracing::info!("   Login link: {}", link_url);
        tracing::info!("   Expires at: {}", expires_at.to_rfc3339());
        tracing::info!("   ---");
        Ok(())
    }
}

pub struct SmtpEmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: String,
}

impl SmtpEmailService {
    pub fn new() -> Result<Self, EmailError> {
        let smtp_host = env::var("SMTP_HOST")
            .map_err(|_| EmailError::ConfigError("SMTP_HOST not set".to_string()))?;
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|_| EmailError::ConfigError("Invalid SMTP_PORT".to_string()))?;
        let smtp_username = env::var("SMTP_USERNAME")
            .map_err(|_| EmailError::ConfigError("SMTP_USERNAME not set".to_string()))?;
        let smtp_password = env::var("SMTP_PASSWORD")
            .map_err(|_| EmailError::ConfigError("SMTP_PASSWORD not set".to_string()))?;
        let from_email = env::var("SMTP_FROM_EMAIL")
            .map_err(|_| EmailError::ConfigError("SMTP_FROM_EMAIL not set".to_string()))?;
        let from_name = env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "LiftLink".to_string());

        let encryption = env::var("SMTP_ENCRYPTION").unwrap_or_else(|_| "starttls".to_string());

        let credentials = Credentials::new(smtp_username, smtp_password);

        let mailer = match encryption.to_lowercase().as_str() {
            "tls" => AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp_host)
                .map_err(|e| EmailError::ConfigError(format!("SMTP relay error: {}", e)))?
                .port(smtp_port)
                .credentials(credentials)
                .build(),
            "starttls" => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_host)
                .map_err(|e| EmailError::ConfigError(format!("SMTP starttls error: {}", e)))?
                .port(smtp_port)
                .credentials(credentials)
                .build(),
            "none" => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp_host)
                .port(smtp_port)
                .credentials(credentials)
                .build(),
            _ => {
                return Err(EmailError::ConfigError(format!(
                    "Invalid SMTP_ENCRYPTION value: {}. Use 'tls', 'starttls', or 'none'",
                    encryption
                )))
            }
        };

        Ok(Self {
            mailer,
            from_email,
            from_name,
        })
    }
}

/// Whole minutes left before `expires_at`, rounded up and never below one.
pub(crate) fn minutes_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expires_at - now).num_milliseconds();
    ((millis + 59_999) / 60_000).max(1)
}

pub(crate) fn magic_link_html(link_url: &str, minutes_valid: i64) -> String {
    format!(
        r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
</head>
<body style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h1 style="color: #333;">Log in to LiftLink</h1>
    <p>Click the button below to log in:</p>
    <p style="text-align: center; margin: 30px 0;">
        <a href="{url}" style="background-color: #00D982; color: #000000; padding: 12px 24px; text-decoration: none; border-radius: 4px; display: inline-block;">Log in</a>
    </p>
    <p style="color: #666; font-size: 14px;">Or copy and paste this link into your browser:</p>
    <p style="color: #666; font-size: 14px; word-break: break-all;">{url}</p>
    <p style="color: #999; font-size: 12px; margin-top: 40px;">This link is valid for {minutes} minutes and can be used once. If you didn't request it, you can safely ignore this email.</p>
</body>
</html>
"#,
        url = link_url,
        minutes = minutes_valid
    )
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_magic_link(
        &self,
        to_email: &str,
        link_url: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), EmailError> {
        let minutes_valid = minutes_until(expires_at, Utc::now());
        let html_body = magic_link_html(link_url, minutes_valid);

        let email = Message::builder()
            .from(
                format!("{} <{}>", self.from_name, self.from_email)
                    .parse()
                    .map_err(|e| {
                        EmailError::MessageBuild(format!("Invalid from address: {}", e))
                    })?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::MessageBuild(format!("Invalid to address: {}", e)))?)
            .subject("Your LiftLink login link")
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| EmailError::MessageBuild(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        Ok(())
    }
}

/// Production mails through SMTP; every other environment logs the link.
pub fn create_email_service(production: bool) -> Result<Box<dyn EmailService>, EmailError> {
    if production {
        let service = SmtpEmailService::new()?;
        tracing::info!("Using SMTP email service");
        Ok(Box::new(service))
    } else {
        tracing::info!("Non-production environment: magic links will be written to the log");
        Ok(Box::new(LogEmailService))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_minutes_until_rounds_up() {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(30);

        let moments_later = now + chrono::Duration::milliseconds(5);
        assert_eq!(minutes_until(expires_at, moments_later), 30);
        assert_eq!(minutes_until(expires_at, now), 30);
        assert_eq!(
            minutes_until(expires_at, now + chrono::Duration::seconds(90)),
            29
        );
        assert_eq!(minutes_until(expires_at, expires_at), 1);
        assert_eq!(
            minutes_until(expires_at, expires_at + chrono::Duration::minutes(5)),
            1
        );
    }

    #[tokio::test]
    async fn test_log_service_always_succeeds() {
        let service = LogEmailService;
        let result = service
            .send_magic_link("a@x.com", "http://localhost:3001/login?token=abc", Utc::now())
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_html_embeds_link_and_lifetime() {
        let html = magic_link_html("http://localhost:3001/login?token=abc", 30);
        assert_eq!(html.matches("http://localhost:3001/login?token=abc").count(), 2);
        assert!(html.contains("valid for 30 minutes"));
    }

    #[test]
    #[serial]
    fn test_production_without_smtp_is_config_error() {
        env::remove_var("SMTP_HOST");
        let result = create_email_service(true);
        assert!(matches!(result, Err(EmailError::ConfigError(_))));
    }

    #[test]
    fn test_development_uses_log_service() {
        assert!(create_email_service(false).is_ok());
    }
}
