use axum::http::HeaderValue;
use std::env;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    /// Base URL of the browser client; magic links point at `{frontend_url}/login`.
    pub frontend_url: String,
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port_raw = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port_raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
            key: "PORT",
            value: port_raw.clone(),
        })?;
        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3001".to_string())
            .trim_end_matches('/')
            .to_string();
        let cors_origin = env::var("CORS_ORIGIN").unwrap_or_else(|_| frontend_url.clone());

        Ok(Self {
            host,
            port,
            environment: super::current_environment(),
            frontend_url,
            cors_origin,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = self
            .host
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::Invalid {
                key: "HOST",
                value: self.host.clone(),
            })?;
        Ok(SocketAddr::from((ip, self.port)))
    }

    pub fn cors_origin_header(&self) -> Result<HeaderValue, ConfigError> {
        HeaderValue::from_str(&self.cors_origin).map_err(|_| ConfigError::Invalid {
            key: "CORS_ORIGIN",
            value: self.cors_origin.clone(),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: "development".to_string(),
            frontend_url: "http://localhost:3001".to_string(),
            cors_origin: "http://localhost:3001".to_string(),
        }
    }
}
