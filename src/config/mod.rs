pub mod jwt;
pub mod server;

pub use jwt::{validate_production_config, JwtConfig};
pub use server::{ConfigError, ServerConfig};

use std::env;

pub(crate) fn current_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

pub(crate) fn is_production() -> bool {
    current_environment() == "production"
}
