use std::env;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha512};
use tracing::warn;

const MIN_SECRET_BYTES: usize = 64;

/// Signing material for session tokens.
#[derive(Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,
    pub issuer: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "liftlink".to_string());
        Self {
            secret: load_signing_key(),
            issuer,
        }
    }

    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            secret: key_from_secret_bytes(secret),
            issuer: "liftlink".to_string(),
        }
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

pub fn validate_production_config() {
    if !super::is_production() {
        return;
    }

    let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set in production");
    let decoded_secret = decode_secret_bytes(&secret);

    if decoded_secret.len() < MIN_SECRET_BYTES {
        panic!("FATAL: JWT_SECRET must be at least 64 bytes in production");
    }

    let lowered = secret.to_ascii_lowercase();
    if lowered.contains("example") || lowered.contains("changeme") || lowered.contains("secret") {
        panic!("FATAL: JWT_SECRET appears to be a placeholder value. Generate a secure secret!");
    }
}

fn load_signing_key() -> Vec<u8> {
    match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => {
            let bytes = decode_secret_bytes(&secret);
            key_from_secret_bytes(&bytes)
        }
        _ => {
            warn!("JWT_SECRET not set; generating ephemeral key (development only)");
            let mut bytes = vec![0u8; MIN_SECRET_BYTES];
            rand::thread_rng().fill_bytes(&mut bytes);
            bytes
        }
    }
}

fn decode_secret_bytes(secret: &str) -> Vec<u8> {
    STANDARD
        .decode(secret.as_bytes())
        .unwrap_or_else(|_| secret.as_bytes().to_vec())
}

fn key_from_secret_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() >= MIN_SECRET_BYTES {
        bytes.to_vec()
    } else {
        Sha512::digest(bytes).to_vec()
    }
}
