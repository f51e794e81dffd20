//! Password gate for the admin commands

use sha2::{Digest, Sha256};

use crate::config::AdminConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    #[error("Invalid password")]
    InvalidPassword,
    #[error("No admin password configured. Set [admin] password_sha256 in quizgate.toml")]
    NotConfigured,
}

pub struct AdminGate {
    password_sha256: Option<String>,
}

impl AdminGate {
    pub fn new(password_sha256: Option<String>) -> Self {
        Self {
            password_sha256: password_sha256
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty()),
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.password_sha256.clone())
    }

    pub fn verify(&self, password: &str) -> Result<(), AdminError> {
        let expected = self
            .password_sha256
            .as_deref()
            .ok_or(AdminError::NotConfigured)?;
        if hash_password(password) == expected {
            Ok(())
        } else {
            Err(AdminError::InvalidPassword)
        }
    }
}

/// Lowercase hex SHA-256 of the password, as stored in the config.
pub fn hash_password(password: &str) -> String {
    Sha256::digest(password.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
