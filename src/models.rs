//! Data models and structures
//!
//! Defines conversation turns, auth sessions and the environment-driven
//! client configuration.

use crate::ai::image::DEFAULT_BASE_URL as DEFAULT_IMAGE_BASE_URL;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session issued by the auth backend on sign-in (or sign-up without
/// email confirmation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: User,
}

// Configuration
const DEFAULT_IMAGE_SIZE: u32 = 512;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub backend_anon_key: String,
    pub generate_url: String,
    pub image_base_url: String,
    pub image_width: u32,
    pub image_height: u32,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            var(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| crate::Error::Config(format!("{} not set", key)))
        };

        let backend_url = required("OMNIAI_BACKEND_URL")?
            .trim_end_matches('/')
            .to_string();
        let backend_anon_key = required("OMNIAI_BACKEND_ANON_KEY")?;

        let optional = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let generate_url = optional("OMNIAI_GENERATE_URL")
            .unwrap_or_else(|| format!("{}/functions/v1/generate", backend_url));
        let image_base_url = optional("OMNIAI_IMAGE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            backend_url,
            backend_anon_key,
            generate_url,
            image_base_url,
            image_width: parse_var(&var, "OMNIAI_IMAGE_WIDTH", DEFAULT_IMAGE_SIZE)?,
            image_height: parse_var(&var, "OMNIAI_IMAGE_HEIGHT", DEFAULT_IMAGE_SIZE)?,
            request_timeout: Duration::from_secs(parse_var(
                &var,
                "OMNIAI_REQUEST_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        })
    }
}

fn parse_var<F, T>(var: &F, key: &str, default: T) -> crate::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| crate::Error::Config(format!("{} has invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}
