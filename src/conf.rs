//! Environment and configuration utilities.

use crate::auth::{Auth, AuthError};
use std::env;
use thiserror::Error;

/// Environment variable holding the Twitter API v2 bearer token.
pub const TWITTER_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";

/// Environment variable holding the OpenRouter API key.
pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";

/// Environment variable that optionally overrides the completion model.
pub const OPENROUTER_MODEL: &str = "OPENROUTER_MODEL";

/// Model used when `$OPENROUTER_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-distill-qwen-7b";

/// Credentials and options read once at startup.
///
/// `Settings` is built explicitly and handed to the feed fetcher and the
/// insight generator when they are constructed; nothing reads the
/// environment after that.
#[derive(Debug, Clone)]
pub struct Settings {
    twitter_auth: Auth,
    openrouter_auth: Auth,
    model: String,
}

impl Settings {
    /// Creates settings from explicit values.
    pub fn new(twitter_auth: Auth, openrouter_auth: Auth, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            twitter_auth,
            openrouter_auth,
            model,
        }
    }

    /// Loads settings from the environment.
    ///
    /// A `.env` file in the current directory is read first, if there is
    /// one. Variables already present in the environment take precedence
    /// over the file.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenv::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(err) if err.not_found() => log::debug!("No .env file found"),
            Err(err) => log::warn!("Could not read .env file: {err}"),
        }
        Self::from_env()
    }

    /// Reads settings from the process environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let twitter_auth = Auth::from_env(TWITTER_BEARER_TOKEN)?;
        let openrouter_auth = Auth::from_env(OPENROUTER_API_KEY)?;
        let model = env::var(OPENROUTER_MODEL)
            .ok()
            .filter(|model| !model.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self::new(twitter_auth, openrouter_auth, model))
    }

    /// Bearer token for the Twitter API.
    pub fn twitter_auth(&self) -> &Auth {
        &self.twitter_auth
    }

    /// API key for OpenRouter.
    pub fn openrouter_auth(&self) -> &Auth {
        &self.openrouter_auth
    }

    /// Identifier of the completion model, e.g. `deepseek/deepseek-r1-distill-qwen-7b`.
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// A fatal configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential is missing or unreadable.
    #[error("Missing required API credentials ({0}). Please check your .env file.")]
    Credentials(#[from] AuthError),
}
