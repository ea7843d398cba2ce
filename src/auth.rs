//! Authentication for the Twitter and OpenRouter APIs.

use std::env;
use thiserror::Error;

/// Manages a bearer token or API key for a remote API.
///
/// Both the Twitter API and OpenRouter authenticate with an
/// `Authorization: Bearer` header, so one type serves both.
#[derive(Clone)]
pub struct Auth {
    api_key: String,
}

impl Auth {
    /// Creates a new `Auth` structure using the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self { api_key }
    }

    /// Retrieves an API key from the environment.
    ///
    /// Returns an error if the variable is missing, is not valid Unicode,
    /// or is set to an empty string.
    pub fn from_env(envvar: impl Into<String>) -> AuthResult {
        let envvar = envvar.into();
        let api_key = env::var(&envvar).map_err(|err| AuthError::EnvError(envvar.clone(), err))?;
        if api_key.trim().is_empty() {
            Err(AuthError::Empty(envvar))
        } else {
            Ok(Self { api_key })
        }
    }

    /// The actual API key.
    ///
    /// # Examples
    ///
    /// ```
    /// use twinsight::auth::Auth;
    /// let auth = Auth::new("ThisIsMyApiKey");
    /// assert_eq!(auth.api_key(), "ThisIsMyApiKey");
    /// ```
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The value of an `Authorization` header carrying this key.
    ///
    /// ```
    /// use twinsight::auth::Auth;
    /// let auth = Auth::new("abc123");
    /// assert_eq!(auth.bearer(), "Bearer abc123");
    /// ```
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

// Keys must never end up in logs.
impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth").field("api_key", &"<redacted>").finish()
    }
}

/// Standard result type for [`Auth`] creation.
pub type AuthResult = Result<Auth, AuthError>;

/// Indicates an error when creating an authentication key.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An error occurred while retrieving a key from the environment.
    #[error("${0} could not be read: {1}")]
    EnvError(String, #[source] env::VarError),

    /// The key was present in the environment but blank.
    #[error("${0} is set but empty")]
    Empty(String),
}
