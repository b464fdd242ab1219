use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use story_logging::story_debug;
use thiserror::Error;

use crate::persist::{PersistError, StateStore};
use crate::sheets::{map_reqwest_error, SheetsError};

pub const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const TOKEN_ENV_VAR: &str = "STORY_CHECKER_TOKEN";
const TOKEN_FILENAME: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authentication error: No token available")]
    MissingToken,
    #[error("Authentication error: token was rejected")]
    TokenRejected,
    #[error("Authentication error: {0}")]
    Storage(String),
}

/// Source of bearer tokens for the spreadsheet API.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Result<String, AuthError>;

    /// Silent refresh after the current token was rejected.
    fn refresh(&self) -> Result<String, AuthError> {
        self.token()
    }
}

/// A fixed token, mostly for tests and one-shot commands.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticToken {
    fn token(&self) -> Result<String, AuthError> {
        if self.0.trim().is_empty() {
            Err(AuthError::MissingToken)
        } else {
            Ok(self.0.clone())
        }
    }
}

/// Token cached in the state directory, overridable by an environment variable.
///
/// Every call re-reads the cache, so `refresh` picks up a token written by a
/// concurrent `auth` run.
#[derive(Debug, Clone)]
pub struct TokenCache {
    store: StateStore,
    env_var: Option<String>,
}

impl TokenCache {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            store: StateStore::new(dir),
            env_var: Some(TOKEN_ENV_VAR.to_string()),
        }
    }

    pub fn without_env(mut self) -> Self {
        self.env_var = None;
        self
    }

    pub fn store(&self, token: &str) -> Result<PathBuf, PersistError> {
        self.store.write_atomic(TOKEN_FILENAME, token.trim())
    }

    pub fn clear(&self) -> Result<bool, PersistError> {
        self.store.remove(TOKEN_FILENAME)
    }
}

impl TokenProvider for TokenCache {
    fn token(&self) -> Result<String, AuthError> {
        if let Some(var) = &self.env_var {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    return Ok(value.trim().to_string());
                }
            }
        }
        match self.store.read(TOKEN_FILENAME) {
            Ok(Some(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Ok(_) => Err(AuthError::MissingToken),
            Err(err) => Err(AuthError::Storage(err.to_string())),
        }
    }

    fn refresh(&self) -> Result<String, AuthError> {
        story_debug!("Re-reading cached token after rejection");
        self.token()
    }
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
}

/// Looks up the account email behind a token, used to key per-account settings.
#[derive(Debug, Clone)]
pub struct UserInfoClient {
    endpoint: String,
    client: reqwest::Client,
}

impl UserInfoClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SheetsError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SheetsError::Network(err.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub async fn fetch_email(&self, token: &str) -> Result<String, SheetsError> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::TokenRejected.into());
        }
        if !status.is_success() {
            return Err(SheetsError::HttpStatus(status.as_u16()));
        }
        let body = response.text().await.map_err(map_reqwest_error)?;
        let info: UserInfo =
            serde_json::from_str(&body).map_err(|err| SheetsError::Decode(err.to_string()))?;
        info.email
            .filter(|email| !email.is_empty())
            .ok_or_else(|| SheetsError::Decode("user info has no email".to_string()))
    }
}
