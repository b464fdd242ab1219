use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use story_logging::{story_debug, story_warn};
use thiserror::Error;

use crate::auth::{AuthError, TokenProvider};

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetIdError {
    #[error("sheet id is empty")]
    Empty,
    #[error("sheet id contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Identifier of a spreadsheet document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetId(String);

impl SheetId {
    /// Accepts a bare id or a `docs.google.com/spreadsheets/d/<id>/...` link.
    pub fn parse(raw: &str) -> Result<Self, SheetIdError> {
        let trimmed = raw.trim();
        let candidate = match trimmed.split_once("/spreadsheets/d/") {
            Some((_, rest)) => rest.split(['/', '?', '#']).next().unwrap_or_default(),
            None => trimmed,
        };
        if candidate.is_empty() {
            return Err(SheetIdError::Empty);
        }
        if let Some(bad) = candidate
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(SheetIdError::InvalidChar(bad));
        }
        Ok(Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Browser link to the sheet's editor.
    pub fn edit_url(&self) -> String {
        format!("https://docs.google.com/spreadsheets/d/{}/edit", self.0)
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetsError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("API request failed with status {0}")]
    HttpStatus(u16),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Row-oriented access to a remote spreadsheet.
#[async_trait::async_trait]
pub trait SheetStore: Send + Sync {
    async fn read_rows(&self, sheet: &SheetId, range: &str)
        -> Result<Vec<Vec<String>>, SheetsError>;

    async fn append_rows(
        &self,
        sheet: &SheetId,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError>;
}

#[derive(Debug, Clone)]
pub struct SheetsSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            base_url: SHEETS_API_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct AppendBody<'a> {
    values: &'a [Vec<String>],
}

/// Spreadsheet values API over HTTP with bearer auth.
pub struct ReqwestSheetStore {
    settings: SheetsSettings,
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
}

impl ReqwestSheetStore {
    pub fn new(settings: SheetsSettings, tokens: Arc<dyn TokenProvider>) -> Result<Self, SheetsError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SheetsError::Network(err.to_string()))?;
        Ok(Self {
            settings,
            client,
            tokens,
        })
    }

    fn values_url(&self, sheet: &SheetId, range: &str) -> String {
        format!(
            "{}/{}/values/{}",
            self.settings.base_url.trim_end_matches('/'),
            sheet,
            range
        )
    }

    /// Sends a request built for the current token; a 401 gets exactly one
    /// silent refresh and retry.
    async fn send_authorized<F>(&self, build: F) -> Result<reqwest::Response, SheetsError>
    where
        F: Fn(&str) -> reqwest::RequestBuilder + Send + Sync,
    {
        let token = self.tokens.token()?;
        let response = build(&token).send().await.map_err(map_reqwest_error)?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response);
        }

        story_warn!("Sheets API rejected the token; refreshing once");
        let token = self.tokens.refresh()?;
        let response = build(&token).send().await.map_err(map_reqwest_error)?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::TokenRejected.into());
        }
        check_status(response)
    }
}

#[async_trait::async_trait]
impl SheetStore for ReqwestSheetStore {
    async fn read_rows(
        &self,
        sheet: &SheetId,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = format!("{}?majorDimension=ROWS", self.values_url(sheet, range));
        story_debug!("GET {}", url);
        let response = self
            .send_authorized(|token| self.client.get(&url).bearer_auth(token))
            .await?;
        let body = response.text().await.map_err(map_reqwest_error)?;
        let parsed: ValueRange =
            serde_json::from_str(&body).map_err(|err| SheetsError::Decode(err.to_string()))?;

        Ok(parsed
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn append_rows(
        &self,
        sheet: &SheetId,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        let url = format!(
            "{}:append?valueInputOption=USER_ENTERED",
            self.values_url(sheet, range)
        );
        let body = serde_json::to_vec(&AppendBody { values: rows })
            .map_err(|err| SheetsError::Decode(err.to_string()))?;
        story_debug!("POST {} rows={}", url, rows.len());
        self.send_authorized(|token| {
            self.client
                .post(&url)
                .bearer_auth(token)
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone())
        })
        .await?;
        Ok(())
    }
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(SheetsError::HttpStatus(status.as_u16()))
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> SheetsError {
    if err.is_timeout() {
        return SheetsError::Timeout(err.to_string());
    }
    SheetsError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_id_accepts_raw_ids_and_links() {
        assert_eq!(SheetId::parse(" abc_DEF-123 ").unwrap().as_str(), "abc_DEF-123");
        let from_link =
            SheetId::parse("https://docs.google.com/spreadsheets/d/1XyZ-abc/edit#gid=0").unwrap();
        assert_eq!(from_link.as_str(), "1XyZ-abc");
        assert_eq!(
            from_link.edit_url(),
            "https://docs.google.com/spreadsheets/d/1XyZ-abc/edit"
        );
    }

    #[test]
    fn sheet_id_rejects_malformed_input() {
        assert_eq!(SheetId::parse("   "), Err(SheetIdError::Empty));
        assert_eq!(SheetId::parse("abc def"), Err(SheetIdError::InvalidChar(' ')));
        assert_eq!(
            SheetId::parse("https://docs.google.com/spreadsheets/d//edit"),
            Err(SheetIdError::Empty)
        );
    }
}
