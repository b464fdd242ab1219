use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Instagram,
    Facebook,
}

impl Platform {
    pub fn label(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "facebook" => Ok(Platform::Facebook),
            other => Err(format!("unknown platform {other:?}")),
        }
    }
}

/// A person to review. `url` is the primary page and the identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub platform: Platform,
    pub url: String,
    pub instagram_url: String,
    pub facebook_url: String,
}

impl Profile {
    pub fn instagram(name: impl Into<String>, instagram_url: impl Into<String>) -> Self {
        let instagram_url = instagram_url.into();
        Self {
            name: name.into(),
            platform: Platform::Instagram,
            url: instagram_url.clone(),
            instagram_url,
            facebook_url: String::new(),
        }
    }

    pub fn facebook(name: impl Into<String>, facebook_url: impl Into<String>) -> Self {
        let facebook_url = facebook_url.into();
        Self {
            name: name.into(),
            platform: Platform::Facebook,
            url: facebook_url.clone(),
            instagram_url: String::new(),
            facebook_url,
        }
    }

    /// Adds a secondary Facebook page to an Instagram-primary profile.
    pub fn with_facebook(mut self, facebook_url: impl Into<String>) -> Self {
        self.facebook_url = facebook_url.into();
        self
    }
}

/// The operator's verdict for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    Yes,
    No,
}

impl Choice {
    pub fn as_str(self) -> &'static str {
        match self {
            Choice::Yes => "YES",
            Choice::No => "NO",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YES" | "Y" => Ok(Choice::Yes),
            "NO" | "N" => Ok(Choice::No),
            other => Err(format!("unknown choice {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Sheet is empty or has insufficient data")]
    InsufficientData,
    #[error("Sheet is missing required columns")]
    MissingColumns,
}

struct Columns {
    name: usize,
    instagram: Option<usize>,
    facebook: Option<usize>,
}

fn locate_columns(header: &[String]) -> Result<Columns, SourceError> {
    let lowered: Vec<String> = header
        .iter()
        .map(|cell| cell.trim().to_lowercase())
        .collect();
    let name = lowered
        .iter()
        .position(|h| h == "name")
        .or_else(|| lowered.iter().position(|h| h.contains("name")));
    let instagram = lowered.iter().position(|h| h.contains("instagram"));
    let facebook = lowered.iter().position(|h| h.contains("facebook"));

    match name {
        Some(name) if instagram.is_some() || facebook.is_some() => Ok(Columns {
            name,
            instagram,
            facebook,
        }),
        _ => Err(SourceError::MissingColumns),
    }
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map(|value| value.trim())
        .unwrap_or("")
}

/// Parses a sheet whose first row is a header into profiles.
///
/// Rows without a name or without any platform URL are dropped silently.
pub fn parse_profile_table(rows: &[Vec<String>]) -> Result<Vec<Profile>, SourceError> {
    if rows.len() < 2 {
        return Err(SourceError::InsufficientData);
    }
    let columns = locate_columns(&rows[0])?;

    let profiles = rows[1..]
        .iter()
        .filter_map(|row| {
            let name = cell(row, Some(columns.name));
            if name.is_empty() {
                return None;
            }
            let instagram_url = cell(row, columns.instagram);
            let facebook_url = cell(row, columns.facebook);
            if !instagram_url.is_empty() {
                Some(Profile::instagram(name, instagram_url).with_facebook(facebook_url))
            } else if !facebook_url.is_empty() {
                Some(Profile::facebook(name, facebook_url))
            } else {
                None
            }
        })
        .collect();

    Ok(profiles)
}

/// Compact form of a profile URL for list rows.
pub fn shorten_url(raw: &str) -> String {
    const PATH_CHARS: usize = 18;
    const FALLBACK_CHARS: usize = 25;

    match url::Url::parse(raw) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default();
            let path = parsed.path();
            let head: String = path.chars().take(PATH_CHARS).collect();
            let ellipsis = if path.chars().count() > PATH_CHARS { "..." } else { "" };
            format!("{host}{head}{ellipsis}")
        }
        Err(_) => {
            let head: String = raw.chars().take(FALLBACK_CHARS).collect();
            let ellipsis = if raw.chars().count() > FALLBACK_CHARS { "..." } else { "" };
            format!("{head}{ellipsis}")
        }
    }
}
