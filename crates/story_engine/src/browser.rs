use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    #[error("empty url")]
    EmptyUrl,
    #[error("browser launch failed: {0}")]
    Launch(String),
}

/// Shows a profile page to the operator.
pub trait PageOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Opens pages in the system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl PageOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        let target = page_url(url)?;
        webbrowser::open(&target).map_err(|err| OpenError::Launch(err.to_string()))
    }
}

/// Sheet cells often hold `instagram.com/name` without a scheme.
pub fn page_url(raw: &str) -> Result<String, OpenError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(OpenError::EmptyUrl);
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("https://{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_adds_missing_scheme() {
        assert_eq!(page_url("ig.co/a").unwrap(), "https://ig.co/a");
        assert_eq!(page_url(" http://ig.co/a ").unwrap(), "http://ig.co/a");
        assert_eq!(page_url(""), Err(OpenError::EmptyUrl));
    }
}
