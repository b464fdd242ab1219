use std::time::Duration;

use futures_util::future::join_all;
use story_logging::story_debug;

use crate::browser::page_url;
use crate::types::{EngineError, EngineEvent, EventSink};

pub const DEFAULT_PRELOAD_GAP: Duration = Duration::from_millis(600);

#[derive(Debug, Clone)]
pub struct PreloadSettings {
    /// Delay between the start of consecutive requests.
    pub gap: Duration,
    pub request_timeout: Duration,
}

impl Default for PreloadSettings {
    fn default() -> Self {
        Self {
            gap: DEFAULT_PRELOAD_GAP,
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Best-effort warm-up of upcoming profile pages.
#[derive(Debug, Clone)]
pub struct Preloader {
    settings: PreloadSettings,
    client: reqwest::Client,
}

impl Preloader {
    pub fn new(settings: PreloadSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| EngineError::Preload(err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// Requests every url concurrently, the n-th one starting `n * gap` late.
    /// Each url is reported finished whatever the outcome.
    pub async fn warm(&self, urls: Vec<String>, sink: &dyn EventSink) {
        let requests = urls.into_iter().enumerate().map(|(n, url)| {
            let delay = self.settings.gap * n as u32;
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                match page_url(&url) {
                    Ok(target) => match self.client.get(&target).send().await {
                        Ok(response) => {
                            story_debug!("Preloaded {} ({})", url, response.status())
                        }
                        Err(err) => story_debug!("Preload of {} failed: {}", url, err),
                    },
                    Err(err) => story_debug!("Preload of {:?} skipped: {}", url, err),
                }
                sink.emit(EngineEvent::PreloadFinished { url });
            }
        });
        join_all(requests).await;
    }
}
