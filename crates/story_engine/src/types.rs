use std::sync::mpsc;

use story_core::{Choice, LoadMode, Profile, SearchOutcome};
use thiserror::Error;

use crate::logger::LogReport;

/// Results reported back from engine tasks. Failures travel as display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ProfilesFetched {
        mode: LoadMode,
        result: Result<Vec<Profile>, String>,
    },
    ProfileOpened {
        url: String,
        result: Result<(), String>,
    },
    ChoiceLogged {
        url: String,
        choice: Choice,
        result: Result<LogReport, String>,
    },
    PreloadFinished {
        url: String,
    },
    SearchFinished(SearchOutcome),
    SeparatorAdded {
        result: Result<(), String>,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

#[derive(Clone)]
pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Sheets(#[from] crate::sheets::SheetsError),
    #[error("preload client: {0}")]
    Preload(String),
}
