use std::sync::{mpsc, Arc};
use std::thread;

use chrono::NaiveDateTime;
use story_core::{Choice, LoadMode, MatchCursor, Profile, SearchOutcome};
use story_logging::{story_debug, story_warn};
use tokio::sync::Mutex;

use crate::auth::TokenProvider;
use crate::browser::{PageOpener, SystemBrowser};
use crate::logger::{separator_label, ChoiceLogger, LogPolicy, LOG_RANGE};
use crate::preload::{PreloadSettings, Preloader};
use crate::sheets::{ReqwestSheetStore, SheetId, SheetStore, SheetsSettings};
use crate::source::{fetch_profiles, PEOPLE_RANGE};
use crate::types::{ChannelEventSink, EngineError, EngineEvent, EventSink};

/// Wall clock used for log dates; replaceable in tests.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

pub struct EngineConfig {
    pub sheets: SheetsSettings,
    pub people_sheet: Option<SheetId>,
    pub log_sheet: Option<SheetId>,
    pub people_range: String,
    pub policy: LogPolicy,
    pub preload: PreloadSettings,
    pub tokens: Arc<dyn TokenProvider>,
    pub opener: Arc<dyn PageOpener>,
    pub clock: Clock,
}

impl EngineConfig {
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            sheets: SheetsSettings::default(),
            people_sheet: None,
            log_sheet: None,
            people_range: PEOPLE_RANGE.to_string(),
            policy: LogPolicy::default(),
            preload: PreloadSettings::default(),
            tokens,
            opener: Arc::new(SystemBrowser),
            clock: Arc::new(|| chrono::Local::now().naive_local()),
        }
    }
}

enum EngineCommand {
    FetchProfiles { mode: LoadMode },
    OpenProfile { url: String },
    LogChoice {
        profile: Profile,
        choice: Choice,
        special: bool,
    },
    Preload { urls: Vec<String> },
    AddDateSeparator,
    SearchName { name: String },
    SearchNext,
    SearchPrev,
    ClearSearch,
}

/// Front door to the IO side. Commands run as tasks on a tokio runtime owned
/// by a background thread; results come back through the event sink.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let store = Arc::new(ReqwestSheetStore::new(
            config.sheets.clone(),
            config.tokens.clone(),
        )?);
        let (event_tx, event_rx) = mpsc::channel();
        let handle = Self::with_sink(config, store, Arc::new(ChannelEventSink::new(event_tx)))?;
        Ok((handle, event_rx))
    }

    pub fn with_sink(
        config: EngineConfig,
        store: Arc<dyn SheetStore>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("story-engine")
            .build()?;
        let preloader = Preloader::new(config.preload.clone())?;
        let context = Arc::new(EngineContext {
            logger: Mutex::new(ChoiceLogger::new(
                store.clone(),
                config.log_sheet.clone(),
                config.policy,
            )),
            matches: Mutex::new(MatchCursor::new()),
            store,
            people_sheet: config.people_sheet,
            log_sheet: config.log_sheet,
            people_range: config.people_range,
            preloader,
            opener: config.opener,
            clock: config.clock,
            sink,
        });

        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        thread::Builder::new()
            .name("story-engine-commands".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let context = context.clone();
                    runtime.spawn(async move {
                        context.handle(command).await;
                    });
                }
                story_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx })
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            story_warn!("Engine is gone; command dropped");
        }
    }

    pub fn fetch_profiles(&self, mode: LoadMode) {
        self.send(EngineCommand::FetchProfiles { mode });
    }

    pub fn open_profile(&self, url: impl Into<String>) {
        self.send(EngineCommand::OpenProfile { url: url.into() });
    }

    pub fn log_choice(&self, profile: Profile, choice: Choice, special: bool) {
        self.send(EngineCommand::LogChoice {
            profile,
            choice,
            special,
        });
    }

    pub fn preload(&self, urls: Vec<String>) {
        self.send(EngineCommand::Preload { urls });
    }

    pub fn add_date_separator(&self) {
        self.send(EngineCommand::AddDateSeparator);
    }

    pub fn search(&self, name: impl Into<String>) {
        self.send(EngineCommand::SearchName { name: name.into() });
    }

    pub fn search_next(&self) {
        self.send(EngineCommand::SearchNext);
    }

    pub fn search_prev(&self) {
        self.send(EngineCommand::SearchPrev);
    }

    pub fn clear_search(&self) {
        self.send(EngineCommand::ClearSearch);
    }
}

struct EngineContext {
    store: Arc<dyn SheetStore>,
    people_sheet: Option<SheetId>,
    log_sheet: Option<SheetId>,
    people_range: String,
    // Serializes appends so a day's separator always lands before its rows.
    logger: Mutex<ChoiceLogger>,
    matches: Mutex<MatchCursor>,
    preloader: Preloader,
    opener: Arc<dyn PageOpener>,
    clock: Clock,
    sink: Arc<dyn EventSink>,
}

impl EngineContext {
    async fn handle(&self, command: EngineCommand) {
        match command {
            EngineCommand::FetchProfiles { mode } => {
                let result = fetch_profiles(
                    self.store.as_ref(),
                    self.people_sheet.as_ref(),
                    &self.people_range,
                )
                .await
                .map_err(|err| err.to_string());
                self.sink.emit(EngineEvent::ProfilesFetched { mode, result });
            }
            EngineCommand::OpenProfile { url } => {
                let opener = self.opener.clone();
                let target = url.clone();
                let result = match tokio::task::spawn_blocking(move || opener.open(&target)).await
                {
                    Ok(opened) => opened.map_err(|err| err.to_string()),
                    Err(err) => Err(err.to_string()),
                };
                self.sink.emit(EngineEvent::ProfileOpened { url, result });
            }
            EngineCommand::LogChoice {
                profile,
                choice,
                special,
            } => {
                let at = (self.clock)();
                let result = self
                    .logger
                    .lock()
                    .await
                    .log_choice(&profile, choice, special, at)
                    .await
                    .map_err(|err| err.to_string());
                self.sink.emit(EngineEvent::ChoiceLogged {
                    url: profile.url,
                    choice,
                    result,
                });
            }
            EngineCommand::Preload { urls } => {
                self.preloader.warm(urls, self.sink.as_ref()).await;
            }
            EngineCommand::AddDateSeparator => {
                let label = separator_label((self.clock)().date());
                let result = self
                    .logger
                    .lock()
                    .await
                    .add_date_separator(&label)
                    .await
                    .map_err(|err| err.to_string());
                self.sink.emit(EngineEvent::SeparatorAdded { result });
            }
            EngineCommand::SearchName { name } => {
                let outcome = self.search_log(&name).await;
                self.sink.emit(EngineEvent::SearchFinished(outcome));
            }
            EngineCommand::SearchNext => {
                let outcome = self.matches.lock().await.next();
                self.sink.emit(EngineEvent::SearchFinished(outcome));
            }
            EngineCommand::SearchPrev => {
                let outcome = self.matches.lock().await.prev();
                self.sink.emit(EngineEvent::SearchFinished(outcome));
            }
            EngineCommand::ClearSearch => {
                self.matches.lock().await.clear();
            }
        }
    }

    async fn search_log(&self, name: &str) -> SearchOutcome {
        let Some(sheet) = self.log_sheet.as_ref() else {
            return SearchOutcome::with_message("Log Sheet ID not set");
        };
        match self.store.read_rows(sheet, LOG_RANGE).await {
            Ok(rows) => self.matches.lock().await.search(name, &rows),
            Err(err) => {
                story_warn!("Log sheet search failed: {}", err);
                SearchOutcome::with_message(err.to_string())
            }
        }
    }
}
