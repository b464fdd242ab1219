//! Story checker engine: spreadsheet IO, choice logging and effect execution.
mod auth;
mod browser;
mod engine;
mod logger;
mod persist;
mod preload;
mod sheets;
mod source;
mod types;

pub use auth::{
    AuthError, StaticToken, TokenCache, TokenProvider, UserInfoClient, TOKEN_ENV_VAR,
    USERINFO_URL,
};
pub use browser::{page_url, OpenError, PageOpener, SystemBrowser};
pub use engine::{Clock, EngineConfig, EngineHandle};
pub use logger::{
    build_log_rows, day_month_label, separator_label, separator_rows, ChoiceLogger, LogError,
    LogPolicy, LogReport, SpecialProfileMode, LOG_RANGE,
};
pub use persist::{ensure_state_dir, PersistError, StateStore};
pub use preload::{PreloadSettings, Preloader, DEFAULT_PRELOAD_GAP};
pub use sheets::{
    ReqwestSheetStore, SheetId, SheetIdError, SheetStore, SheetsError, SheetsSettings,
    SHEETS_API_BASE,
};
pub use source::{fetch_profiles, FetchProfilesError, PEOPLE_RANGE};
pub use types::{ChannelEventSink, EngineError, EngineEvent, EventSink};
