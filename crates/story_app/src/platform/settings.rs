//! Operator configuration kept in `settings.ron`.
//!
//! Sheet ids and special profiles are remembered per account so that
//! re-authenticating as a known account brings its setup back.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use story_core::{ReviewSettings, DEFAULT_LOOKAHEAD, DEFAULT_PAGE_SIZE};
use story_engine::{LogPolicy, SheetId, SpecialProfileMode, StateStore, DEFAULT_PRELOAD_GAP};
use story_logging::{story_info, story_warn};

const SETTINGS_FILENAME: &str = "settings.ron";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    pub people_sheet: Option<String>,
    pub log_sheet: Option<String>,
    pub special_profiles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewOptions {
    pub page_size: usize,
    pub lookahead: usize,
    pub log_no_choices: bool,
    pub special_mode: SpecialProfileMode,
    pub preload_gap_ms: u64,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            lookahead: DEFAULT_LOOKAHEAD,
            log_no_choices: false,
            special_mode: SpecialProfileMode::default(),
            preload_gap_ms: DEFAULT_PRELOAD_GAP.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub people_sheet: Option<String>,
    pub log_sheet: Option<String>,
    pub special_profiles: Vec<String>,
    pub current_email: Option<String>,
    pub accounts: BTreeMap<String, AccountSettings>,
    pub review: ReviewOptions,
}

impl Settings {
    /// Missing or unreadable settings fall back to defaults.
    pub fn load(store: &StateStore) -> Self {
        let content = match store.read(SETTINGS_FILENAME) {
            Ok(Some(text)) => text,
            Ok(None) => return Self::default(),
            Err(err) => {
                story_warn!("Failed to read settings: {}", err);
                return Self::default();
            }
        };
        match ron::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                story_warn!("Failed to parse settings: {}", err);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &StateStore) -> Result<()> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
            .context("serialize settings")?;
        store
            .write_atomic(SETTINGS_FILENAME, &content)
            .context("write settings")?;
        Ok(())
    }

    pub fn people_sheet_id(&self) -> Result<Option<SheetId>> {
        parse_sheet(self.people_sheet.as_deref()).context("people sheet")
    }

    pub fn log_sheet_id(&self) -> Result<Option<SheetId>> {
        parse_sheet(self.log_sheet.as_deref()).context("log sheet")
    }

    /// Stores normalized ids; links are reduced to the bare id.
    pub fn set_people_sheet(&mut self, raw: &str) -> Result<()> {
        self.people_sheet = Some(SheetId::parse(raw)?.to_string());
        self.remember_account();
        Ok(())
    }

    pub fn set_log_sheet(&mut self, raw: &str) -> Result<()> {
        self.log_sheet = Some(SheetId::parse(raw)?.to_string());
        self.remember_account();
        Ok(())
    }

    /// Returns false when the name was already present.
    pub fn add_special(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.special_profiles.iter().any(|n| n == name) {
            return false;
        }
        self.special_profiles.push(name.to_string());
        self.remember_account();
        true
    }

    pub fn remove_special(&mut self, name: &str) -> bool {
        let before = self.special_profiles.len();
        self.special_profiles.retain(|n| n != name.trim());
        let removed = self.special_profiles.len() != before;
        if removed {
            self.remember_account();
        }
        removed
    }

    pub fn set_special_profiles(&mut self, names: Vec<String>) {
        self.special_profiles = names;
        self.remember_account();
    }

    /// Copies the active setup into the current account's entry.
    pub fn remember_account(&mut self) {
        if let Some(email) = self.current_email.clone() {
            self.accounts.insert(
                email,
                AccountSettings {
                    people_sheet: self.people_sheet.clone(),
                    log_sheet: self.log_sheet.clone(),
                    special_profiles: self.special_profiles.clone(),
                },
            );
        }
    }

    /// Makes `email` current, restoring its saved setup if one exists.
    /// Returns whether anything was restored.
    pub fn switch_account(&mut self, email: &str) -> bool {
        self.current_email = Some(email.to_string());
        match self.accounts.get(email).cloned() {
            Some(account) => {
                story_info!("Restoring saved settings for {}", email);
                self.people_sheet = account.people_sheet;
                self.log_sheet = account.log_sheet;
                self.special_profiles = account.special_profiles;
                true
            }
            None => {
                self.remember_account();
                false
            }
        }
    }

    pub fn review_settings(&self) -> ReviewSettings {
        ReviewSettings {
            page_size: self.review.page_size.max(1),
            lookahead: self.review.lookahead,
        }
    }

    pub fn log_policy(&self) -> LogPolicy {
        LogPolicy {
            log_no_choices: self.review.log_no_choices,
            special_mode: self.review.special_mode,
        }
    }

    pub fn preload_gap(&self) -> Duration {
        Duration::from_millis(self.review.preload_gap_ms)
    }
}

fn parse_sheet(raw: Option<&str>) -> Result<Option<SheetId>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Ok(Some(SheetId::parse(raw)?)),
        None => Ok(None),
    }
}
