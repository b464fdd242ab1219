use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use story_core::{Choice, Platform, Profile};
use story_logging::{story_debug, story_info, story_warn};
use thiserror::Error;

use crate::sheets::{SheetId, SheetStore, SheetsError};

pub const LOG_RANGE: &str = "A:E";
const LOG_COLUMNS: usize = 5;

/// How a special profile is written to the log sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpecialProfileMode {
    /// Every platform row is written, with the name in place of the URL.
    #[default]
    NameInUrlColumn,
    /// A single row under the primary platform, with the name in place of the URL.
    NameOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogPolicy {
    /// When false, NO choices stay local and nothing is appended.
    pub log_no_choices: bool,
    pub special_mode: SpecialProfileMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogReport {
    pub rows_appended: usize,
    pub separator_added: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("Log Sheet ID not set")]
    LogSheetNotSet,
    #[error("could not add date separator: {0}")]
    Separator(SheetsError),
    #[error("{source} ({appended} of {total} rows appended)")]
    Append {
        appended: usize,
        total: usize,
        source: SheetsError,
    },
}

/// Date cell as the log sheet expects it: day/month without padding.
pub fn day_month_label(at: NaiveDateTime) -> String {
    format!("{}/{}", at.day(), at.month())
}

pub fn separator_label(day: NaiveDate) -> String {
    day.format("%a %b %d %Y").to_string()
}

/// Blank row followed by the `=== <date> ===` marker row.
pub fn separator_rows(label: &str) -> Vec<Vec<String>> {
    let mut marker = vec![String::new(); LOG_COLUMNS];
    marker[0] = format!("=== {label} ===");
    vec![vec![String::new(); LOG_COLUMNS], marker]
}

/// Data rows for one choice: Instagram first, then Facebook unless it repeats
/// the Instagram URL.
pub fn build_log_rows(
    profile: &Profile,
    choice: Choice,
    special: bool,
    mode: SpecialProfileMode,
    at: NaiveDateTime,
) -> Vec<Vec<String>> {
    let date = day_month_label(at);
    let row = |platform: Platform, target: &str| {
        vec![
            date.clone(),
            profile.name.clone(),
            platform.label().to_string(),
            target.to_string(),
            choice.as_str().to_string(),
        ]
    };

    if special && mode == SpecialProfileMode::NameOnly {
        return vec![row(profile.platform, &profile.name)];
    }

    let mut targets = Vec::new();
    if !profile.instagram_url.is_empty() {
        targets.push((Platform::Instagram, profile.instagram_url.as_str()));
    }
    if !profile.facebook_url.is_empty() && profile.facebook_url != profile.instagram_url {
        targets.push((Platform::Facebook, profile.facebook_url.as_str()));
    }

    targets
        .into_iter()
        .map(|(platform, url)| row(platform, if special { &profile.name } else { url }))
        .collect()
}

/// Appends choices to the log sheet and tracks the last day a separator was
/// written for.
pub struct ChoiceLogger {
    store: Arc<dyn SheetStore>,
    sheet: Option<SheetId>,
    policy: LogPolicy,
    last_day: Option<NaiveDate>,
}

impl ChoiceLogger {
    pub fn new(store: Arc<dyn SheetStore>, sheet: Option<SheetId>, policy: LogPolicy) -> Self {
        Self {
            store,
            sheet,
            policy,
            last_day: None,
        }
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.last_day
    }

    pub fn policy(&self) -> LogPolicy {
        self.policy
    }

    pub async fn log_choice(
        &mut self,
        profile: &Profile,
        choice: Choice,
        special: bool,
        at: NaiveDateTime,
    ) -> Result<LogReport, LogError> {
        if choice == Choice::No && !self.policy.log_no_choices {
            story_debug!("NO for {} kept local", profile.name);
            return Ok(LogReport::default());
        }
        let sheet = self.sheet.clone().ok_or(LogError::LogSheetNotSet)?;
        let rows = build_log_rows(profile, choice, special, self.policy.special_mode, at);
        if rows.is_empty() {
            return Ok(LogReport::default());
        }

        let mut report = LogReport::default();
        let today = at.date();
        if self.last_day != Some(today) {
            self.append_separator(&sheet, &separator_label(today)).await?;
            self.last_day = Some(today);
            report.separator_added = true;
        }

        let total = rows.len();
        for row in &rows {
            if let Err(source) = self
                .store
                .append_rows(&sheet, LOG_RANGE, std::slice::from_ref(row))
                .await
            {
                story_warn!(
                    "Log append failed for {} after {}/{} rows: {}",
                    profile.name,
                    report.rows_appended,
                    total,
                    source
                );
                return Err(LogError::Append {
                    appended: report.rows_appended,
                    total,
                    source,
                });
            }
            report.rows_appended += 1;
        }
        story_info!("Logged {} for {} ({} rows)", choice, profile.name, total);
        Ok(report)
    }

    /// Explicit separator, independent of the day tracking.
    pub async fn add_date_separator(&self, label: &str) -> Result<(), LogError> {
        let sheet = self.sheet.clone().ok_or(LogError::LogSheetNotSet)?;
        self.append_separator(&sheet, label).await
    }

    async fn append_separator(&self, sheet: &SheetId, label: &str) -> Result<(), LogError> {
        self.store
            .append_rows(sheet, LOG_RANGE, &separator_rows(label))
            .await
            .map_err(LogError::Separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn labels_follow_sheet_conventions() {
        assert_eq!(day_month_label(at(2024, 3, 7)), "7/3");
        assert_eq!(separator_label(at(2024, 3, 7).date()), "Thu Mar 07 2024");
        assert_eq!(
            separator_rows("Thu Mar 07 2024")[1][0],
            "=== Thu Mar 07 2024 ==="
        );
    }

    #[test]
    fn duplicate_facebook_url_is_not_logged_twice() {
        let profile = Profile::instagram("Dup", "https://x.co/d").with_facebook("https://x.co/d");
        let rows = build_log_rows(
            &profile,
            Choice::Yes,
            false,
            SpecialProfileMode::default(),
            at(2024, 1, 1),
        );
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn facebook_only_profile_logs_facebook_row() {
        let profile = Profile::facebook("Bob", "fb.co/b");
        let rows = build_log_rows(
            &profile,
            Choice::Yes,
            false,
            SpecialProfileMode::default(),
            at(2024, 1, 1),
        );
        assert_eq!(rows, vec![vec!["1/1", "Bob", "Facebook", "fb.co/b", "YES"]]);
    }
}
