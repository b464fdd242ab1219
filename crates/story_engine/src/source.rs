use story_core::{parse_profile_table, Profile, SourceError};
use story_logging::story_info;
use thiserror::Error;

use crate::sheets::{SheetId, SheetStore, SheetsError};

pub const PEOPLE_RANGE: &str = "A:C";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchProfilesError {
    #[error("People Sheet ID not set")]
    PeopleSheetNotSet,
    #[error(transparent)]
    Sheets(#[from] SheetsError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Reads the people sheet and turns its rows into profiles.
pub async fn fetch_profiles(
    store: &dyn SheetStore,
    sheet: Option<&SheetId>,
    range: &str,
) -> Result<Vec<Profile>, FetchProfilesError> {
    let sheet = sheet.ok_or(FetchProfilesError::PeopleSheetNotSet)?;
    let rows = store.read_rows(sheet, range).await?;
    let profiles = parse_profile_table(&rows)?;
    story_info!("Fetched {} profiles from {} rows", profiles.len(), rows.len());
    Ok(profiles)
}
