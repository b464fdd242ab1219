//! One-shot subcommands: configuration, auth and sheet utilities.

use std::sync::mpsc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use story_core::LoadMode;
use story_engine::{
    EngineEvent, EngineHandle, SpecialProfileMode, StateStore, TokenCache, UserInfoClient,
    USERINFO_URL,
};

use story_logging::{story_info, story_warn};

use super::engine_config;
use super::settings::Settings;
use crate::cli::{ConfigureArgs, SheetKind, SpecialAction, SpecialModeArg};

const ENGINE_WAIT: Duration = Duration::from_secs(60);

pub fn configure(store: &StateStore, args: ConfigureArgs) -> Result<()> {
    let mut settings = Settings::load(store);
    if let Some(raw) = &args.people_sheet {
        settings.set_people_sheet(raw).context("people sheet")?;
    }
    if let Some(raw) = &args.log_sheet {
        settings.set_log_sheet(raw).context("log sheet")?;
    }
    if let Some(page_size) = args.page_size {
        settings.review.page_size = page_size.max(1);
    }
    if let Some(lookahead) = args.lookahead {
        settings.review.lookahead = lookahead;
    }
    if let Some(log_no) = args.log_no_choices {
        settings.review.log_no_choices = log_no;
    }
    if let Some(mode) = args.special_mode {
        settings.review.special_mode = match mode {
            SpecialModeArg::NameInUrlColumn => SpecialProfileMode::NameInUrlColumn,
            SpecialModeArg::NameOnly => SpecialProfileMode::NameOnly,
        };
    }
    if let Some(gap) = args.preload_gap_ms {
        settings.review.preload_gap_ms = gap;
    }
    settings.save(store)?;

    println!(
        "People sheet: {}",
        settings.people_sheet.as_deref().unwrap_or("(not set)")
    );
    println!(
        "Log sheet:    {}",
        settings.log_sheet.as_deref().unwrap_or("(not set)")
    );
    println!("Review:       {:?}", settings.review);
    Ok(())
}

pub fn auth(store: &StateStore, token: &str) -> Result<()> {
    let client = UserInfoClient::new(USERINFO_URL, Duration::from_secs(15))?;
    sign_in(store, token, &client)
}

/// Caches the token, then keys settings to the account behind it. A failed
/// account lookup still leaves the token usable.
fn sign_in(store: &StateStore, token: &str, client: &UserInfoClient) -> Result<()> {
    let cache = TokenCache::new(store.dir().to_path_buf());
    cache.store(token).context("cache token")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let email = match runtime.block_on(client.fetch_email(token.trim())) {
        Ok(email) => email,
        Err(err) => {
            story_warn!("Account lookup failed, keeping token only: {}", err);
            println!("Token cached; account lookup failed: {err}");
            return Ok(());
        }
    };

    let mut settings = Settings::load(store);
    let restored = settings.switch_account(&email);
    settings.save(store)?;
    if restored {
        println!("Signed in as {email}; restored saved settings");
    } else {
        println!("Signed in as {email}");
    }
    Ok(())
}

/// Drops the cached token. Per-account setups stay for the next sign-in.
pub fn logout(store: &StateStore) -> Result<()> {
    let cache = TokenCache::new(store.dir().to_path_buf());
    let removed = cache.clear().context("remove cached token")?;

    let mut settings = Settings::load(store);
    if let Some(email) = settings.current_email.take() {
        story_info!("Signed out {}", email);
        settings.save(store)?;
    }
    if removed {
        println!("Signed out");
    } else {
        println!("No cached token");
    }
    Ok(())
}

pub fn special(store: &StateStore, action: SpecialAction) -> Result<()> {
    let mut settings = Settings::load(store);
    match action {
        SpecialAction::List => {
            for name in &settings.special_profiles {
                println!("{name}");
            }
            return Ok(());
        }
        SpecialAction::Add { name } => {
            if !settings.add_special(&name) {
                println!("{name} is already special");
            }
        }
        SpecialAction::Remove { name } => {
            if !settings.remove_special(&name) {
                println!("{name} was not special");
            }
        }
    }
    settings.save(store)
}

pub fn profiles(store: &StateStore) -> Result<()> {
    let settings = Settings::load(store);
    let (engine, events) = EngineHandle::new(engine_config(store, &settings)?)?;
    engine.fetch_profiles(LoadMode::Fresh);

    let profiles = wait_for(&events, |event| match event {
        EngineEvent::ProfilesFetched { result, .. } => Some(result),
        _ => None,
    })?
    .map_err(|err| anyhow!(err))?;

    for (n, profile) in profiles.iter().enumerate() {
        println!("{:>4}. {} [{}] {}", n + 1, profile.name, profile.platform, profile.url);
        if !profile.facebook_url.is_empty() && profile.facebook_url != profile.url {
            println!("      also {}", profile.facebook_url);
        }
    }
    Ok(())
}

pub fn separator(store: &StateStore) -> Result<()> {
    let settings = Settings::load(store);
    let (engine, events) = EngineHandle::new(engine_config(store, &settings)?)?;
    engine.add_date_separator();

    wait_for(&events, |event| match event {
        EngineEvent::SeparatorAdded { result } => Some(result),
        _ => None,
    })?
    .map_err(|err| anyhow!(err))?;
    println!("Date separator added");
    Ok(())
}

pub fn sheet_url(store: &StateStore, which: SheetKind) -> Result<()> {
    let settings = Settings::load(store);
    let sheet = match which {
        SheetKind::People => settings
            .people_sheet_id()?
            .ok_or_else(|| anyhow!("People Sheet ID not set"))?,
        SheetKind::Log => settings
            .log_sheet_id()?
            .ok_or_else(|| anyhow!("Log Sheet ID not set"))?,
    };
    println!("{}", sheet.edit_url());
    Ok(())
}

fn wait_for<T>(
    events: &mpsc::Receiver<EngineEvent>,
    pick: impl Fn(EngineEvent) -> Option<T>,
) -> Result<T> {
    loop {
        match events.recv_timeout(ENGINE_WAIT) {
            Ok(event) => {
                if let Some(found) = pick(event) {
                    return Ok(found);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => bail!("timed out waiting for the sheet API"),
            Err(mpsc::RecvTimeoutError::Disconnected) => bail!("engine stopped unexpectedly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_engine::{AuthError, TokenProvider};
    use tempfile::TempDir;

    #[test]
    fn configure_normalizes_links_and_updates_options() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path().to_path_buf());
        configure(
            &store,
            ConfigureArgs {
                people_sheet: Some("https://docs.google.com/spreadsheets/d/ppl/edit".to_string()),
                page_size: Some(0),
                special_mode: Some(SpecialModeArg::NameOnly),
                ..ConfigureArgs::default()
            },
        )
        .unwrap();

        let settings = Settings::load(&store);
        assert_eq!(settings.people_sheet.as_deref(), Some("ppl"));
        assert_eq!(settings.review.page_size, 1);
        assert_eq!(settings.review.special_mode, SpecialProfileMode::NameOnly);
    }

    #[test]
    fn special_add_and_remove_persist() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path().to_path_buf());
        special(&store, SpecialAction::Add { name: "Alice".to_string() }).unwrap();
        special(&store, SpecialAction::Add { name: "Bob".to_string() }).unwrap();
        special(&store, SpecialAction::Remove { name: "Alice".to_string() }).unwrap();
        assert_eq!(Settings::load(&store).special_profiles, vec!["Bob".to_string()]);
    }

    #[test]
    fn failed_account_lookup_keeps_token_and_succeeds() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path().to_path_buf());
        let client =
            UserInfoClient::new("http://127.0.0.1:9/userinfo", Duration::from_secs(2)).unwrap();

        sign_in(&store, " tok-1 ", &client).unwrap();

        let cache = TokenCache::new(temp.path().to_path_buf()).without_env();
        assert_eq!(cache.token().unwrap(), "tok-1");
        assert_eq!(Settings::load(&store).current_email, None);
    }

    #[test]
    fn logout_clears_token_and_current_account() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path().to_path_buf());
        let cache = TokenCache::new(temp.path().to_path_buf()).without_env();
        cache.store("tok-1").unwrap();
        let mut settings = Settings::default();
        settings.switch_account("a@example.com");
        settings.set_log_sheet("logA").unwrap();
        settings.save(&store).unwrap();

        logout(&store).unwrap();

        assert!(matches!(cache.token(), Err(AuthError::MissingToken)));
        let settings = Settings::load(&store);
        assert_eq!(settings.current_email, None);
        assert_eq!(
            settings.accounts["a@example.com"].log_sheet.as_deref(),
            Some("logA")
        );
        logout(&store).unwrap();
    }

    #[test]
    fn sheet_url_requires_a_configured_sheet() {
        let temp = TempDir::new().unwrap();
        let store = StateStore::new(temp.path().to_path_buf());
        let err = sheet_url(&store, SheetKind::Log).unwrap_err();
        assert_eq!(err.to_string(), "Log Sheet ID not set");
    }
}
