use story_core::{Effect, Msg};
use story_engine::{EngineEvent, EngineHandle, StateStore};
use story_logging::{story_debug, story_info, story_warn};

use super::persistence;
use super::settings::Settings;

const LINKS_FILENAME: &str = "yes_links.txt";

/// Executes core effects against the engine and the local state directory.
pub struct EffectRunner {
    engine: EngineHandle,
    store: StateStore,
    settings: Settings,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, store: StateStore, settings: Settings) -> Self {
        Self {
            engine,
            store,
            settings,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchProfiles { mode } => {
                    story_debug!("FetchProfiles mode={:?}", mode);
                    self.engine.fetch_profiles(mode);
                }
                Effect::OpenProfile { url } => self.engine.open_profile(url),
                Effect::Preload { urls } => {
                    story_debug!("Preload {} urls", urls.len());
                    self.engine.preload(urls);
                }
                Effect::LogChoice {
                    profile,
                    choice,
                    special,
                } => {
                    story_info!("LogChoice {} {} special={}", profile.name, choice, special);
                    self.engine.log_choice(profile, choice, special);
                }
                Effect::PersistChoices(choices) => persistence::save_choices(&self.store, &choices),
                Effect::ForgetChoices => persistence::forget_choices(&self.store),
                Effect::ForgetSession => persistence::forget_session(&self.store),
                Effect::SaveSpecialProfiles(names) => {
                    self.settings.set_special_profiles(names);
                    if let Err(err) = self.settings.save(&self.store) {
                        story_warn!("Failed to save special profiles: {:#}", err);
                    }
                }
                Effect::SearchName { name } => self.engine.search(name),
                Effect::SearchNext => self.engine.search_next(),
                Effect::SearchPrev => self.engine.search_prev(),
                Effect::ClearSearch => self.engine.clear_search(),
                Effect::ExportLinks(links) => self.export_links(&links),
            }
        }
    }

    fn export_links(&self, links: &[String]) {
        let content = links.join("\n");
        match self.store.write_atomic(LINKS_FILENAME, &content) {
            Ok(path) => story_info!("Exported {} links to {:?}", links.len(), path),
            Err(err) => story_warn!("Failed to export links: {}", err),
        }
        println!("{content}");
    }
}

/// Translates an engine result into the core message it answers.
pub fn engine_event_to_msg(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::ProfilesFetched { mode, result } => Some(match result {
            Ok(profiles) => Msg::ProfilesLoaded { mode, profiles },
            Err(error) => {
                story_warn!("Profile fetch ({:?}) failed: {}", mode, error);
                Msg::ProfilesFailed { mode, error }
            }
        }),
        EngineEvent::ProfileOpened { url, result } => Some(Msg::ProfileOpened { url, result }),
        EngineEvent::ChoiceLogged {
            url,
            choice,
            result,
        } => {
            if let Err(err) = &result {
                story_warn!("Logging {} for {} failed: {}", choice, url, err);
            }
            Some(Msg::ChoiceLogged {
                url,
                choice,
                result: result.map(|_| ()),
            })
        }
        EngineEvent::PreloadFinished { url } => Some(Msg::PreloadFinished { url }),
        EngineEvent::SearchFinished(outcome) => Some(Msg::SearchFinished(outcome)),
        EngineEvent::SeparatorAdded { result } => {
            match result {
                Ok(()) => story_info!("Date separator added"),
                Err(err) => story_warn!("Date separator failed: {}", err),
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_core::{Choice, LoadMode, SearchOutcome};
    use story_engine::LogReport;

    #[test]
    fn engine_results_become_core_messages() {
        let msg = engine_event_to_msg(EngineEvent::ProfilesFetched {
            mode: LoadMode::Fresh,
            result: Err("People Sheet ID not set".to_string()),
        });
        assert_eq!(
            msg,
            Some(Msg::ProfilesFailed {
                mode: LoadMode::Fresh,
                error: "People Sheet ID not set".to_string(),
            })
        );

        let msg = engine_event_to_msg(EngineEvent::ChoiceLogged {
            url: "ig.co/a".to_string(),
            choice: Choice::Yes,
            result: Ok(LogReport {
                rows_appended: 1,
                separator_added: false,
            }),
        });
        assert_eq!(
            msg,
            Some(Msg::ChoiceLogged {
                url: "ig.co/a".to_string(),
                choice: Choice::Yes,
                result: Ok(()),
            })
        );

        let msg = engine_event_to_msg(EngineEvent::SearchFinished(SearchOutcome::not_found()));
        assert_eq!(msg, Some(Msg::SearchFinished(SearchOutcome::not_found())));
    }

    #[test]
    fn separator_results_stay_in_the_log() {
        assert_eq!(
            engine_event_to_msg(EngineEvent::SeparatorAdded { result: Ok(()) }),
            None
        );
    }
}
