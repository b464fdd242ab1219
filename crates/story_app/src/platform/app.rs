use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Result;
use story_core::{update, AppState, Msg};
use story_engine::{EngineEvent, EngineHandle, EventSink, ReqwestSheetStore, StateStore};
use story_logging::{story_debug, story_info};

use super::commands::{self, Command, HELP};
use super::effects::{engine_event_to_msg, EffectRunner};
use super::settings::Settings;
use super::{engine_config, persistence, ui};

/// Everything the review loop waits on arrives through one channel.
enum Input {
    Line(String),
    Engine(EngineEvent),
    Closed,
}

struct InputSink(mpsc::Sender<Input>);

impl EventSink for InputSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.0.send(Input::Engine(event));
    }
}

struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
    }

    fn render(&self) {
        for line in ui::render::render(&self.state.view()) {
            println!("{line}");
        }
        println!();
    }

    fn render_if_dirty(&mut self) {
        if self.state.consume_dirty() {
            self.render();
        }
    }
}

pub fn run_review(store: StateStore) -> Result<()> {
    let settings = Settings::load(&store);
    let (input_tx, input_rx) = mpsc::channel();

    let config = engine_config(&store, &settings)?;
    let sheets = Arc::new(ReqwestSheetStore::new(
        config.sheets.clone(),
        config.tokens.clone(),
    )?);
    let engine =
        EngineHandle::with_sink(config, sheets, Arc::new(InputSink(input_tx.clone())))?;
    spawn_stdin_reader(input_tx);

    let mut session = Session {
        state: AppState::with_settings(settings.review_settings()),
        runner: EffectRunner::new(engine, store.clone(), settings.clone()),
    };
    session.dispatch(Msg::SpecialProfilesLoaded(settings.special_profiles.clone()));
    session.dispatch(Msg::SessionRestored(persistence::load_snapshot(&store)));
    session.render_if_dirty();
    println!("Type help for commands.");

    while let Ok(input) = input_rx.recv() {
        match input {
            Input::Line(line) => match commands::parse(&line, session.state.cursor()) {
                Ok(Command::Dispatch(msg)) => session.dispatch(msg),
                Ok(Command::Redraw) => session.render(),
                Ok(Command::Help) => println!("{HELP}"),
                Ok(Command::Quit) => break,
                Err(err) => println!("!! {err}"),
            },
            Input::Engine(event) => {
                story_debug!("Engine event {:?}", event);
                if let Some(msg) = engine_event_to_msg(event) {
                    session.dispatch(msg);
                }
            }
            Input::Closed => break,
        }
        session.render_if_dirty();
    }

    persistence::save_snapshot(&store, &session.state.session_snapshot());
    story_info!("Session saved to {:?}", store.dir());
    Ok(())
}

fn spawn_stdin_reader(tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Input::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Input::Closed);
    });
}
