use clap::Subcommand;
use scareloop_core::storage::{Config, PrefStore};

use crate::common::{self, ConsolePresenter};

#[derive(Subcommand)]
pub enum EngineAction {
    /// Print the current engine state as JSON
    Status,
    /// Arm a fresh randomized wake-up timer
    Arm,
    /// Advance the engine to now, firing any due deadline
    Tick,
    /// Signal that the surface went hidden
    Hidden,
    /// Signal that the surface became visible again
    Visible,
    /// Idempotent safety net: arm if nothing is scheduled
    Watchdog,
    /// Tear down scheduling state
    Reset,
}

pub fn run(action: EngineAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = PrefStore::open()?;
    let config = Config::load_or_default();
    let mut engine = common::load_engine(&store, &config)?;
    let mut visibility = common::load_visibility(&store);
    let now = common::now_ms();

    match action {
        EngineAction::Status => {
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
        EngineAction::Arm => {
            let event = engine.start(
                store.consent(),
                store.safe_mode(),
                visibility.is_hidden(),
                now,
            );
            if let Some(event) = event {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        EngineAction::Tick => {
            let ctx =
                common::tick_context(store.media_playing(), store.safe_mode(), &visibility);
            let events = engine.tick(now, &ctx, &mut ConsolePresenter);
            for event in &events {
                println!("{}", serde_json::to_string_pretty(event)?);
            }
        }
        EngineAction::Hidden => {
            if let Some(event) = visibility.set_hidden(true, &mut engine, store.safe_mode(), now) {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        EngineAction::Visible => {
            if let Some(event) = visibility.set_hidden(false, &mut engine, store.safe_mode(), now) {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        EngineAction::Watchdog => {
            let event = engine.watchdog(
                store.consent(),
                store.safe_mode(),
                visibility.is_hidden(),
                now,
            );
            if let Some(event) = event {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        EngineAction::Reset => {
            engine.reset();
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
    }

    common::save_engine(&store, &engine)?;
    common::save_visibility(&store, &visibility)?;
    Ok(())
}
