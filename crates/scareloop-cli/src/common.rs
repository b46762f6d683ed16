//! Shared helpers for CLI commands.
//!
//! The engine and visibility controller are parked in the preference
//! store's kv table between invocations, so every subcommand sees the
//! same machine state.

use scareloop_core::storage::{Config, PrefStore};
use scareloop_core::{
    LivenessSignal, Presenter, ScareEngine, ScareEntry, TickContext, VisibilityController,
};

const ENGINE_KEY: &str = "scare_engine";
const VISIBILITY_KEY: &str = "visibility";

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Load the parked engine, or build a fresh one from configuration.
pub fn load_engine(
    store: &PrefStore,
    config: &Config,
) -> Result<ScareEngine, Box<dyn std::error::Error>> {
    if let Ok(Some(json)) = store.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<ScareEngine>(&json) {
            return Ok(engine);
        }
    }
    let catalog = config.scare_catalog()?;
    Ok(ScareEngine::new(catalog, config.engine_config()))
}

pub fn save_engine(store: &PrefStore, engine: &ScareEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    store.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

pub fn load_visibility(store: &PrefStore) -> VisibilityController {
    if let Ok(Some(json)) = store.kv_get(VISIBILITY_KEY) {
        if let Ok(vis) = serde_json::from_str::<VisibilityController>(&json) {
            return vis;
        }
    }
    VisibilityController::new()
}

pub fn save_visibility(
    store: &PrefStore,
    vis: &VisibilityController,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(vis)?;
    store.kv_set(VISIBILITY_KEY, &json)?;
    Ok(())
}

/// Build the engine's tick context. The media answer goes through the
/// combined liveness signal -- the one source of truth for "is other media
/// playing" -- rather than reading the stored flag directly.
pub fn tick_context(
    media_flag: bool,
    safe_mode: bool,
    visibility: &VisibilityController,
) -> TickContext {
    let mut signal = LivenessSignal::new();
    signal.set_session_flag(media_flag);
    TickContext {
        safe_mode,
        media_active: signal.is_media_active(),
        hidden: visibility.is_hidden(),
    }
}

/// Terminal stand-in for the overlay surface: side effects go to stderr,
/// leaving stdout to the JSON event stream.
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn show(&mut self, entry: &ScareEntry) {
        eprintln!("[overlay] visible: {}", entry.image);
    }

    fn play_audio(&mut self, entry: &ScareEntry) -> Result<(), String> {
        eprintln!("[audio] playing: {}", entry.sound);
        Ok(())
    }

    fn hide(&mut self) {
        eprintln!("[overlay] hidden");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_context_routes_media_through_liveness_signal() {
        let visibility = VisibilityController::new();

        let ctx = tick_context(true, false, &visibility);
        assert!(ctx.media_active);
        assert!(!ctx.safe_mode);
        assert!(!ctx.hidden);

        let ctx = tick_context(false, true, &visibility);
        assert!(!ctx.media_active);
        assert!(ctx.safe_mode);
    }
}
