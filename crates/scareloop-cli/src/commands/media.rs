use clap::Subcommand;
use scareloop_core::storage::PrefStore;
use scareloop_core::LivenessSignal;

#[derive(Subcommand)]
pub enum MediaAction {
    /// Mark media as playing (defers scares)
    Playing,
    /// Clear the media-playing marker
    Stopped,
    /// Print the combined liveness signal as JSON
    Status,
}

pub fn run(action: MediaAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = PrefStore::open()?;

    match action {
        MediaAction::Playing => store.set_media_playing(true)?,
        MediaAction::Stopped => store.set_media_playing(false)?,
        MediaAction::Status => {}
    }

    let mut signal = LivenessSignal::new();
    signal.set_session_flag(store.media_playing());
    let status = serde_json::json!({
        "media_active": signal.is_media_active(),
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
