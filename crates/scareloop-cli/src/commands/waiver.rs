use clap::Subcommand;
use scareloop_core::storage::{Config, PrefStore};

use crate::common;

#[derive(Subcommand)]
pub enum WaiverAction {
    /// Print consent state as JSON
    Status,
    /// Accept the waiver: consent granted, scares on
    Accept,
    /// Accept the waiver but opt out of scares
    SafeMode {
        /// Disable safe mode again (consent stays granted)
        #[arg(long)]
        off: bool,
    },
    /// Dismiss the gate without storing anything
    Decline,
}

fn print_status(store: &PrefStore) -> Result<(), Box<dyn std::error::Error>> {
    let status = serde_json::json!({
        "granted": store.consent(),
        "safe_mode": store.safe_mode(),
        "gate_shown": !store.consent(),
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

pub fn run(action: WaiverAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = PrefStore::open()?;

    match action {
        WaiverAction::Status => print_status(&store)?,
        WaiverAction::Accept => {
            store.accept_waiver()?;
            let config = Config::load_or_default();
            let mut engine = common::load_engine(&store, &config)?;
            let visibility = common::load_visibility(&store);
            let event = engine.start(
                store.consent(),
                store.safe_mode(),
                visibility.is_hidden(),
                common::now_ms(),
            );
            if let Some(event) = event {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            common::save_engine(&store, &engine)?;
        }
        WaiverAction::SafeMode { off } => {
            store.set_safe_mode(!off)?;
            print_status(&store)?;
        }
        WaiverAction::Decline => {
            // Nothing persisted: the gate shows again next visit.
            print_status(&store)?;
        }
    }
    Ok(())
}
