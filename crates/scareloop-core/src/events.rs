use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{EnginePhase, TimerKind};

/// Why a wake-up declined to start a scare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// Safe mode short-circuits everything; the engine goes quiet.
    SafeMode,
    /// Another media surface is playing right now.
    MediaPlaying,
    /// A scare is already on screen.
    AlreadyPresenting,
}

/// Every state change in the engine produces an Event.
/// Hosts poll for events and render/log them as they see fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A randomized wake-up timer was armed.
    EngineArmed {
        delay_ms: u64,
        deadline_epoch_ms: u64,
        at: DateTime<Utc>,
    },
    /// A wake-up fired but was blocked. `retry_in_ms` is the fixed backoff,
    /// or `None` when safe mode dropped the engine back to idle.
    ScareSuppressed {
        reason: SuppressReason,
        retry_in_ms: Option<u64>,
        at: DateTime<Utc>,
    },
    /// A scare presentation started.
    ScareStarted {
        image: String,
        sound: String,
        /// False when audio playback was refused; the visual still runs.
        audio_ok: bool,
        display_ms: u64,
        at: DateTime<Utc>,
    },
    /// The fixed display duration elapsed and the overlay was cleared.
    ScareEnded {
        shown_ms: u64,
        at: DateTime<Utc>,
    },
    /// The pending wake-up timer was cancelled (surface hidden).
    ScheduleCancelled {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: EnginePhase,
        active: bool,
        pending_kind: Option<TimerKind>,
        pending_deadline_epoch_ms: Option<u64>,
        at: DateTime<Utc>,
    },
}
