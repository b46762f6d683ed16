//! Liveness signal: "is other media playing right now?"
//!
//! Combines an explicit session flag (settable by unrelated page features)
//! with a point-in-time poll of any registered playable media sources.
//! This is the single source of truth the engine consults before firing;
//! it is a poll, not a subscription -- the engine re-polls on every wake-up.

use serde::{Deserialize, Serialize};

/// Anything that can report whether it is currently playing.
pub trait MediaSource {
    fn is_playing(&self) -> bool;
}

/// Playback state of one native media element, as the host last observed it.
///
/// Active means playing, not ended, with a nonzero elapsed position --
/// an element parked at 0:00 does not count.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlaybackState {
    pub playing: bool,
    pub ended: bool,
    pub position_ms: u64,
}

impl MediaSource for PlaybackState {
    fn is_playing(&self) -> bool {
        self.playing && !self.ended && self.position_ms > 0
    }
}

/// Combined media-activity signal.
#[derive(Default)]
pub struct LivenessSignal {
    session_flag: bool,
    sources: Vec<Box<dyn MediaSource>>,
}

impl LivenessSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the cross-feature "media is playing" flag.
    pub fn set_session_flag(&mut self, playing: bool) {
        self.session_flag = playing;
    }

    pub fn session_flag(&self) -> bool {
        self.session_flag
    }

    /// Register a media source to be polled.
    pub fn register(&mut self, source: Box<dyn MediaSource>) {
        self.sources.push(source);
    }

    /// True iff the session flag is set or any registered source is playing.
    /// An empty source list contributes false, never an error.
    pub fn is_media_active(&self) -> bool {
        self.session_flag || self.sources.iter().any(|s| s.is_playing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sources_no_flag_is_inactive() {
        let signal = LivenessSignal::new();
        assert!(!signal.is_media_active());
    }

    #[test]
    fn session_flag_alone_is_active() {
        let mut signal = LivenessSignal::new();
        signal.set_session_flag(true);
        assert!(signal.is_media_active());
        signal.set_session_flag(false);
        assert!(!signal.is_media_active());
    }

    #[test]
    fn playback_requires_playing_not_ended_nonzero_position() {
        let active = PlaybackState { playing: true, ended: false, position_ms: 1500 };
        assert!(active.is_playing());

        let paused = PlaybackState { playing: false, ended: false, position_ms: 1500 };
        assert!(!paused.is_playing());

        let ended = PlaybackState { playing: true, ended: true, position_ms: 1500 };
        assert!(!ended.is_playing());

        let at_start = PlaybackState { playing: true, ended: false, position_ms: 0 };
        assert!(!at_start.is_playing());
    }

    #[test]
    fn any_active_source_wins() {
        let mut signal = LivenessSignal::new();
        signal.register(Box::new(PlaybackState::default()));
        assert!(!signal.is_media_active());
        signal.register(Box::new(PlaybackState { playing: true, ended: false, position_ms: 10 }));
        assert!(signal.is_media_active());
    }
}
