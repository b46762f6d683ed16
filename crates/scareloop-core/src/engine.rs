//! Scare engine implementation.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads or timers - the caller is responsible for calling `tick()`
//! periodically with the current time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Armed -> (Presenting | SuppressedRetry) -> Armed
//! ```
//!
//! A wake-up with safe mode on drops straight back to `Idle` with no timer.
//! A wake-up blocked by media playback or an in-flight scare re-arms with a
//! short fixed backoff instead of a fresh full random delay, so a scare is
//! never starved for a whole random window by a momentary block.
//!
//! ## Invariants
//!
//! - At most one pending wake-up timer exists at any instant: the timer is a
//!   single `Option` slot and arming always replaces it whole.
//! - `active` is true strictly for the presentation window of one scare and
//!   guards against overlapping presentations.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = ScareEngine::new(catalog, EngineConfig::default());
//! engine.start(consent, safe_mode, hidden, now_ms);
//! // In a loop:
//! engine.tick(now_ms, &ctx, &mut presenter);
//! ```

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::catalog::{ScareCatalog, ScareEntry};
use crate::events::{Event, SuppressReason};
use crate::presenter::Presenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    /// No consent, safe mode, or surface hidden: nothing scheduled.
    Idle,
    /// A randomized wake-up timer is pending.
    Armed,
    /// A wake-up fired but was blocked; a short fixed retry timer is pending.
    SuppressedRetry,
    /// A scare is currently on screen.
    Presenting,
}

/// What a pending wake-up will do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Fresh randomized delay within the scheduling window.
    Schedule,
    /// Short fixed backoff after a blocked wake-up.
    Retry,
}

/// The single cancellable scheduled-callback slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTimer {
    pub deadline_epoch_ms: u64,
    pub kind: TimerKind,
}

/// Timing knobs. Startup constants, not runtime flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound of the uniform random scheduling window.
    pub schedule_window_ms: u64,
    /// Fixed backoff after a blocked wake-up.
    pub retry_backoff_ms: u64,
    /// How long a scare stays on screen.
    pub display_duration_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schedule_window_ms: 60_000,
            retry_backoff_ms: 10_000,
            display_duration_ms: 3_000,
        }
    }
}

/// Point-in-time answers the engine needs at a tick.
///
/// The engine re-polls these on every wake-up and at presentation
/// completion; it never caches them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickContext {
    pub safe_mode: bool,
    pub media_active: bool,
    pub hidden: bool,
}

/// Core scare scheduling engine.
///
/// Operates on wall-clock instants passed in by the caller -- no internal
/// thread. Serializable so a host can park it between invocations; the rng
/// is re-seeded from entropy on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScareEngine {
    config: EngineConfig,
    catalog: ScareCatalog,
    phase: EnginePhase,
    /// The one pending wake-up. Arming always replaces this slot whole.
    pending: Option<PendingTimer>,
    /// True strictly while a scare is on screen.
    active: bool,
    /// What the overlay is currently showing.
    current: Option<ScareEntry>,
    /// Instant at which the current presentation ends.
    presenting_until: Option<u64>,
    #[serde(skip, default = "entropy_rng")]
    rng: Mcg128Xsl64,
}

fn entropy_rng() -> Mcg128Xsl64 {
    Mcg128Xsl64::from_entropy()
}

impl ScareEngine {
    /// Create a new engine. The catalog is already validated non-empty.
    pub fn new(catalog: ScareCatalog, config: EngineConfig) -> Self {
        Self::with_rng(catalog, config, entropy_rng())
    }

    /// Create an engine with a fixed seed (deterministic delays and picks).
    pub fn with_seed(catalog: ScareCatalog, config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(catalog, config, Mcg128Xsl64::seed_from_u64(seed))
    }

    fn with_rng(catalog: ScareCatalog, config: EngineConfig, rng: Mcg128Xsl64) -> Self {
        Self {
            config,
            catalog,
            phase: EnginePhase::Idle,
            pending: None,
            active: false,
            current: None,
            presenting_until: None,
            rng,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pending(&self) -> Option<PendingTimer> {
        self.pending
    }

    /// Entry currently on the overlay, if a scare is active.
    pub fn current(&self) -> Option<&ScareEntry> {
        self.current.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ScareCatalog {
        &self.catalog
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            active: self.active,
            pending_kind: self.pending.map(|p| p.kind),
            pending_deadline_epoch_ms: self.pending.map(|p| p.deadline_epoch_ms),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the loop after the waiver is resolved.
    ///
    /// A no-op unless consent is granted with safe mode off and the surface
    /// is visible; a hidden surface re-enters only via the visible signal.
    /// If a scare is somehow already active, its own completion re-arms
    /// instead.
    pub fn start(
        &mut self,
        consent: bool,
        safe_mode: bool,
        hidden: bool,
        now_ms: u64,
    ) -> Option<Event> {
        if !consent || safe_mode || hidden || self.active {
            return None;
        }
        Some(self.arm(now_ms))
    }

    /// Arm a fresh randomized wake-up, cancelling any pending timer first.
    pub fn arm(&mut self, now_ms: u64) -> Event {
        let delay_ms = if self.config.schedule_window_ms == 0 {
            0
        } else {
            self.rng.gen_range(0..self.config.schedule_window_ms)
        };
        let deadline = now_ms.saturating_add(delay_ms);
        self.pending = Some(PendingTimer {
            deadline_epoch_ms: deadline,
            kind: TimerKind::Schedule,
        });
        if !self.active {
            self.phase = EnginePhase::Armed;
        }
        Event::EngineArmed {
            delay_ms,
            deadline_epoch_ms: deadline,
            at: Utc::now(),
        }
    }

    /// Surface went hidden: cancel the pending wake-up timer only.
    /// An in-flight presentation is allowed to finish naturally.
    pub fn on_hidden(&mut self) -> Option<Event> {
        let had_timer = self.pending.take().is_some();
        self.phase = if self.active {
            EnginePhase::Presenting
        } else {
            EnginePhase::Idle
        };
        had_timer.then(|| Event::ScheduleCancelled { at: Utc::now() })
    }

    /// Surface became visible again: arm a fresh delay unless safe mode is
    /// on or a presentation is active (whose completion will re-arm).
    pub fn on_visible(&mut self, safe_mode: bool, now_ms: u64) -> Option<Event> {
        if safe_mode || self.active {
            return None;
        }
        Some(self.arm(now_ms))
    }

    /// Idempotent safety net: re-arm if the engine was left without a timer
    /// by a missed transition. A no-op whenever a timer is already pending,
    /// a scare is active, or arming is not currently allowed.
    pub fn watchdog(
        &mut self,
        consent: bool,
        safe_mode: bool,
        hidden: bool,
        now_ms: u64,
    ) -> Option<Event> {
        if !consent || safe_mode || hidden || self.active || self.pending.is_some() {
            return None;
        }
        Some(self.arm(now_ms))
    }

    /// Tear down scheduling state entirely (host reset).
    pub fn reset(&mut self) {
        self.phase = EnginePhase::Idle;
        self.pending = None;
        self.active = false;
        self.current = None;
        self.presenting_until = None;
    }

    /// Advance the machine to `now_ms`. Fires due deadlines in order:
    /// presentation completion first (freeing the `active` guard), then the
    /// pending wake-up. Returns every event produced.
    pub fn tick(
        &mut self,
        now_ms: u64,
        ctx: &TickContext,
        presenter: &mut dyn Presenter,
    ) -> Vec<Event> {
        let mut events = Vec::new();

        if let Some(until) = self.presenting_until {
            if self.active && now_ms >= until {
                events.extend(self.finish_presentation(now_ms, ctx, presenter));
            }
        }

        if let Some(timer) = self.pending {
            if now_ms >= timer.deadline_epoch_ms {
                self.pending = None;
                events.extend(self.wake(now_ms, ctx, presenter));
            }
        }

        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// A wake-up fired. Safe mode short-circuits everything; a blocked
    /// wake-up re-arms with the fixed backoff; otherwise present a scare.
    fn wake(
        &mut self,
        now_ms: u64,
        ctx: &TickContext,
        presenter: &mut dyn Presenter,
    ) -> Vec<Event> {
        if ctx.safe_mode {
            self.phase = if self.active {
                EnginePhase::Presenting
            } else {
                EnginePhase::Idle
            };
            return vec![Event::ScareSuppressed {
                reason: SuppressReason::SafeMode,
                retry_in_ms: None,
                at: Utc::now(),
            }];
        }

        if ctx.media_active || self.active {
            let reason = if ctx.media_active {
                SuppressReason::MediaPlaying
            } else {
                SuppressReason::AlreadyPresenting
            };
            let backoff = self.config.retry_backoff_ms;
            self.pending = Some(PendingTimer {
                deadline_epoch_ms: now_ms.saturating_add(backoff),
                kind: TimerKind::Retry,
            });
            if !self.active {
                self.phase = EnginePhase::SuppressedRetry;
            }
            return vec![Event::ScareSuppressed {
                reason,
                retry_in_ms: Some(backoff),
                at: Utc::now(),
            }];
        }

        self.trigger(now_ms, presenter).into_iter().collect()
    }

    /// Enter `Presenting`. A no-op if a scare is already active.
    fn trigger(&mut self, now_ms: u64, presenter: &mut dyn Presenter) -> Option<Event> {
        if self.active {
            return None;
        }
        self.active = true;
        self.phase = EnginePhase::Presenting;

        let entry = self.catalog.pick(&mut self.rng).clone();
        presenter.show(&entry);
        let audio_ok = presenter.play_audio(&entry).is_ok();

        self.presenting_until = Some(now_ms.saturating_add(self.config.display_duration_ms));
        let event = Event::ScareStarted {
            image: entry.image.clone(),
            sound: entry.sound.clone(),
            audio_ok,
            display_ms: self.config.display_duration_ms,
            at: Utc::now(),
        };
        self.current = Some(entry);
        Some(event)
    }

    /// The fixed display duration elapsed: clear the overlay, drop the
    /// `active` guard, and re-arm with a fresh random delay -- re-checking
    /// safe mode and visibility at this instant.
    fn finish_presentation(
        &mut self,
        now_ms: u64,
        ctx: &TickContext,
        presenter: &mut dyn Presenter,
    ) -> Vec<Event> {
        presenter.hide();
        self.active = false;
        self.current = None;
        self.presenting_until = None;

        let mut events = vec![Event::ScareEnded {
            shown_ms: self.config.display_duration_ms,
            at: Utc::now(),
        }];

        if ctx.safe_mode || ctx.hidden {
            // Re-arm suppressed; drop any leftover retry timer too.
            self.pending = None;
            self.phase = EnginePhase::Idle;
        } else {
            events.push(self.arm(now_ms));
        }
        events
    }
}


#[cfg(test)]
mod invariants {
    //! Property tests: for all operation sequences, the pending-timer slot
    //! and the `active` guard stay consistent.

    use super::*;
    use crate::catalog::ScareCatalog;
    use crate::presenter::Presenter;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Arm,
        Hidden,
        Visible { safe_mode: bool },
        Watchdog { consent: bool, safe_mode: bool, hidden: bool },
        Advance { dt_ms: u64, safe_mode: bool, media_active: bool, hidden: bool },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Arm),
            Just(Op::Hidden),
            any::<bool>().prop_map(|safe_mode| Op::Visible { safe_mode }),
            (any::<bool>(), any::<bool>(), any::<bool>())
                .prop_map(|(consent, safe_mode, hidden)| Op::Watchdog { consent, safe_mode, hidden }),
            (0u64..120_000, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
                |(dt_ms, safe_mode, media_active, hidden)| Op::Advance {
                    dt_ms,
                    safe_mode,
                    media_active,
                    hidden
                }
            ),
        ]
    }

    #[derive(Default)]
    struct BalancePresenter {
        shows: usize,
        hides: usize,
    }

    impl Presenter for BalancePresenter {
        fn show(&mut self, _entry: &crate::catalog::ScareEntry) {
            self.shows += 1;
        }
        fn play_audio(&mut self, _entry: &crate::catalog::ScareEntry) -> Result<(), String> {
            Ok(())
        }
        fn hide(&mut self) {
            self.hides += 1;
        }
    }

    proptest! {
        #[test]
        fn timer_slot_and_active_flag_stay_consistent(
            seed in any::<u64>(),
            ops in proptest::collection::vec(op_strategy(), 1..60),
        ) {
            let mut engine =
                ScareEngine::with_seed(ScareCatalog::default_assets(), EngineConfig::default(), seed);
            let mut presenter = BalancePresenter::default();
            let mut now_ms: u64 = 0;

            for op in ops {
                match op {
                    Op::Arm => {
                        engine.arm(now_ms);
                    }
                    Op::Hidden => {
                        engine.on_hidden();
                    }
                    Op::Visible { safe_mode } => {
                        engine.on_visible(safe_mode, now_ms);
                    }
                    Op::Watchdog { consent, safe_mode, hidden } => {
                        engine.watchdog(consent, safe_mode, hidden, now_ms);
                    }
                    Op::Advance { dt_ms, safe_mode, media_active, hidden } => {
                        now_ms += dt_ms;
                        let ctx = TickContext { safe_mode, media_active, hidden };
                        engine.tick(now_ms, &ctx, &mut presenter);
                    }
                }

                // At most one scare on screen; shows and hides are balanced
                // by the active flag.
                prop_assert_eq!(
                    presenter.shows - presenter.hides,
                    usize::from(engine.is_active())
                );
                // A pending timer only exists in a phase that expects one.
                if engine.pending().is_some() {
                    prop_assert_ne!(engine.phase(), EnginePhase::Idle);
                }
                // Idle really means disarmed.
                if engine.phase() == EnginePhase::Idle {
                    prop_assert!(engine.pending().is_none());
                    prop_assert!(!engine.is_active());
                }
                // Presenting is exactly the active window.
                if engine.phase() == EnginePhase::Presenting {
                    prop_assert!(engine.is_active());
                }
            }
        }
    }
}
