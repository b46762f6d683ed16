//! # Scareloop Core Library
//!
//! This library provides the core logic for Scareloop, a consent-gated
//! jumpscare effect. Content sits behind a waiver; once the waiver is
//! accepted (and safe mode is off) the engine fires a visual+audio scare
//! at randomized intervals, deferring while other media is playing,
//! while the surface is hidden, or while a scare is already on screen.
//!
//! ## Architecture
//!
//! - **Scare Engine**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` with the current time
//! - **Storage**: SQLite-based preference flags and TOML-based configuration
//! - **Presenter**: Trait seam for the host surface that actually shows the
//!   overlay and plays audio
//!
//! ## Key Components
//!
//! - [`ScareEngine`]: Core scheduling state machine
//! - [`ScareCatalog`]: Non-empty pool of visual/audio pairs
//! - [`PrefStore`]: Consent and safe-mode persistence
//! - [`Config`]: Timing knobs and catalog configuration

pub mod catalog;
pub mod engine;
pub mod error;
pub mod events;
pub mod liveness;
pub mod presenter;
pub mod storage;
pub mod visibility;

pub use catalog::{ScareCatalog, ScareEntry};
pub use engine::{EngineConfig, EnginePhase, PendingTimer, ScareEngine, TickContext, TimerKind};
pub use error::{CatalogError, ConfigError, CoreError, StorageError};
pub use events::{Event, SuppressReason};
pub use liveness::{LivenessSignal, MediaSource, PlaybackState};
pub use presenter::Presenter;
pub use storage::{Config, PrefStore};
pub use visibility::VisibilityController;
