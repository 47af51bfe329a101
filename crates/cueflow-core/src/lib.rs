//! # Cueflow Core Library
//!
//! Core logic for the Cueflow cue-sports scorekeeper: a per-turn shot clock
//! with audio and haptic cues, snooker scoring with undo and redo, and a
//! persistent head-to-head rivalry history. The `cueflow` CLI is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A frame-driven state machine. A [`FrameDriver`] task
//!   feeds it elapsed time while a countdown runs; the engine returns typed
//!   [`TimerEvent`]s that the [`GameSession`] fans out to listeners
//! - **Cues**: [`TimerAudioCoordinator`] and [`HapticDispatcher`] turn ticks
//!   into sounds and pulses behind swappable backends
//! - **Scoring**: [`ScoringStack`] keeps the session score and a bounded
//!   command log for undo and redo
//! - **Storage**: SQLite key/value persistence for rivalries and settings,
//!   TOML configuration for tuning values
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`GameSession`]: Logic-thread owner of one game
//! - [`RivalryStore`]: Head-to-head win history
//! - [`AppStore`]: Persisted slices over a [`KeyValueStore`]
//! - [`Config`]: Application configuration management

pub mod audio;
pub mod confirm;
pub mod error;
pub mod events;
pub mod game;
pub mod haptics;
pub mod lifecycle;
pub mod rivalry;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod storage;
pub mod store;
pub mod timer;

pub use storage::config;

pub use audio::{AudioError, AudioPlayer, Cue, SilentPlayer, TimerAudioCoordinator};
pub use confirm::Confirmation;
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use events::{EventLog, TimerEvent, TimerListener};
pub use game::{BallType, FoulPoints, GameMode, GameSetup, GameState, Player, PlayerPair};
pub use haptics::{HapticDispatcher, HapticEngine, HapticError, HapticPulse, NoHaptics};
pub use lifecycle::{AppLifecycle, AppStatus, LifecycleChange};
pub use rivalry::{Rivalry, RivalryStore};
pub use scoring::{FrameScoreState, ScoringAction, ScoringStack, TimerRequest};
pub use session::GameSession;
pub use settings::{Settings, SharedSettings, ThemeMode, ThemeOption};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use store::AppStore;
pub use timer::{
    FrameDriver, SharedTimer, TimerDuration, TimerEngine, TimerPhase, TimerSnapshot,
};
