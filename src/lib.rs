//! FocusTools Library
//!
//! This library provides the core functionality for FocusTools, a task list
//! with a Pomodoro focus timer. It includes:
//! - Timer engine, tick source and progress ring for the focus timer
//! - SQLite-backed task and session store with stats
//! - REST API server over the store
//! - CLI command parsing, API client and display utilities
//! - Settings persistence
//! - Sound playback for timer notifications
//! - Type definitions shared by server and client

pub mod cli;
pub mod server;
pub mod settings;
pub mod sound;
pub mod store;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    NewSession, NewTask, PopulatedSession, Session, SortOrder, Stats, Task, TaskUpdate,
    TimerPhase, TimerState,
};

pub use settings::{Settings, SettingsError, SettingsStore};
pub use store::{Database, StoreError};
pub use timer::{ProgressRing, Ticker, TimerEngine, TimerEvent};

// Re-export sound types
pub use sound::{MockSoundPlayer, NotificationCue, RodioSoundPlayer, SoundError, SoundPlayer};
