//! Timer settings and their local persistence.
//!
//! Settings hold the work and break durations plus the sound flag. They are
//! stored as JSON in the user's configuration directory and handed to the
//! timer engine explicitly; nothing reads them from global state.

mod error;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::TimerPhase;

pub use error::SettingsError;

/// Environment variable overriding the settings file location.
pub const SETTINGS_PATH_ENV: &str = "FOCUSTOOLS_SETTINGS";

const SETTINGS_FILE_NAME: &str = "settings.json";
const APP_DIR_NAME: &str = "focustools";

pub const WORK_MINUTES_RANGE: (u32, u32) = (1, 60);
pub const BREAK_MINUTES_RANGE: (u32, u32) = (1, 30);

fn default_work_minutes() -> u32 {
    25
}

fn default_break_minutes() -> u32 {
    5
}

fn default_sound_enabled() -> bool {
    true
}

// ============================================================================
// Settings
// ============================================================================

/// Timer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Work duration in minutes (1-60)
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    /// Break duration in minutes (1-30)
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    /// Whether the notification cue plays when a phase ends
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            sound_enabled: default_sound_enabled(),
        }
    }
}

impl Settings {
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.break_minutes = minutes;
        self
    }

    pub fn with_sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Validates the duration ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_range("workMinutes", self.work_minutes, WORK_MINUTES_RANGE)?;
        check_range("breakMinutes", self.break_minutes, BREAK_MINUTES_RANGE)?;
        Ok(())
    }

    pub fn work_seconds(&self) -> u32 {
        self.work_minutes * 60
    }

    pub fn break_seconds(&self) -> u32 {
        self.break_minutes * 60
    }

    /// Returns the full length of `phase` in seconds.
    pub fn phase_seconds(&self, phase: TimerPhase) -> u32 {
        match phase {
            TimerPhase::Work => self.work_seconds(),
            TimerPhase::Break => self.break_seconds(),
        }
    }

    /// Returns true if the phase lengths differ from `other`'s.
    pub fn durations_differ(&self, other: &Settings) -> bool {
        self.work_minutes != other.work_minutes || self.break_minutes != other.break_minutes
    }
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<(), SettingsError> {
    if value < min || value > max {
        return Err(SettingsError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

// ============================================================================
// SettingsStore
// ============================================================================

/// JSON file holding the user's settings.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Opens the store at `$FOCUSTOOLS_SETTINGS`, or the default location.
    pub fn from_env() -> Result<Self, SettingsError> {
        if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(Self::new(path));
            }
        }
        Ok(Self::new(Self::default_path()?))
    }

    /// Returns `<config_dir>/focustools/settings.json`.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the settings file.
    ///
    /// A missing file yields the defaults.
    pub fn try_load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            debug!("No settings file at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads the settings file, falling back to the defaults on any error.
    pub fn load(&self) -> Settings {
        match self.try_load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings file: {}", e);
                Settings::default()
            }
        }
    }

    /// Validates and writes `settings`, creating parent directories.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        settings.validate()?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(settings).map_err(|source| {
            SettingsError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, content).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
