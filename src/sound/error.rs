//! Sound system error types.
//!
//! Every sound error is recoverable: the timer logs it and carries on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SoundError {
    /// No default output device could be opened
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// A sink could not be attached to the output stream
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    #[error("sound playback failed: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Hint appended to the log line when the cue cannot play.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio output device",
            Self::StreamError(_) => "check your audio settings",
            Self::PlaybackError(_) => "disable sound with `settings set --sound false`",
        }
    }
}
