//! The notification cue played when a timer phase ends.

use std::time::Duration;

/// A short synthesized beep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotificationCue {
    /// Tone frequency in Hz
    pub frequency_hz: f32,
    /// How long the tone plays
    pub duration: Duration,
    /// Playback volume (0.0-1.0)
    pub volume: f32,
}

impl Default for NotificationCue {
    fn default() -> Self {
        Self {
            frequency_hz: 880.0,
            duration: Duration::from_millis(300),
            volume: 0.5,
        }
    }
}

impl NotificationCue {
    /// Returns a copy with the volume clamped to `0.0..=1.0`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            volume: self.volume.clamp(0.0, 1.0),
            ..self
        }
    }
}
