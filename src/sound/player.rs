//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which synthesizes the
//! notification cue with rodio v0.20.

use std::rc::Rc;

use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::cue::NotificationCue;
use super::error::SoundError;

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking; the cue continues playing in the background.
/// The output stream is tied to the thread that created it, so the player is
/// shared with `Rc` rather than `Arc`.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Creates a new sound player on the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays `cue` without blocking.
    pub fn play(&self, cue: &NotificationCue) -> Result<(), SoundError> {
        let cue = cue.clamped();
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        let tone = SineWave::new(cue.frequency_hz)
            .take_duration(cue.duration)
            .amplify(cue.volume);
        sink.append(tone);
        sink.detach(); // Non-blocking: sound continues after function returns

        debug!("Notification cue started (detached)");
        Ok(())
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player() -> Option<Rc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(Rc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {} ({})", e, e.suggestion());
            None
        }
    }
}
