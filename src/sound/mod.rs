//! Sound playback for the focus timer.
//!
//! When a phase ends the timer plays a short notification cue. Playback is
//! best-effort: a missing audio device or a playback failure is logged and
//! otherwise ignored.
//!
//! # Usage
//!
//! ```rust,no_run
//! use focustools::sound::{NotificationCue, RodioSoundPlayer, SoundPlayer};
//!
//! let player = RodioSoundPlayer::new().expect("audio init");
//! player.play(&NotificationCue::default()).expect("playback failed");
//! ```

mod cue;
mod error;
mod player;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub use cue::NotificationCue;
pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};

/// Plays the cue the timer engine fires at the end of a phase.
pub trait SoundPlayer {
    /// Starts the cue and returns without waiting for it to finish.
    fn play(&self, cue: &NotificationCue) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, cue: &NotificationCue) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, cue)
    }
}

/// Player that counts cues instead of playing them.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_count: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Number of successful `play` calls.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_count.load(Ordering::SeqCst)
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, _cue: &NotificationCue) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
