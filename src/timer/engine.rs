//! Timer engine for the focus timer.
//!
//! This module provides the countdown state machine:
//! - State transitions (Idle/Running × Work/Break)
//! - Phase completion with the notification cue
//! - Event firing for the outer application (session logging)
//! - Settings changes applied as explicit transitions
//!
//! The engine is synchronous and owns no tick source; whoever drives it
//! calls [`TimerEngine::tick`] once per elapsed second while it is running.

use std::rc::Rc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::settings::Settings;
use crate::sound::{NotificationCue, SoundPlayer};
use crate::types::{TimerPhase, TimerState};

use super::progress::ProgressRing;

/// Step used by the +30 s / -30 s controls.
pub const ADJUST_STEP_SECONDS: i64 = 30;

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for the outer application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Countdown started or resumed
    Started {
        phase: TimerPhase,
    },
    /// Countdown paused
    Paused {
        remaining_seconds: u32,
    },
    /// One second elapsed
    Tick {
        remaining_seconds: u32,
    },
    /// A work phase ran out. Emitted exactly once per completed work phase;
    /// this is the hook that records a finished focus interval.
    WorkCompleted {
        /// Seconds actually counted down, including +/- adjustments
        duration_seconds: u32,
    },
    /// A work phase was reset after some time had elapsed
    WorkAborted {
        elapsed_seconds: u32,
    },
    /// A break phase ran out
    BreakCompleted,
    /// Timer returned to the initial work phase
    Reset,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Countdown state machine for one timer instance.
pub struct TimerEngine {
    /// Settings the current phase lengths derive from
    settings: Settings,
    /// Settings received while running, adopted when the phase ends
    pending_settings: Option<Settings>,
    /// Current timer state
    state: TimerState,
    /// Seconds counted down in the current phase
    elapsed_seconds: u32,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Player for the notification cue
    sound: Option<Rc<dyn SoundPlayer>>,
    cue: NotificationCue,
}

impl TimerEngine {
    /// Creates an idle engine at the start of a work phase.
    pub fn new(settings: Settings, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            settings,
            pending_settings: None,
            state: TimerState::new(settings.work_seconds()),
            elapsed_seconds: 0,
            event_tx,
            sound: None,
            cue: NotificationCue::default(),
        }
    }

    /// Attaches a player for the notification cue.
    pub fn with_sound_player(mut self, player: Rc<dyn SoundPlayer>) -> Self {
        self.sound = Some(player);
        self
    }

    /// Starts the countdown.
    ///
    /// Returns false if the timer is already running or has no time left;
    /// reaching zero is handled by completion, never by start.
    pub fn start(&mut self) -> bool {
        if self.state.running || self.state.remaining_seconds == 0 {
            return false;
        }
        self.state.running = true;
        self.emit(TimerEvent::Started {
            phase: self.state.phase,
        });
        true
    }

    /// Pauses the countdown. Returns false if it was not running.
    pub fn pause(&mut self) -> bool {
        if !self.state.running {
            return false;
        }
        self.state.running = false;
        self.emit(TimerEvent::Paused {
            remaining_seconds: self.state.remaining_seconds,
        });
        true
    }

    /// Starts when idle, pauses when running. Returns the new running flag.
    pub fn toggle(&mut self) -> bool {
        if self.state.running {
            self.pause();
        } else {
            self.start();
        }
        self.state.running
    }

    /// Counts down one second.
    ///
    /// Ticks while idle are ignored. When the countdown reaches zero the
    /// phase completes synchronously and the finished phase is returned.
    pub fn tick(&mut self) -> Option<TimerPhase> {
        if !self.state.running {
            return None;
        }

        let finished = self.state.tick();
        self.elapsed_seconds += 1;
        self.emit(TimerEvent::Tick {
            remaining_seconds: self.state.remaining_seconds,
        });

        if finished {
            Some(self.complete_phase())
        } else {
            None
        }
    }

    /// Handles a phase running out: stop, cue, notify, then flip phase.
    ///
    /// The next phase is left idle; it never starts on its own.
    fn complete_phase(&mut self) -> TimerPhase {
        let finished = self.state.phase;
        self.state.running = false;
        self.play_cue();

        match finished {
            TimerPhase::Work => self.emit(TimerEvent::WorkCompleted {
                duration_seconds: self.elapsed_seconds,
            }),
            TimerPhase::Break => self.emit(TimerEvent::BreakCompleted),
        }

        self.adopt_pending_settings();
        let next = finished.next();
        self.state.enter_phase(next, self.settings.phase_seconds(next));
        self.elapsed_seconds = 0;
        debug!("Phase {} complete, now idle in {}", finished.as_str(), next.as_str());
        finished
    }

    /// Returns to an idle work phase with the full work length.
    pub fn reset(&mut self) {
        if self.state.phase == TimerPhase::Work && self.elapsed_seconds > 0 {
            self.emit(TimerEvent::WorkAborted {
                elapsed_seconds: self.elapsed_seconds,
            });
        }

        self.adopt_pending_settings();
        self.state
            .enter_phase(TimerPhase::Work, self.settings.work_seconds());
        self.elapsed_seconds = 0;
        self.emit(TimerEvent::Reset);
    }

    /// Moves the remaining time by `delta_seconds`, clamped to
    /// `0..=phase_length`. Returns the new remaining time.
    ///
    /// Reaching zero this way does not complete the phase. A running
    /// countdown that hits zero stops without firing completion.
    pub fn adjust(&mut self, delta_seconds: i64) -> u32 {
        let phase_length = i64::from(self.phase_length());
        let adjusted = (i64::from(self.state.remaining_seconds) + delta_seconds).clamp(0, phase_length);
        self.state.remaining_seconds = adjusted as u32;

        if self.state.remaining_seconds == 0 && self.state.running {
            debug!("Remaining time adjusted to zero, stopping without completion");
            self.pause();
        }
        self.state.remaining_seconds
    }

    /// Adds 30 seconds, capped at the phase length.
    pub fn add_step(&mut self) -> u32 {
        self.adjust(ADJUST_STEP_SECONDS)
    }

    /// Subtracts 30 seconds, floored at zero.
    pub fn subtract_step(&mut self) -> u32 {
        self.adjust(-ADJUST_STEP_SECONDS)
    }

    /// Applies new settings.
    ///
    /// The sound flag takes effect immediately. While idle, a change in
    /// durations resets the remaining time to the full length of the current
    /// phase. While running, the durations are held until the current phase
    /// ends or the timer is reset.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings.sound_enabled = settings.sound_enabled;

        if self.state.running {
            // Reverting to the current durations drops an earlier deferral.
            self.pending_settings = settings.durations_differ(&self.settings).then_some(settings);
            if self.pending_settings.is_some() {
                debug!("Timer running, deferring duration change");
            }
            return;
        }

        let durations_changed = settings.durations_differ(&self.settings);
        self.settings = settings;
        self.pending_settings = None;
        if durations_changed {
            self.state.remaining_seconds = self.phase_length();
            self.elapsed_seconds = 0;
        }
    }

    fn adopt_pending_settings(&mut self) {
        if let Some(pending) = self.pending_settings.take() {
            self.settings = Settings {
                sound_enabled: self.settings.sound_enabled,
                ..pending
            };
        }
    }

    fn play_cue(&self) {
        if !self.settings.sound_enabled {
            return;
        }
        if let Some(player) = &self.sound {
            if let Err(e) = player.play(&self.cue) {
                debug!("Notification cue failed: {} ({})", e, e.suggestion());
            }
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Timer event receiver dropped");
        }
    }

    /// Returns the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the settings the current phase lengths derive from.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns settings waiting for the current phase to end.
    pub fn pending_settings(&self) -> Option<&Settings> {
        self.pending_settings.as_ref()
    }

    /// Full length of the current phase in seconds.
    pub fn phase_length(&self) -> u32 {
        self.settings.phase_seconds(self.state.phase)
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Seconds counted down in the current phase.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Progress ring for the current moment.
    pub fn progress(&self) -> ProgressRing {
        ProgressRing::new(self.state.remaining_seconds, self.phase_length())
    }

    /// Returns a mutable reference to the timer state (for testing).
    #[cfg(test)]
    pub fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}

// ============================================================================
// Tests
// ============================================================================
