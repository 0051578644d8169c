//! Focus timer state.

use serde::{Deserialize, Serialize};

// ============================================================================
// TimerPhase
// ============================================================================

/// The phase the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Focused work
    #[default]
    Work,
    /// Break between focus intervals
    Break,
}

impl TimerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Work => "work",
            TimerPhase::Break => "break",
        }
    }

    /// Returns the phase that follows this one.
    pub fn next(&self) -> Self {
        match self {
            TimerPhase::Work => TimerPhase::Break,
            TimerPhase::Break => TimerPhase::Work,
        }
    }

    /// Returns a label for display.
    pub fn label(&self) -> &'static str {
        match self {
            TimerPhase::Work => "Focus Time",
            TimerPhase::Break => "Break Time",
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Countdown state of one timer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Current phase
    pub phase: TimerPhase,
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Whether the countdown is running
    pub running: bool,
}

impl TimerState {
    /// Creates an idle work phase with `work_seconds` remaining.
    pub fn new(work_seconds: u32) -> Self {
        Self {
            phase: TimerPhase::Work,
            remaining_seconds: work_seconds,
            running: false,
        }
    }

    /// Enters `phase` idle, with the full `length` remaining.
    pub fn enter_phase(&mut self, phase: TimerPhase, length: u32) {
        self.phase = phase;
        self.remaining_seconds = length;
        self.running = false;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if the countdown has reached zero.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds == 0
    }

    /// Returns true for the idle states.
    pub fn is_idle(&self) -> bool {
        !self.running
    }
}

// ============================================================================
// Tests
// ============================================================================
