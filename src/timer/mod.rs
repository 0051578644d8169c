//! Focus timer.
//!
//! - [`TimerEngine`]: countdown state machine (Idle/Running × Work/Break)
//! - [`Ticker`]: cancellable one-second tick source
//! - [`ProgressRing`]: segmented progress derived from the countdown

pub mod engine;
pub mod progress;
pub mod ticker;

pub use engine::{TimerEngine, TimerEvent, ADJUST_STEP_SECONDS};
pub use progress::{ProgressRing, SEGMENT_COUNT, START_SEGMENT};
pub use ticker::{Ticker, TICK_PERIOD};
