//! One-second tick source for a running timer.
//!
//! The ticker is a scoped resource: it is armed when the engine enters a
//! running state and cancelled on every exit. Cancelling twice is harmless,
//! and a cancelled ticker never fires.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Interval between ticks of a running timer.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Cancellable periodic tick source.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Ticker {
    /// Creates a disarmed ticker with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Starts ticking; the first tick fires one period from now.
    ///
    /// Does nothing if the ticker is already armed.
    pub fn arm(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
        debug!("Tick source armed");
    }

    /// Stops ticking. Idempotent.
    pub fn cancel(&mut self) {
        if self.interval.take().is_some() {
            debug!("Tick source cancelled");
        }
    }

    /// Arms or cancels to match the engine's running flag.
    pub fn sync(&mut self, running: bool) {
        if running {
            self.arm();
        } else {
            self.cancel();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Waits for the next tick.
    ///
    /// Never resolves while the ticker is disarmed, which makes it safe to
    /// use as a `tokio::select!` branch.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[test]
    fn test_new_ticker_is_disarmed() {
        let ticker = Ticker::default();
        assert!(!ticker.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_armed_ticker_fires_after_one_period() {
        let mut ticker = Ticker::default();
        ticker.arm();

        let started = Instant::now();
        ticker.tick().await;
        assert_eq!(started.elapsed(), TICK_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarmed_ticker_never_fires() {
        let mut ticker = Ticker::default();
        let result = timeout(Duration::from_secs(5), ticker.tick()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let mut ticker = Ticker::default();
        ticker.arm();
        ticker.cancel();
        ticker.cancel();
        assert!(!ticker.is_armed());

        let result = timeout(Duration::from_secs(3), ticker.tick()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_arm_twice_keeps_schedule() {
        let mut ticker = Ticker::default();
        ticker.arm();
        tokio::time::advance(Duration::from_millis(600)).await;
        ticker.arm();

        let started = Instant::now();
        ticker.tick().await;
        assert_eq!(started.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_follows_running_flag() {
        let mut ticker = Ticker::default();
        ticker.sync(true);
        assert!(ticker.is_armed());
        ticker.sync(false);
        assert!(!ticker.is_armed());
    }
}
