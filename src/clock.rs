//! All things time-related.

pub use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Tells time and returns the time.
///
/// Generally you will want to retrieve time using [`SystemClock`],
/// but in tests you may want to implement a `Clock` with a fixed time.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;

    /// Whole seconds from now until the Unix timestamp `epoch`.
    ///
    /// Negative if `epoch` is already in the past.
    fn seconds_until(&self, epoch: i64) -> i64 {
        epoch.saturating_sub(self.now().timestamp())
    }
}

/// Interacts with the system clock to get the current time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Pauses the current task.
///
/// Backoff and throttling go through a `Sleeper` so that tests can record
/// the requested delays instead of actually waiting.
pub trait Sleeper {
    /// Waits for `duration` to elapse.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps using the Tokio timer.
#[derive(Debug, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}
