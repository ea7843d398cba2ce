//! Exponential backoff for retrying transient failures.

use std::time::Duration;

/// How many times to try a request and how long to wait between tries.
///
/// The delay after a failed attempt doubles each time: with the
/// [default](Backoff::default) policy, the waits are 1 second and then
/// 2 seconds, and no wait follows the third and final attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Backoff {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl Backoff {
    /// Creates a new policy allowing `max_attempts` tries in total.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Total number of attempts allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retrying after the zero-based attempt `attempt` failed,
    /// or `None` if that was the last attempt.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use twinsight::backoff::Backoff;
    ///
    /// let backoff = Backoff::default();
    /// assert_eq!(backoff.delay(0), Some(Duration::from_secs(1)));
    /// assert_eq!(backoff.delay(1), Some(Duration::from_secs(2)));
    /// assert_eq!(backoff.delay(2), None);
    /// ```
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts {
            None
        } else {
            let factor = 2u32.checked_pow(attempt)?;
            self.base_delay.checked_mul(factor)
        }
    }

    /// Every delay this policy can produce, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts).map_while(|attempt| self.delay(attempt))
    }
}
