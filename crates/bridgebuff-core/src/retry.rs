//! Bounded retry, independent of what is being retried.
//!
//! The transport uses this to repeat a failed exchange; anything else that
//! needs "try N times, then give up with the last error" can use it too.

use std::time::Duration;

/// Trait for defining retry strategies.
///
/// Implementations define how many attempts to make and how long to wait
/// between each attempt.
pub trait RetryStrategy {
    /// Maximum number of attempts. Values below 1 are treated as 1.
    fn max_attempts(&self) -> u32;

    /// Delay after the given failed attempt (0-indexed).
    ///
    /// Returns `None` if no delay should be applied.
    fn delay_for_attempt(&self, attempt: u32) -> Option<Duration>;

    /// Execute a function with retry logic.
    ///
    /// Calls `f` up to `max_attempts()` times, sleeping `delay_for_attempt()`
    /// between failed attempts, and returns the last error if none succeeds.
    fn execute<T, E, F>(&self, mut f: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
    {
        let last = self.max_attempts().max(1) - 1;

        for attempt in 0..last {
            if let Ok(value) = f(attempt) {
                return Ok(value);
            }
            if let Some(delay) = self.delay_for_attempt(attempt) {
                std::thread::sleep(delay);
            }
        }

        f(last)
    }
}

/// Fixed delay retry strategy.
///
/// Waits a constant duration between each attempt. A zero delay retries
/// immediately.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    max_attempts: u32,
    delay: Duration,
}

impl FixedDelay {
    /// Create a new fixed delay strategy.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Retry without waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }
}

impl RetryStrategy for FixedDelay {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay_for_attempt(&self, _attempt: u32) -> Option<Duration> {
        (!self.delay.is_zero()).then_some(self.delay)
    }
}

/// Run `f` up to `max_attempts` times with no delay, returning the first
/// success or the last error.
pub fn attempt<T, E, F>(max_attempts: u32, f: F) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
{
    FixedDelay::immediate(max_attempts).execute(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_delay() {
        let strategy = FixedDelay::new(3, Duration::from_millis(50));

        assert_eq!(strategy.max_attempts(), 3);
        assert_eq!(
            strategy.delay_for_attempt(0),
            Some(Duration::from_millis(50))
        );
        assert_eq!(
            strategy.delay_for_attempt(2),
            Some(Duration::from_millis(50))
        );
    }

    #[test]
    fn test_immediate_has_no_delay() {
        let strategy = FixedDelay::immediate(8);

        assert_eq!(strategy.max_attempts(), 8);
        assert_eq!(strategy.delay_for_attempt(0), None);
    }

    #[test]
    fn test_execute_success_first_try() {
        let mut attempts = 0;
        let result: Result<i32, &str> = attempt(8, |_| {
            attempts += 1;
            Ok(42)
        });
        assert_eq!(result, Ok(42));
        assert_eq!(attempts, 1);
    }

    #[test]
    fn test_execute_success_after_retry() {
        let strategy = FixedDelay::new(3, Duration::from_millis(1));
        let mut attempts = 0;
        let result: Result<i32, &str> = strategy.execute(|_| {
            attempts += 1;
            if attempts < 3 { Err("not yet") } else { Ok(42) }
        });
        assert_eq!(result, Ok(42));
        assert_eq!(attempts, 3);
    }

    #[test]
    fn test_execute_all_failures_returns_last_error() {
        let mut seen = Vec::new();
        let result: Result<i32, String> = attempt(8, |n| {
            seen.push(n);
            Err(format!("failure {}", n))
        });
        assert_eq!(result, Err("failure 7".to_string()));
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let mut attempts = 0;
        let result: Result<i32, &str> = attempt(0, |_| {
            attempts += 1;
            Err("failed")
        });
        assert_eq!(result, Err("failed"));
        assert_eq!(attempts, 1);
    }
}
