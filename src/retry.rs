//! Backoff policy and retryability rules for transient failures.
//!
//! [`Backoff`] answers "how long before attempt N+1"; [`retry_delay`] combines it
//! with the error at hand and the server's Retry-After hint to decide whether a
//! failed status check is retried at all.

use crate::Error;
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Base delay of the default exponential backoff.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound of the uniform jitter added by the default backoff.
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(250);

/// Computes the delay before retrying after a failed attempt.
///
/// # Examples
///
/// ```
/// use gamma_sdk::Backoff;
/// use std::time::Duration;
///
/// // 0.5s, 1s, 2s, 4s... plus up to 250ms of jitter
/// let default = Backoff::default();
///
/// // No jitter: exactly 100ms, 200ms, 400ms...
/// let exact = Backoff::Exponential {
///     base: Duration::from_millis(100),
///     max_jitter: Duration::ZERO,
/// };
/// assert_eq!(exact.delay_for_attempt(3), Duration::from_millis(400));
///
/// // Caller-supplied function of the attempt number
/// let custom = Backoff::custom(|attempt| Duration::from_secs(attempt as u64));
/// assert_eq!(custom.delay_for_attempt(2), Duration::from_secs(2));
/// ```
#[derive(Clone)]
pub enum Backoff {
    /// `base * 2^(attempt - 1)` plus a uniform random jitter in `[0, max_jitter]`.
    Exponential {
        /// Delay before the first retry, without jitter.
        base: Duration,
        /// Upper bound of the random jitter.
        max_jitter: Duration,
    },

    /// The same delay before every retry.
    Fixed(Duration),

    /// Custom delay function.
    ///
    /// Takes the number of the attempt that just failed (1-indexed).
    Custom(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl Backoff {
    /// Wraps a closure as a [`Backoff::Custom`] policy.
    pub fn custom<F>(delay_fn: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Backoff::Custom(Arc::new(delay_fn))
    }

    /// Returns the delay to wait after the given failed attempt.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt that just failed (1-indexed, so 1 = first attempt)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Exponential { base, max_jitter } => {
                let multiplier = 2u32.saturating_pow(attempt.saturating_sub(1));
                let delay = base.saturating_mul(multiplier);

                if max_jitter.is_zero() {
                    delay
                } else {
                    let jitter = rand::thread_rng().gen_range(0.0..=max_jitter.as_secs_f64());
                    delay.saturating_add(Duration::from_secs_f64(jitter))
                }
            }
            Backoff::Fixed(delay) => *delay,
            Backoff::Custom(delay_fn) => delay_fn(attempt),
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Exponential {
            base: DEFAULT_BASE_DELAY,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backoff::Exponential { base, max_jitter } => f
                .debug_struct("Exponential")
                .field("base", base)
                .field("max_jitter", max_jitter)
                .finish(),
            Backoff::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
            Backoff::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Decides whether a failed attempt is retried and how long to wait first.
///
/// Returns `None` when the error is not retryable or when `attempt` has used
/// up the budget of `max_retries` retries (so at most `max_retries + 1`
/// attempts are made). A 429 with a Retry-After hint waits for the hint;
/// every other retryable failure waits for `backoff`.
pub fn retry_delay(
    error: &Error,
    attempt: u32,
    max_retries: u32,
    backoff: &Backoff,
) -> Option<Duration> {
    if !error.is_retryable() || attempt > max_retries {
        return None;
    }

    Some(
        error
            .retry_after()
            .unwrap_or_else(|| backoff.delay_for_attempt(attempt)),
    )
}
