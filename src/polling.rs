//! Turns the status endpoint into a blocking "wait until done" call.

use crate::{
    sleep::Sleeper, CompletedGeneration, Error, ErrorKind, GammaClient, GenerationStatus, Result,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default delay between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default overall polling deadline.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(300);

/// Polls a generation until it completes or a deadline passes.
///
/// Throttling (429) and server errors that outlast the client's own retries
/// do not abort the wait; the poller sleeps and checks again. Everything
/// else is returned immediately.
///
/// # Examples
///
/// ```no_run
/// use gamma_sdk::GammaClient;
/// use std::time::Duration;
///
/// # async fn example(client: GammaClient) -> Result<(), gamma_sdk::Error> {
/// let done = client
///     .poller()
///     .wait_until_completed("gen-123", Duration::from_secs(3), Duration::from_secs(120))
///     .await?;
/// println!("{}", done.gamma_url);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Poller {
    client: GammaClient,
    sleeper: Arc<dyn Sleeper>,
}

impl Poller {
    /// Creates a poller that sleeps with the client's sleeper.
    pub fn new(client: GammaClient) -> Self {
        let sleeper = client.sleeper();
        Self { client, sleeper }
    }

    /// Uses a different sleeper between status checks.
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// [`wait_until_completed`](Self::wait_until_completed) with a 5 second
    /// interval and a 300 second timeout.
    pub async fn wait_with_defaults(&self, generation_id: &str) -> Result<CompletedGeneration> {
        self.wait_until_completed(generation_id, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT)
            .await
    }

    /// Checks the generation until it completes.
    ///
    /// The deadline is checked before each status check, so a check already in
    /// flight is allowed to finish. While pending, the poller sleeps for the
    /// server's estimate (or `interval`), capped by the time left and never
    /// less than one second. All waits are in whole seconds.
    ///
    /// # Errors
    ///
    /// * [`Error::Validation`] if `interval` or `timeout` is zero
    /// * [`Error::PollTimeout`] once `timeout` has elapsed
    /// * any error from [`GammaClient::get_generation`] other than 429 or 5xx
    pub async fn wait_until_completed(
        &self,
        generation_id: &str,
        interval: Duration,
        timeout: Duration,
    ) -> Result<CompletedGeneration> {
        if interval.is_zero() {
            return Err(Error::Validation(
                "Poll interval must be positive.".to_string(),
            ));
        }
        if timeout.is_zero() {
            return Err(Error::Validation("Poll timeout must be positive.".to_string()));
        }

        let started_at = Instant::now();

        loop {
            let elapsed = started_at.elapsed();
            if elapsed >= timeout {
                return Err(Error::PollTimeout {
                    generation_id: generation_id.to_string(),
                    timeout,
                });
            }

            let wait = match self.client.get_generation(generation_id).await {
                Ok(GenerationStatus::Completed(completed)) => return Ok(completed),
                Ok(GenerationStatus::Pending(pending)) => {
                    let estimate = pending
                        .estimated_wait_seconds
                        .unwrap_or_else(|| interval.as_secs());
                    let remaining = ceil_secs(timeout - elapsed);
                    let seconds = estimate.min(remaining).max(1);

                    tracing::debug!(
                        generation_id = generation_id,
                        wait_secs = seconds,
                        "Generation still pending"
                    );
                    Duration::from_secs(seconds)
                }
                Err(Error::Api(e)) if e.kind == ErrorKind::TooManyRequests => {
                    let seconds = ceil_secs(e.retry_after.unwrap_or(interval)).max(1);
                    tracing::warn!(
                        generation_id = generation_id,
                        seconds = seconds,
                        "Gamma API throttled polling request; retrying after delay"
                    );
                    Duration::from_secs(seconds)
                }
                Err(Error::Api(e)) if e.kind == ErrorKind::ServerError => {
                    tracing::warn!(
                        generation_id = generation_id,
                        status = e.status.as_u16(),
                        message = %e.message,
                        "Gamma API server error while polling"
                    );
                    interval.max(Duration::from_secs(1))
                }
                Err(e) => return Err(e),
            };

            self.sleeper.sleep(wait).await;
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(Duration::ZERO), 0);
        assert_eq!(ceil_secs(Duration::from_millis(1)), 1);
        assert_eq!(ceil_secs(Duration::from_secs(2)), 2);
        assert_eq!(ceil_secs(Duration::from_millis(2001)), 3);
    }
}
