//! Retry and timing wrappers composed explicitly around async calls.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{info, warn};

/// How long to wait after a failed attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Backoff {
    /// Constant pause between attempts.
    Fixed(Duration),
    /// `multiplier * 2^(attempt - 1)` seconds, clamped to `[min, max]`.
    Exponential {
        multiplier: f64,
        min: Duration,
        max: Duration,
    },
}

impl Backoff {
    /// Wait after the given failed attempt (1-indexed).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(d) => *d,
            Backoff::Exponential { multiplier, min, max } => {
                let exp = 2f64.powi(attempt.saturating_sub(1) as i32);
                let secs = (multiplier * exp).min(max.as_secs_f64());
                Duration::from_secs_f64(secs.max(min.as_secs_f64()).max(0.0))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u32, pause: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(pause),
        }
    }

    pub fn exponential(max_attempts: u32, multiplier: f64, min: Duration, max: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Exponential { multiplier, min, max },
        }
    }

    /// Policy applied to the historical weather download.
    pub fn weather_download() -> Self {
        Self::exponential(5, 1.0, Duration::from_secs(2), Duration::from_secs(60))
    }

    /// Policy applied to the end-to-end download-and-process pipeline.
    pub fn pipeline() -> Self {
        Self::fixed(3, Duration::from_secs(1))
    }
}

/// Runs `operation` until it succeeds or `policy.max_attempts` is reached.
///
/// The error of the last attempt is returned unchanged.
pub async fn retry<F, Fut, T, E>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt >= max_attempts => {
                warn!(attempt, max_attempts, error = %error, "{} failed, retries exhausted", label);
                return Err(error);
            }
            Err(error) => {
                let wait = policy.backoff.delay(attempt);
                warn!(
                    attempt,
                    max_attempts,
                    wait_ms = wait.as_millis() as u64,
                    error = %error,
                    "{} failed, retrying",
                    label
                );
                sleep(wait).await;
            }
        }
    }
}

/// Reports elapsed wall-clock time when dropped, so every exit path is measured.
pub struct Stopwatch {
    label: String,
    started: Instant,
}

impl Stopwatch {
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            "{} took {:.2} seconds to execute.",
            self.label,
            elapsed.as_secs_f64()
        );
    }
}

/// Awaits `future` under a [`Stopwatch`] and returns its output unchanged.
pub async fn timed<F, T>(label: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    let _stopwatch = Stopwatch::start(label);
    future.await
}
