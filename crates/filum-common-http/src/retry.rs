// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Retry with exponential backoff for transient failures.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Classifies an error as transient (worth retrying) or terminal.
pub trait RetryableError {
	fn is_retryable(&self) -> bool;
}

impl RetryableError for reqwest::Error {
	fn is_retryable(&self) -> bool {
		self.is_connect() || self.is_timeout() || self.is_request()
	}
}

/// Configuration for [`retry`].
#[derive(Debug, Clone)]
pub struct RetryConfig {
	/// Maximum number of retries after the initial attempt.
	pub max_retries: u32,
	/// Backoff before the first retry; doubles on each subsequent retry.
	pub initial_backoff: Duration,
	/// Upper bound on the backoff between attempts.
	pub max_backoff: Duration,
}

impl Default for RetryConfig {
	fn default() -> Self {
		Self {
			max_retries: 3,
			initial_backoff: Duration::from_millis(100),
			max_backoff: Duration::from_secs(10),
		}
	}
}

impl RetryConfig {
	/// Returns the backoff for the given retry (0-based), with jitter.
	fn backoff(&self, attempt: u32) -> Duration {
		let exp = self
			.initial_backoff
			.saturating_mul(2u32.saturating_pow(attempt))
			.min(self.max_backoff);
		// Up to 10% jitter so synchronized clients don't retry in lockstep.
		exp.mul_f64(1.0 + fastrand::f64() * 0.1)
	}
}

/// Runs `op`, retrying transient failures with exponential backoff.
///
/// Retries at most `config.max_retries` times; the terminal error is
/// returned unchanged. Non-retryable errors are returned immediately.
pub async fn retry<T, E, F, Fut>(config: &RetryConfig, mut op: F) -> Result<T, E>
where
	E: RetryableError + std::fmt::Display,
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, E>>,
{
	let mut attempt = 0u32;
	loop {
		match op().await {
			Ok(value) => return Ok(value),
			Err(err) if err.is_retryable() && attempt < config.max_retries => {
				let backoff = config.backoff(attempt);
				warn!(
					error = %err,
					attempt = attempt + 1,
					max_retries = config.max_retries,
					backoff_ms = backoff.as_millis() as u64,
					"Transient failure, retrying"
				);
				tokio::time::sleep(backoff).await;
				attempt += 1;
			}
			Err(err) => return Err(err),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};

	#[derive(Debug)]
	struct TestError {
		retryable: bool,
	}

	impl std::fmt::Display for TestError {
		fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
			write!(f, "test error (retryable={})", self.retryable)
		}
	}

	impl RetryableError for TestError {
		fn is_retryable(&self) -> bool {
			self.retryable
		}
	}

	fn fast_config() -> RetryConfig {
		RetryConfig {
			max_retries: 3,
			initial_backoff: Duration::from_millis(1),
			max_backoff: Duration::from_millis(10),
		}
	}

	#[tokio::test]
	async fn success_on_first_attempt() {
		let attempts = AtomicU32::new(0);
		let result: Result<u32, TestError> = retry(&fast_config(), || {
			attempts.fetch_add(1, Ordering::SeqCst);
			async { Ok(42) }
		})
		.await;

		assert_eq!(result.unwrap(), 42);
		assert_eq!(attempts.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn retries_transient_failures_then_succeeds() {
		let attempts = AtomicU32::new(0);
		let result: Result<u32, TestError> = retry(&fast_config(), || {
			let n = attempts.fetch_add(1, Ordering::SeqCst);
			async move {
				if n < 3 {
					Err(TestError { retryable: true })
				} else {
					Ok(7)
				}
			}
		})
		.await;

		assert_eq!(result.unwrap(), 7);
		assert_eq!(attempts.load(Ordering::SeqCst), 4);
	}

	#[tokio::test]
	async fn exhausts_retries_and_returns_last_error() {
		let attempts = AtomicU32::new(0);
		let result: Result<u32, TestError> = retry(&fast_config(), || {
			attempts.fetch_add(1, Ordering::SeqCst);
			async { Err(TestError { retryable: true }) }
		})
		.await;

		assert!(result.is_err());
		// Initial attempt plus max_retries.
		assert_eq!(attempts.load(Ordering::SeqCst), 4);
	}

	#[tokio::test]
	async fn non_retryable_error_fails_immediately() {
		let attempts = AtomicU32::new(0);
		let result: Result<u32, TestError> = retry(&fast_config(), || {
			attempts.fetch_add(1, Ordering::SeqCst);
			async { Err(TestError { retryable: false }) }
		})
		.await;

		assert!(result.is_err());
		assert_eq!(attempts.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn backoff_doubles_and_caps() {
		let config = RetryConfig {
			max_retries: 10,
			initial_backoff: Duration::from_millis(100),
			max_backoff: Duration::from_secs(1),
		};

		// Jitter adds at most 10%, so compare against the base schedule.
		assert!(config.backoff(0) >= Duration::from_millis(100));
		assert!(config.backoff(1) >= Duration::from_millis(200));
		assert!(config.backoff(2) >= Duration::from_millis(400));
		assert!(config.backoff(9) <= Duration::from_millis(1100));
	}

	#[test]
	fn default_config_matches_sdk_defaults() {
		let config = RetryConfig::default();
		assert_eq!(config.max_retries, 3);
	}
}
