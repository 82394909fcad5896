// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client configuration.

use std::time::Duration;

use filum_common_http::RetryConfig;

/// Default collection endpoint host.
pub const DEFAULT_HOST: &str = "https://event.filum.ai";

/// Default collection endpoint path.
pub const DEFAULT_PATH: &str = "/events";

/// Default batch size threshold.
pub const DEFAULT_FLUSH_AT: usize = 20;

/// Default interval between timer-driven flushes.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(10_000);

/// Where the SDK is running.
///
/// Browser-like hosts forbid setting the User-Agent header, so the SDK only
/// identifies itself via User-Agent in `Native` mode. This is configured
/// explicitly rather than detected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
	#[default]
	Native,
	Browser,
}

/// Configuration for the analytics client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Collection endpoint host, no trailing slash.
	pub host: String,
	/// Collection endpoint path, no trailing slash.
	pub path: String,
	/// Queue length that triggers an automatic flush. Minimum 1.
	pub flush_at: usize,
	/// Interval for the one-shot flush timer. Zero disables the timer.
	pub flush_interval: Duration,
	/// When false the client queues nothing and performs no I/O.
	pub enable: bool,
	/// Runtime environment, controls the User-Agent header.
	pub environment: Environment,
	/// Optional per-request timeout.
	pub request_timeout: Option<Duration>,
	/// Retry configuration for batch transmission.
	pub retry_config: RetryConfig,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			host: DEFAULT_HOST.to_string(),
			path: DEFAULT_PATH.to_string(),
			flush_at: DEFAULT_FLUSH_AT,
			flush_interval: DEFAULT_FLUSH_INTERVAL,
			enable: true,
			environment: Environment::default(),
			request_timeout: None,
			retry_config: RetryConfig::default(),
		}
	}
}

impl ClientConfig {
	/// Full endpoint URL for batch posts.
	pub fn endpoint(&self) -> String {
		format!("{}{}", self.host, self.path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_wire_contract() {
		let config = ClientConfig::default();
		assert_eq!(config.host, "https://event.filum.ai");
		assert_eq!(config.path, "/events");
		assert_eq!(config.flush_at, 20);
		assert_eq!(config.flush_interval, Duration::from_millis(10_000));
		assert!(config.enable);
		assert_eq!(config.environment, Environment::Native);
		assert!(config.request_timeout.is_none());
	}

	#[test]
	fn endpoint_joins_host_and_path() {
		let config = ClientConfig::default();
		assert_eq!(config.endpoint(), "https://event.filum.ai/events");
	}
}
