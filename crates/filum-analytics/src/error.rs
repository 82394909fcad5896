// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the analytics SDK.

use filum_analytics_core::Event;
use filum_common_http::RetryableError;
use thiserror::Error;

/// Errors surfaced by client construction and setup.
#[derive(Debug, Error)]
pub enum FilumError {
	/// No write key, or an empty one, was supplied to the builder.
	#[error("a non-empty write key is required")]
	MissingWriteKey,

	/// The underlying HTTP client could not be constructed.
	#[error("HTTP client setup failed: {0}")]
	RequestFailed(#[from] reqwest::Error),
}

/// Terminal outcome of a failed batch delivery.
///
/// `Clone` because a single terminal failure fans out to every delivery
/// handle in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
	/// The transport could not complete the request at all.
	#[error("network error: {message}")]
	Network { message: String },

	/// The server answered 5xx.
	#[error("server error ({status}): {status_text}")]
	Server { status: u16, status_text: String },

	/// The server answered 429.
	#[error("rate limited: {status_text}")]
	RateLimited { status_text: String },

	/// Any other non-success status; not retried.
	#[error("request rejected ({status}): {status_text}")]
	Rejected { status: u16, status_text: String },

	/// The client was shut down before the event could be queued.
	#[error("client has been shut down")]
	ClientShutdown,
}

impl RetryableError for DeliveryError {
	fn is_retryable(&self) -> bool {
		matches!(
			self,
			DeliveryError::Network { .. }
				| DeliveryError::Server { .. }
				| DeliveryError::RateLimited { .. }
		)
	}
}

/// A failed flush cycle: the terminal error plus the batch it attempted.
///
/// The batch is reported for observability only; it has already been
/// drained and its deliveries resolved, so it will not be resent.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct FlushError {
	pub error: DeliveryError,
	pub batch: Vec<Event>,
}

/// Result type alias for client setup operations.
pub type Result<T> = std::result::Result<T, FilumError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn network_errors_are_retryable() {
		let err = DeliveryError::Network {
			message: "connection refused".to_string(),
		};
		assert!(err.is_retryable());
	}

	#[test]
	fn server_errors_are_retryable() {
		let err = DeliveryError::Server {
			status: 503,
			status_text: "Service Unavailable".to_string(),
		};
		assert!(err.is_retryable());
	}

	#[test]
	fn rate_limits_are_retryable() {
		let err = DeliveryError::RateLimited {
			status_text: "Too Many Requests".to_string(),
		};
		assert!(err.is_retryable());
	}

	#[test]
	fn rejections_are_not_retryable() {
		for status in [400, 401, 403, 404, 422] {
			let err = DeliveryError::Rejected {
				status,
				status_text: "nope".to_string(),
			};
			assert!(!err.is_retryable(), "status {status} should not be retried");
		}
	}

	#[test]
	fn shutdown_is_not_retryable() {
		assert!(!DeliveryError::ClientShutdown.is_retryable());
	}
}
