// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The injectable HTTP transport used for batch transmission.

use std::time::Duration;

use filum_common_http::RetryableError;
use tracing::debug;

use filum_analytics_core::{Event, LIBRARY_NAME, LIBRARY_VERSION};

use crate::config::Environment;
use crate::error::DeliveryError;

/// A wire-level failure reported by a transport.
///
/// `status_code` is present when the server answered with a non-success
/// status; `is_network_error` is set when no response was received at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportError {
	pub status_code: Option<u16>,
	pub status_text: Option<String>,
	pub is_network_error: bool,
}

impl TransportError {
	/// A failure with no server response.
	pub fn network(message: impl Into<String>) -> Self {
		Self {
			status_code: None,
			status_text: Some(message.into()),
			is_network_error: true,
		}
	}

	/// A non-success HTTP status.
	pub fn status(code: u16, text: impl Into<String>) -> Self {
		Self {
			status_code: Some(code),
			status_text: Some(text.into()),
			is_network_error: false,
		}
	}

	fn status_text_or_default(&self) -> String {
		self.status_text.clone().unwrap_or_default()
	}
}

impl std::fmt::Display for TransportError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.status_code {
			Some(code) => write!(f, "HTTP {} {}", code, self.status_text_or_default()),
			None => write!(f, "network error: {}", self.status_text_or_default()),
		}
	}
}

impl std::error::Error for TransportError {}

impl RetryableError for TransportError {
	fn is_retryable(&self) -> bool {
		if self.is_network_error {
			return true;
		}
		match self.status_code {
			Some(status) => (500..=599).contains(&status) || status == 429,
			None => false,
		}
	}
}

impl From<TransportError> for DeliveryError {
	fn from(err: TransportError) -> Self {
		match err.status_code {
			None => DeliveryError::Network {
				message: err.status_text_or_default(),
			},
			Some(429) => DeliveryError::RateLimited {
				status_text: err.status_text_or_default(),
			},
			Some(status) if (500..=599).contains(&status) => DeliveryError::Server {
				status,
				status_text: err.status_text_or_default(),
			},
			Some(status) => DeliveryError::Rejected {
				status,
				status_text: err.status_text_or_default(),
			},
		}
	}
}

/// Posts serialized batches to the collection endpoint.
///
/// The default implementation is [`HttpTransport`]; tests inject mocks.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
	/// Posts `body` as a JSON array to `url` with the given headers.
	///
	/// Success means any 2xx response. A response with any other status maps
	/// to `TransportError::status`; a request that received no response maps
	/// to `TransportError::network`.
	async fn post(
		&self,
		url: &str,
		body: &[Event],
		headers: &[(String, String)],
		timeout: Option<Duration>,
	) -> Result<(), TransportError>;
}

/// The default reqwest-backed transport.
pub struct HttpTransport {
	client: reqwest::Client,
}

impl HttpTransport {
	/// Builds a transport for the given environment.
	///
	/// `Native` identifies the SDK via User-Agent; `Browser` leaves the
	/// header to the host.
	pub fn new(environment: Environment) -> Result<Self, reqwest::Error> {
		let builder = match environment {
			Environment::Native => filum_common_http::builder_with_user_agent(format!(
				"{LIBRARY_NAME}/{LIBRARY_VERSION}"
			)),
			Environment::Browser => filum_common_http::builder(),
		};
		Ok(Self {
			client: builder.build()?,
		})
	}

	/// Wraps an existing reqwest client.
	pub fn from_client(client: reqwest::Client) -> Self {
		Self { client }
	}
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
	async fn post(
		&self,
		url: &str,
		body: &[Event],
		headers: &[(String, String)],
		timeout: Option<Duration>,
	) -> Result<(), TransportError> {
		let mut request = self.client.post(url).json(&body);
		for (name, value) in headers {
			request = request.header(name, value);
		}
		if let Some(timeout) = timeout {
			request = request.timeout(timeout);
		}

		let response = request
			.send()
			.await
			.map_err(|e| TransportError::network(e.to_string()))?;

		let status = response.status();
		debug!(url = %url, status = status.as_u16(), count = body.len(), "Batch posted");

		if !status.is_success() {
			return Err(TransportError::status(
				status.as_u16(),
				status.canonical_reason().unwrap_or_default(),
			));
		}

		Ok(())
	}
}
