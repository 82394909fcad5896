// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The analytics client and its builder.

use std::sync::Arc;
use std::time::Duration;

use filum_common_http::RetryConfig;
use tracing::info;

use filum_analytics_core::{Event, EventType, LIBRARY_NAME, LIBRARY_VERSION};

use crate::batch::{BatchProcessor, Delivery};
use crate::config::{ClientConfig, Environment};
use crate::error::{FilumError, FlushError, Result};
use crate::message::Message;
use crate::transport::{HttpTransport, Transport};

/// Builder for constructing a [`FilumClient`].
pub struct FilumClientBuilder {
	write_key: Option<String>,
	config: ClientConfig,
	transport: Option<Arc<dyn Transport>>,
}

impl FilumClientBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			write_key: None,
			config: ClientConfig::default(),
			transport: None,
		}
	}

	/// Sets the project write key (required).
	pub fn write_key(mut self, key: impl Into<String>) -> Self {
		self.write_key = Some(key.into());
		self
	}

	/// Sets the collection endpoint host. A trailing slash is stripped.
	pub fn host(mut self, host: impl Into<String>) -> Self {
		self.config.host = host.into();
		self
	}

	/// Sets the collection endpoint path. A trailing slash is stripped.
	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.config.path = path.into();
		self
	}

	/// Sets the batch size threshold. Clamped to a minimum of 1.
	pub fn flush_at(mut self, flush_at: usize) -> Self {
		self.config.flush_at = flush_at;
		self
	}

	/// Sets the flush timer interval. Zero disables the timer.
	pub fn flush_interval(mut self, interval: Duration) -> Self {
		self.config.flush_interval = interval;
		self
	}

	/// Enables or disables the client. A disabled client queues nothing and
	/// performs no I/O; the flag is fixed for the client's lifetime.
	pub fn enable(mut self, enable: bool) -> Self {
		self.config.enable = enable;
		self
	}

	/// Sets the runtime environment.
	pub fn environment(mut self, environment: Environment) -> Self {
		self.config.environment = environment;
		self
	}

	/// Sets the per-request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = Some(timeout);
		self
	}

	/// Sets the retry configuration for batch transmission.
	pub fn retry_config(mut self, config: RetryConfig) -> Self {
		self.config.retry_config = config;
		self
	}

	/// Injects a custom transport instead of the default reqwest one.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Builds the client.
	pub fn build(mut self) -> Result<FilumClient> {
		let write_key = match self.write_key {
			Some(key) if !key.is_empty() => key,
			_ => return Err(FilumError::MissingWriteKey),
		};

		self.config.host = self.config.host.trim_end_matches('/').to_string();
		self.config.path = self.config.path.trim_end_matches('/').to_string();
		self.config.flush_at = self.config.flush_at.max(1);

		let transport = match self.transport {
			Some(transport) => transport,
			None => Arc::new(HttpTransport::new(self.config.environment)?),
		};

		info!(
			host = %self.config.host,
			path = %self.config.path,
			flush_at = self.config.flush_at,
			flush_interval_ms = self.config.flush_interval.as_millis() as u64,
			enable = self.config.enable,
			sdk_name = LIBRARY_NAME,
			sdk_version = LIBRARY_VERSION,
			"Analytics client initialized"
		);

		Ok(FilumClient {
			processor: BatchProcessor::new(self.config, write_key, transport),
		})
	}
}

impl Default for FilumClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Client for shipping analytics events to the Filum collection API.
///
/// Recording calls queue synchronously and never block; batches are posted
/// out-of-band. Cheap to clone; all clones share one queue.
///
/// # Example
///
/// ```ignore
/// use filum_analytics::{FilumClient, Message, Params};
///
/// let client = FilumClient::builder()
///     .write_key("your_write_key")
///     .build()?;
///
/// client.track(
///     Message::new()
///         .event_name("Order Completed")
///         .user_id("user_123")
///         .params(Params::new().insert("total", 42.5)),
/// );
///
/// // Deliver anything still queued before exit.
/// client.shutdown().await?;
/// ```
#[derive(Clone)]
pub struct FilumClient {
	processor: Arc<BatchProcessor>,
}

impl FilumClient {
	/// Creates a new builder.
	pub fn builder() -> FilumClientBuilder {
		FilumClientBuilder::new()
	}

	/// Records an identify event. The event name is always `"Identify"`.
	pub fn identify(&self, message: Message) -> Delivery {
		let mut message = message;
		message.event_name = Some("Identify".to_string());
		self.processor.enqueue(EventType::Identify, message)
	}

	/// Records a group event.
	pub fn group(&self, message: Message) -> Delivery {
		self.processor.enqueue(EventType::Group, message)
	}

	/// Records a track event.
	pub fn track(&self, message: Message) -> Delivery {
		self.processor.enqueue(EventType::Track, message)
	}

	/// Records a page event.
	pub fn page(&self, message: Message) -> Delivery {
		self.processor.enqueue(EventType::Page, message)
	}

	/// Records a screen event.
	pub fn screen(&self, message: Message) -> Delivery {
		self.processor.enqueue(EventType::Screen, message)
	}

	/// Records an alias event.
	pub fn alias(&self, message: Message) -> Delivery {
		self.processor.enqueue(EventType::Alias, message)
	}

	/// Flushes one batch immediately.
	///
	/// Cancels any pending flush timer, drains up to `flush_at` queued
	/// events, and returns them once delivered. On terminal failure the
	/// error carries the attempted batch. An empty queue (or a disabled
	/// client) yields `Ok` with an empty batch and performs no I/O.
	pub async fn flush(&self) -> std::result::Result<Vec<Event>, FlushError> {
		self.processor.flush().await
	}

	/// Performs a final flush and closes the client.
	///
	/// Later recording calls resolve with `DeliveryError::ClientShutdown`.
	pub async fn shutdown(&self) -> std::result::Result<Vec<Event>, FlushError> {
		let result = self.processor.shutdown().await;
		info!("Analytics client shut down");
		result
	}

	/// Number of events currently queued.
	pub fn queue_len(&self) -> usize {
		self.processor.queue_len()
	}

	/// Returns true once the client has been shut down.
	pub fn is_closed(&self) -> bool {
		self.processor.is_closed()
	}
}
