// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rust SDK client for the Filum events collection API.
//!
//! Recording calls (`identify`, `track`, `group`, `page`, `screen`,
//! `alias`) normalize the caller's message into a wire [`Event`] and queue
//! it in memory; batches are posted out-of-band with bounded
//! exponential-backoff retry. Delivery is at-least-once: a retried batch
//! may arrive twice and is de-duplicated downstream via the per-event
//! `event_id`.
//!
//! ```ignore
//! use filum_analytics::{FilumClient, Message, Params};
//!
//! let client = FilumClient::builder().write_key("your_write_key").build()?;
//!
//! client.track(
//!     Message::new()
//!         .event_name("Order Completed")
//!         .user_id("user_123")
//!         .params(Params::new().insert("total", 42.5)),
//! );
//! ```

mod batch;
mod client;
mod config;
mod error;
mod message;
mod transport;

pub use batch::Delivery;
pub use client::{FilumClient, FilumClientBuilder};
pub use config::{
	ClientConfig, Environment, DEFAULT_FLUSH_AT, DEFAULT_FLUSH_INTERVAL, DEFAULT_HOST,
	DEFAULT_PATH,
};
pub use error::{DeliveryError, FilumError, FlushError, Result};
pub use message::{Message, Params};
pub use transport::{HttpTransport, Transport, TransportError};

pub use filum_analytics_core::{
	format_params, Event, EventContext, EventItem, EventType, ItemValue, LibraryInfo,
	LIBRARY_NAME, LIBRARY_VERSION,
};
pub use filum_common_http::RetryConfig;
