// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caller-facing messages and their normalization into wire events.
//!
//! A [`Message`] is a partial event: every field is optional and identifiers
//! may be arbitrary JSON values. [`normalize`] fills the gaps — context,
//! timestamps, event id, identifier coercion, parameter formatting — and
//! produces a complete [`Event`]. Normalization never fails and is a no-op
//! for fields the caller already populated.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use filum_analytics_core::{format_params, Event, EventContext, EventType};

/// Prefix tagging event ids produced by this SDK.
const EVENT_ID_PREFIX: &str = "rust";

/// A builder for event parameters.
///
/// # Example
///
/// ```
/// use filum_analytics::Params;
///
/// let params = Params::new()
///     .insert("button_name", "checkout")
///     .insert("price", 99.99)
///     .insert("is_premium", true);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
	inner: Map<String, Value>,
}

impl Params {
	/// Creates an empty parameter set.
	pub fn new() -> Self {
		Self { inner: Map::new() }
	}

	/// Inserts a key-value pair. Values may be any JSON-convertible type;
	/// insertion order is preserved on the wire.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.inner.insert(key.into(), value.into());
		self
	}

	/// Merges another parameter set into this one; `other` wins on
	/// conflicting keys.
	pub fn merge(mut self, other: Params) -> Self {
		for (k, v) in other.inner {
			self.inner.insert(k, v);
		}
		self
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.inner.get(key)
	}

	/// Returns the underlying ordered map.
	pub fn into_map(self) -> Map<String, Value> {
		self.inner
	}
}

impl From<Map<String, Value>> for Params {
	fn from(map: Map<String, Value>) -> Self {
		Self { inner: map }
	}
}

impl From<Value> for Params {
	fn from(value: Value) -> Self {
		match value {
			Value::Object(map) => Self { inner: map },
			_ => Self::new(),
		}
	}
}

/// A partial event supplied by the caller.
///
/// Unset fields are defaulted during normalization. Identifiers accept any
/// JSON value; non-string values are JSON-stringified on the wire, matching
/// the endpoint's strings-only identifier contract.
#[derive(Debug, Clone, Default)]
pub struct Message {
	pub event_name: Option<String>,
	pub event_params: Option<Params>,
	pub context: Option<Map<String, Value>>,
	pub anonymous_id: Option<Value>,
	pub user_id: Option<Value>,
	pub origin: Option<String>,
	pub event_id: Option<String>,
	pub timestamp: Option<DateTime<Utc>>,
	pub original_timestamp: Option<DateTime<Utc>>,
	pub sent_at: Option<DateTime<Utc>>,
	pub received_at: Option<DateTime<Utc>>,
}

impl Message {
	/// Creates an empty message.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the event name (required for track-like events).
	pub fn event_name(mut self, name: impl Into<String>) -> Self {
		self.event_name = Some(name.into());
		self
	}

	/// Sets the event parameters.
	pub fn params(mut self, params: Params) -> Self {
		self.event_params = Some(params);
		self
	}

	/// Supplies context fields to merge over the defaults.
	pub fn context(mut self, context: Map<String, Value>) -> Self {
		self.context = Some(context);
		self
	}

	/// Sets the anonymous id. Non-string values are JSON-stringified.
	pub fn anonymous_id(mut self, id: impl Into<Value>) -> Self {
		self.anonymous_id = Some(id.into());
		self
	}

	/// Sets the user id. Non-string values are JSON-stringified.
	pub fn user_id(mut self, id: impl Into<Value>) -> Self {
		self.user_id = Some(id.into());
		self
	}

	/// Sets the origin.
	pub fn origin(mut self, origin: impl Into<String>) -> Self {
		self.origin = Some(origin.into());
		self
	}

	/// Sets an explicit event id, suppressing generation.
	pub fn event_id(mut self, id: impl Into<String>) -> Self {
		self.event_id = Some(id.into());
		self
	}

	/// Sets the event timestamp.
	pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
		self.timestamp = Some(at);
		self
	}
}

/// Coerces a caller-supplied identifier to the wire's string form.
///
/// Strings pass through; null yields `None`; anything else is
/// JSON-stringified (`42` becomes `"42"`).
fn coerce_id(value: Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s),
		Value::Null => None,
		other => Some(other.to_string()),
	}
}

/// Derives an event id from a content hash of the normalized fields plus a
/// random suffix.
///
/// The hash ties the id to the event's content so ids stay unique even when
/// the host's randomness source is weak; the UUID keeps identical payloads
/// distinct.
fn generate_event_id(
	event_type: EventType,
	message: &Message,
	context: &EventContext,
	timestamps: &[DateTime<Utc>; 4],
) -> String {
	let digest_input = serde_json::json!({
		"event_type": event_type,
		"event_name": message.event_name,
		"event_params": message.event_params.as_ref().map(|p| Value::Object(p.inner.clone())),
		"context": context,
		"timestamp": timestamps[0],
		"original_timestamp": timestamps[1],
		"sent_at": timestamps[2],
		"received_at": timestamps[3],
	});
	let hash = Sha256::digest(digest_input.to_string().as_bytes());
	format!(
		"{}-{}-{}",
		EVENT_ID_PREFIX,
		hex::encode(hash),
		Uuid::new_v4()
	)
}

/// Normalizes a caller message into a complete wire event.
///
/// Each defaulting step applies only when the corresponding field is absent;
/// the four timestamps are sampled independently and may differ by
/// microseconds.
pub(crate) fn normalize(event_type: EventType, message: Message) -> Event {
	let context = EventContext::enrich(message.context.as_ref());

	let timestamp = message.timestamp.unwrap_or_else(Utc::now);
	let original_timestamp = message.original_timestamp.unwrap_or_else(Utc::now);
	let sent_at = message.sent_at.unwrap_or_else(Utc::now);
	let received_at = message.received_at.unwrap_or_else(Utc::now);

	let event_id = message.event_id.clone().unwrap_or_else(|| {
		generate_event_id(
			event_type,
			&message,
			&context,
			&[timestamp, original_timestamp, sent_at, received_at],
		)
	});

	let anonymous_id = message
		.anonymous_id
		.and_then(coerce_id)
		.unwrap_or_default();
	let user_id = message.user_id.and_then(coerce_id);
	let origin = message.origin.unwrap_or_default();

	let event_params = message
		.event_params
		.map(|p| format_params(&p.into_map()))
		.unwrap_or_default();

	Event {
		event_type,
		event_name: message.event_name,
		event_params,
		context,
		anonymous_id,
		user_id,
		origin,
		event_id,
		timestamp,
		original_timestamp,
		sent_at,
		received_at,
	}
}
