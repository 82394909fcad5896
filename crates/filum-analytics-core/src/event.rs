// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The event envelope posted to the collection endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::EventContext;
use crate::item::EventItem;

/// The kind of recording call that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
	Identify,
	Track,
	Group,
	Page,
	Screen,
	Alias,
}

impl EventType {
	/// Returns the lowercase wire name.
	pub fn as_str(&self) -> &'static str {
		match self {
			EventType::Identify => "identify",
			EventType::Track => "track",
			EventType::Group => "group",
			EventType::Page => "page",
			EventType::Screen => "screen",
			EventType::Alias => "alias",
		}
	}
}

impl std::fmt::Display for EventType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// A fully normalized event, ready for transmission.
///
/// Batches are serialized as a flat JSON array of these — there is no
/// envelope wrapper around the array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub event_type: EventType,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub event_name: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub event_params: Vec<EventItem>,
	pub context: EventContext,
	pub anonymous_id: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_id: Option<String>,
	pub origin: String,
	pub event_id: String,
	pub timestamp: DateTime<Utc>,
	pub original_timestamp: DateTime<Utc>,
	pub sent_at: DateTime<Utc>,
	pub received_at: DateTime<Utc>,
}
