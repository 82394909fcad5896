// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The fixed context attached to every event.
//!
//! The collection endpoint expects a context object with a known set of
//! sub-keys. Object-valued fields default to `{}` and string fields to `""`
//! when the caller does not supply them; the `library` field always carries
//! the SDK's own name and version.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Name the SDK reports in `context.library` and the User-Agent header.
pub const LIBRARY_NAME: &str = "filum-rust-sdk";

/// Version the SDK reports in `context.library` and the User-Agent header.
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Identifies the SDK that produced an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryInfo {
	pub name: String,
	pub version: String,
}

impl Default for LibraryInfo {
	fn default() -> Self {
		Self {
			name: LIBRARY_NAME.to_string(),
			version: LIBRARY_VERSION.to_string(),
		}
	}
}

/// The context object carried by every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
	pub app: Value,
	pub device: Value,
	pub library: LibraryInfo,
	pub locale: String,
	pub location: Value,
	pub network: Value,
	pub os: Value,
	pub page: Value,
	pub referrer: Value,
	pub screen: Value,
	pub user_agent: String,
	pub ip: String,
}

impl Default for EventContext {
	fn default() -> Self {
		Self {
			app: json!({}),
			device: json!({}),
			library: LibraryInfo::default(),
			locale: String::new(),
			location: json!({}),
			network: json!({}),
			os: json!({}),
			page: json!({}),
			referrer: json!({}),
			screen: json!({}),
			user_agent: String::new(),
			ip: String::new(),
		}
	}
}

impl EventContext {
	/// Builds the full context shape, merging any caller-supplied fields
	/// over the defaults.
	///
	/// Unknown keys are ignored and `library` is always the baked-in SDK
	/// identity. Never fails: values of the wrong shape fall back to the
	/// field's default.
	pub fn enrich(supplied: Option<&Map<String, Value>>) -> Self {
		let mut context = Self::default();
		let Some(supplied) = supplied else {
			return context;
		};

		for (key, value) in supplied {
			match key.as_str() {
				"app" => context.app = value.clone(),
				"device" => context.device = value.clone(),
				"locale" => {
					if let Some(s) = value.as_str() {
						context.locale = s.to_string();
					}
				}
				"location" => context.location = value.clone(),
				"network" => context.network = value.clone(),
				"os" => context.os = value.clone(),
				"page" => context.page = value.clone(),
				"referrer" => context.referrer = value.clone(),
				"screen" => context.screen = value.clone(),
				"user_agent" => {
					if let Some(s) = value.as_str() {
						context.user_agent = s.to_string();
					}
				}
				"ip" => {
					if let Some(s) = value.as_str() {
						context.ip = s.to_string();
					}
				}
				// `library` is not caller-overridable.
				_ => {}
			}
		}

		context
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_context_has_empty_fields() {
		let context = EventContext::default();
		assert_eq!(context.app, json!({}));
		assert_eq!(context.device, json!({}));
		assert_eq!(context.locale, "");
		assert_eq!(context.user_agent, "");
		assert_eq!(context.ip, "");
	}

	#[test]
	fn library_identity_is_baked_in() {
		let context = EventContext::enrich(None);
		assert_eq!(context.library.name, LIBRARY_NAME);
		assert_eq!(context.library.version, LIBRARY_VERSION);
	}

	#[test]
	fn enrich_merges_supplied_fields() {
		let supplied = serde_json::from_value::<Map<String, Value>>(json!({
			"locale": "en-US",
			"os": {"name": "linux"},
		}))
		.unwrap();

		let context = EventContext::enrich(Some(&supplied));
		assert_eq!(context.locale, "en-US");
		assert_eq!(context.os, json!({"name": "linux"}));
		// Untouched fields keep their defaults.
		assert_eq!(context.app, json!({}));
	}

	#[test]
	fn enrich_does_not_let_callers_override_library() {
		let supplied = serde_json::from_value::<Map<String, Value>>(json!({
			"library": {"name": "impostor", "version": "9.9.9"},
		}))
		.unwrap();

		let context = EventContext::enrich(Some(&supplied));
		assert_eq!(context.library.name, LIBRARY_NAME);
	}

	#[test]
	fn context_serializes_with_all_keys() {
		let value = serde_json::to_value(EventContext::default()).unwrap();
		let object = value.as_object().unwrap();
		for key in [
			"app",
			"device",
			"library",
			"locale",
			"location",
			"network",
			"os",
			"page",
			"referrer",
			"screen",
			"user_agent",
			"ip",
		] {
			assert!(object.contains_key(key), "missing context key {key}");
		}
		assert_eq!(value["library"]["name"], LIBRARY_NAME);
	}
}
