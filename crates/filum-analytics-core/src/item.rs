// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed key/value items — the wire representation of event parameters.
//!
//! The collection endpoint does not accept free-form JSON for event
//! parameters. Each parameter is converted to a `{key, value}` item where
//! the value carries exactly one type tag (`int_value`, `double_value`, or
//! `string_value`). Structured values are flattened to their JSON text.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tagged parameter value.
///
/// Serializes as exactly one of `{"int_value": …}`, `{"double_value": …}`,
/// or `{"string_value": …}` (the latter may be `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemValue {
	#[serde(rename = "int_value")]
	Int(i64),
	#[serde(rename = "double_value")]
	Double(f64),
	#[serde(rename = "string_value")]
	Str(Option<String>),
}

impl ItemValue {
	/// Converts an arbitrary JSON value into its tagged form.
	///
	/// Rules:
	/// - integers (including floats with no fractional part that fit in
	///   `i64`) become `Int`
	/// - other finite numbers become `Double`
	/// - strings become `Str(Some(..))`
	/// - booleans become `Int` 1/0
	/// - null becomes `Str(None)`
	/// - arrays and objects become `Str` holding their JSON serialization
	///
	/// Every input maps to a defined output; this never fails.
	pub fn from_json(value: &Value) -> Self {
		match value {
			Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					ItemValue::Int(i)
				} else if let Some(u) = n.as_u64() {
					// Out of i64 range; the wire int tag is signed 64-bit.
					ItemValue::Double(u as f64)
				} else {
					let f = n.as_f64().unwrap_or(0.0);
					if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64
					{
						ItemValue::Int(f as i64)
					} else {
						ItemValue::Double(f)
					}
				}
			}
			Value::String(s) => ItemValue::Str(Some(s.clone())),
			Value::Bool(b) => ItemValue::Int(i64::from(*b)),
			Value::Null => ItemValue::Str(None),
			other => ItemValue::Str(Some(other.to_string())),
		}
	}
}

/// One formatted event parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventItem {
	pub key: String,
	pub value: ItemValue,
}

impl EventItem {
	/// Creates an item from a key and an arbitrary JSON value.
	pub fn new(key: impl Into<String>, value: &Value) -> Self {
		Self {
			key: key.into(),
			value: ItemValue::from_json(value),
		}
	}
}

/// Formats a parameter map into its ordered wire representation.
///
/// Deterministic and pure: one item per input key, output order equal to the
/// map's iteration order.
pub fn format_params(params: &Map<String, Value>) -> Vec<EventItem> {
	params
		.iter()
		.map(|(k, v)| EventItem::new(k.clone(), v))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	#[test]
	fn integer_formats_as_int() {
		assert_eq!(ItemValue::from_json(&json!(11)), ItemValue::Int(11));
		assert_eq!(ItemValue::from_json(&json!(-3)), ItemValue::Int(-3));
	}

	#[test]
	fn float_formats_as_double() {
		assert_eq!(ItemValue::from_json(&json!(35.5)), ItemValue::Double(35.5));
	}

	#[test]
	fn integral_float_formats_as_int() {
		assert_eq!(ItemValue::from_json(&json!(3.0)), ItemValue::Int(3));
	}

	#[test]
	fn string_formats_as_string() {
		assert_eq!(
			ItemValue::from_json(&json!("hello")),
			ItemValue::Str(Some("hello".to_string()))
		);
	}

	#[test]
	fn bool_formats_as_zero_or_one() {
		assert_eq!(ItemValue::from_json(&json!(true)), ItemValue::Int(1));
		assert_eq!(ItemValue::from_json(&json!(false)), ItemValue::Int(0));
	}

	#[test]
	fn null_formats_as_null_string() {
		assert_eq!(ItemValue::from_json(&Value::Null), ItemValue::Str(None));
	}

	#[test]
	fn nested_object_formats_as_json_text() {
		let value = ItemValue::from_json(&json!({"a": 1}));
		assert_eq!(value, ItemValue::Str(Some("{\"a\":1}".to_string())));
	}

	#[test]
	fn empty_containers_format_as_json_text() {
		assert_eq!(
			ItemValue::from_json(&json!({})),
			ItemValue::Str(Some("{}".to_string()))
		);
		assert_eq!(
			ItemValue::from_json(&json!([])),
			ItemValue::Str(Some("[]".to_string()))
		);
	}

	#[test]
	fn u64_beyond_i64_formats_as_double() {
		let value = ItemValue::from_json(&json!(u64::MAX));
		assert!(matches!(value, ItemValue::Double(_)));
	}

	#[test]
	fn serialized_shape_is_tagged() {
		assert_eq!(
			serde_json::to_string(&ItemValue::Int(5)).unwrap(),
			"{\"int_value\":5}"
		);
		assert_eq!(
			serde_json::to_string(&ItemValue::Double(1.5)).unwrap(),
			"{\"double_value\":1.5}"
		);
		assert_eq!(
			serde_json::to_string(&ItemValue::Str(Some("x".to_string()))).unwrap(),
			"{\"string_value\":\"x\"}"
		);
		assert_eq!(
			serde_json::to_string(&ItemValue::Str(None)).unwrap(),
			"{\"string_value\":null}"
		);
	}

	#[test]
	fn format_params_preserves_insertion_order() {
		let mut params = Map::new();
		params.insert("zebra".to_string(), json!(1));
		params.insert("apple".to_string(), json!("x"));
		params.insert("mango".to_string(), json!(true));

		let items = format_params(&params);
		let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
		assert_eq!(keys, vec!["zebra", "apple", "mango"]);
	}

	#[test]
	fn format_params_round_trip_example() {
		let mut params = Map::new();
		params.insert("a".to_string(), json!(1));
		params.insert("b".to_string(), json!("x"));

		let items = format_params(&params);
		assert_eq!(
			serde_json::to_value(&items).unwrap(),
			json!([
				{"key": "a", "value": {"int_value": 1}},
				{"key": "b", "value": {"string_value": "x"}},
			])
		);
	}

	proptest! {
		#[test]
		fn one_item_per_key(keys in proptest::collection::vec("[a-z]{1,12}", 0..20)) {
			let mut params = Map::new();
			for key in &keys {
				params.insert(key.clone(), json!(1));
			}
			let items = format_params(&params);
			prop_assert_eq!(items.len(), params.len());
			for (item, (k, _)) in items.iter().zip(params.iter()) {
				prop_assert_eq!(&item.key, k);
			}
		}

		#[test]
		fn every_i64_round_trips_as_int(n in any::<i64>()) {
			prop_assert_eq!(ItemValue::from_json(&json!(n)), ItemValue::Int(n));
		}

		#[test]
		fn every_string_round_trips(s in ".{0,64}") {
			prop_assert_eq!(
				ItemValue::from_json(&json!(s.clone())),
				ItemValue::Str(Some(s))
			);
		}

		#[test]
		fn non_integral_floats_are_double(f in any::<f64>().prop_filter("non-integral", |f| f.is_finite() && f.fract() != 0.0)) {
			prop_assert_eq!(ItemValue::from_json(&json!(f)), ItemValue::Double(f));
		}
	}
}
