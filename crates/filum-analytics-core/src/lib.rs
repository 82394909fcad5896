// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types for the Filum events collection API.
//!
//! This crate defines the JSON shapes accepted by the collection endpoint:
//! the [`Event`] envelope, the tagged typed-value representation of event
//! parameters ([`EventItem`]/[`ItemValue`]), and the fixed [`EventContext`]
//! attached to every event. Everything here is pure data — batching, retry,
//! and transport live in the `filum-analytics` SDK crate.

mod context;
mod event;
mod item;

pub use context::{EventContext, LibraryInfo, LIBRARY_NAME, LIBRARY_VERSION};
pub use event::{Event, EventType};
pub use item::{format_params, EventItem, ItemValue};
