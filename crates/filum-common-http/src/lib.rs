// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for the Filum SDK.
//!
//! This crate provides:
//! - Pre-configured HTTP client builders with User-Agent control
//! - Retry logic with exponential backoff for transient failures

mod client;
mod retry;

pub use client::{builder, builder_with_user_agent};
pub use retry::{retry, RetryConfig, RetryableError};
