// Copyright (c) 2025 Filum Analytics. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction.

use reqwest::{Client, ClientBuilder};

/// Creates a new HTTP client builder with no default User-Agent.
///
/// Use this for browser-like environments where the User-Agent header must
/// be left to the host.
pub fn builder() -> ClientBuilder {
	Client::builder()
}

/// Creates a new HTTP client builder with the given User-Agent header.
///
/// # Example
/// ```ignore
/// let client = filum_common_http::builder_with_user_agent("filum-rust-sdk/0.1.0")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder_with_user_agent(user_agent: impl Into<String>) -> ClientBuilder {
	Client::builder().user_agent(user_agent.into())
}
