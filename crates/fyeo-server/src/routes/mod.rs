// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP handlers, one module per resource.

pub mod assets;
pub mod cases;
pub mod events;
pub mod graph;
pub mod health;
pub mod incident_types;
pub mod incidents;
pub mod me;

use std::str::FromStr;

use crate::error::ServerError;

/// Parses a path identifier, rejecting malformed input with 400.
pub(crate) fn parse_id<T>(raw: &str, what: &str) -> Result<T, ServerError>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	raw.parse()
		.map_err(|e| ServerError::bad_request(format!("Invalid {what} ID '{raw}': {e}")))
}
