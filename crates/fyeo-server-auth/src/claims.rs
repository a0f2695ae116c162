// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization context extraction.
//!
//! Turns the claims object handed over by the identity layer into a
//! [`GroupSet`]. The function is pure: no I/O, no state.
//!
//! ```text
//! claims? ──none──► NoClaims
//!    │
//!    └─ groups claim? ──none──► NoGroups
//!           │
//!           └─ split on ',' ──► GroupSet
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::error::{AuthError, Result};
use crate::group::{CallerIdentity, GroupSet};

/// Claim key carrying group membership when nothing else is configured.
pub const DEFAULT_GROUPS_CLAIM: &str = "cognito:groups";

/// Map-shaped claims object produced by the external identity layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
	pub fn new(map: Map<String, Value>) -> Self {
		Self(map)
	}

	/// Parses a JSON object. Anything other than an object is rejected.
	pub fn from_json(raw: &str) -> std::result::Result<Self, serde_json::Error> {
		serde_json::from_str(raw)
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Builder: insert a claim.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.0.insert(key.into(), value.into());
		self
	}
}

/// Extracts group sets using a configurable claim key.
#[derive(Debug, Clone)]
pub struct ClaimsExtractor {
	groups_claim: String,
}

impl Default for ClaimsExtractor {
	fn default() -> Self {
		Self::new(DEFAULT_GROUPS_CLAIM)
	}
}

impl ClaimsExtractor {
	pub fn new(groups_claim: impl Into<String>) -> Self {
		Self {
			groups_claim: groups_claim.into(),
		}
	}

	pub fn groups_claim(&self) -> &str {
		&self.groups_claim
	}

	/// Derives the caller's group set.
	///
	/// `subject` is only used to make the `NoClaims` error traceable.
	///
	/// # Errors
	///
	/// - [`AuthError::NoClaims`] if `claims` is `None`
	/// - [`AuthError::NoGroups`] if the group claim is absent, null, or not a
	///   string / array of strings
	#[instrument(level = "debug", skip(self, claims), fields(claim = %self.groups_claim))]
	pub fn extract(&self, claims: Option<&Claims>, subject: &str) -> Result<GroupSet> {
		let Some(claims) = claims else {
			tracing::debug!(subject, "no claims on request");
			return Err(AuthError::NoClaims {
				subject: subject.to_string(),
			});
		};

		match claims.get(&self.groups_claim) {
			Some(Value::String(raw)) => Ok(GroupSet::from_claim(raw)),
			Some(Value::Array(items)) => items
				.iter()
				.map(|v| v.as_str().ok_or(AuthError::NoGroups))
				.collect::<Result<GroupSet>>(),
			_ => {
				tracing::debug!(subject, "group claim missing");
				Err(AuthError::NoGroups)
			}
		}
	}

	/// Extracts the full request-scoped identity.
	pub fn identify(&self, claims: Option<&Claims>, subject: &str) -> Result<CallerIdentity> {
		let groups = self.extract(claims, subject)?;
		Ok(CallerIdentity::new(subject, groups))
	}
}

/// Extracts a group set using [`DEFAULT_GROUPS_CLAIM`].
pub fn extract_group_set(claims: Option<&Claims>, subject: &str) -> Result<GroupSet> {
	ClaimsExtractor::default().extract(claims, subject)
}
