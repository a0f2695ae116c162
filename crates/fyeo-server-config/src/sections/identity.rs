// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity hand-off configuration.
//!
//! The server sits behind an identity layer that has already authenticated
//! the caller. That layer forwards the caller's claims object and subject in
//! request headers; these settings name the headers and the claim key.

use serde::Deserialize;

const DEFAULT_GROUPS_CLAIM: &str = "cognito:groups";
const DEFAULT_CLAIMS_HEADER: &str = "x-fyeo-claims";
const DEFAULT_SUBJECT_HEADER: &str = "x-fyeo-identity-id";

/// Identity configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct IdentityConfig {
	pub groups_claim: String,
	pub claims_header: String,
	pub subject_header: String,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		Self {
			groups_claim: DEFAULT_GROUPS_CLAIM.to_string(),
			claims_header: DEFAULT_CLAIMS_HEADER.to_string(),
			subject_header: DEFAULT_SUBJECT_HEADER.to_string(),
		}
	}
}

/// Identity configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfigLayer {
	#[serde(default)]
	pub groups_claim: Option<String>,
	#[serde(default)]
	pub claims_header: Option<String>,
	#[serde(default)]
	pub subject_header: Option<String>,
}

impl IdentityConfigLayer {
	pub fn merge(&mut self, other: IdentityConfigLayer) {
		if other.groups_claim.is_some() {
			self.groups_claim = other.groups_claim;
		}
		if other.claims_header.is_some() {
			self.claims_header = other.claims_header;
		}
		if other.subject_header.is_some() {
			self.subject_header = other.subject_header;
		}
	}

	pub fn finalize(self) -> IdentityConfig {
		IdentityConfig {
			groups_claim: self
				.groups_claim
				.unwrap_or_else(|| DEFAULT_GROUPS_CLAIM.to_string()),
			claims_header: self
				.claims_header
				.unwrap_or_else(|| DEFAULT_CLAIMS_HEADER.to_string())
				.to_ascii_lowercase(),
			subject_header: self
				.subject_header
				.unwrap_or_else(|| DEFAULT_SUBJECT_HEADER.to_string())
				.to_ascii_lowercase(),
		}
	}
}

/// Returns true if `name` is a legal HTTP header name.
pub(crate) fn is_valid_header_name(name: &str) -> bool {
	!name.is_empty()
		&& name.bytes().all(|b| {
			b.is_ascii_alphanumeric()
				|| matches!(
					b,
					b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^'
						| b'_' | b'`' | b'|' | b'~'
				)
		})
}
