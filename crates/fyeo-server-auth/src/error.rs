// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization error taxonomy.
//!
//! Every variant is terminal for the request. None of them is retried.

/// Message shared by every denial so that a missing resource and a foreign one
/// look identical to the caller.
pub const DENIED_MESSAGE: &str = "group mismatch or case not found";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
	/// The request carried no claims object at all.
	#[error("No claims found for {subject}")]
	NoClaims { subject: String },

	/// Claims were present but the group-membership claim was not.
	#[error("No group permissions set")]
	NoGroups,

	/// Resource missing, archived, or outside the caller's groups.
	#[error("{}", DENIED_MESSAGE)]
	NotFoundOrDenied,

	/// Store or identity-provider failure unrelated to the decision.
	#[error("upstream failure: {0}")]
	Upstream(String),
}

impl AuthError {
	/// Returns true if the caller could not be identified at all.
	pub fn is_unauthenticated(&self) -> bool {
		matches!(self, AuthError::NoClaims { .. } | AuthError::NoGroups)
	}
}

/// Failure reported by an injected lookup capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
	#[error("not found")]
	NotFound,

	#[error("lookup failed: {0}")]
	Upstream(String),
}

impl From<LookupError> for AuthError {
	fn from(e: LookupError) -> Self {
		match e {
			LookupError::NotFound => AuthError::NotFoundOrDenied,
			LookupError::Upstream(msg) => AuthError::Upstream(msg),
		}
	}
}

pub type Result<T> = std::result::Result<T, AuthError>;
