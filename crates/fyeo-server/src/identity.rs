// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caller identity extraction.
//!
//! The gateway in front of this server has already authenticated the caller.
//! It forwards the claims object as JSON in one header and the caller's
//! subject in another. An absent or unreadable claims header means the
//! request carries no claims.

use axum::{extract::FromRequestParts, http::request::Parts};
use fyeo_server_auth::{CallerIdentity, Claims, ClaimsExtractor, GroupSet};
use http::{HeaderMap, HeaderName};
use tracing::instrument;

use crate::{api::AppState, error::ServerError};

const UNKNOWN_SUBJECT: &str = "unknown";

/// Where the gateway puts identity data, and which claim holds groups.
#[derive(Debug, Clone)]
pub struct IdentitySource {
	pub claims_header: HeaderName,
	pub subject_header: HeaderName,
	pub extractor: ClaimsExtractor,
}

impl IdentitySource {
	/// Builds the caller identity from request headers.
	pub fn identify(&self, headers: &HeaderMap) -> Result<CallerIdentity, ServerError> {
		let subject = headers
			.get(&self.subject_header)
			.and_then(|v| v.to_str().ok())
			.filter(|s| !s.is_empty())
			.unwrap_or(UNKNOWN_SUBJECT);

		let claims = headers
			.get(&self.claims_header)
			.and_then(|v| v.to_str().ok())
			.and_then(|raw| match Claims::from_json(raw) {
				Ok(claims) => Some(claims),
				Err(e) => {
					tracing::warn!(subject, error = %e, "claims header is not a JSON object");
					None
				}
			});

		Ok(self.extractor.identify(claims.as_ref(), subject)?)
	}
}

/// Extractor for the authenticated caller. Rejects with 401 when the caller
/// has no claims or no group claim.
pub struct Caller(pub CallerIdentity);

impl Caller {
	pub fn groups(&self) -> &GroupSet {
		&self.0.groups
	}

	pub fn subject(&self) -> &str {
		&self.0.subject
	}
}

impl FromRequestParts<AppState> for Caller {
	type Rejection = ServerError;

	#[instrument(name = "Caller::from_request_parts", skip_all)]
	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let identity = state.identity.identify(&parts.headers)?;
		tracing::debug!(subject = %identity.subject, groups = %identity.groups, "caller identified");
		Ok(Caller(identity))
	}
}
