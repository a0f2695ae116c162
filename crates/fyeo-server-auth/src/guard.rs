// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group-scoped access guard.
//!
//! Decides whether a [`GroupSet`] may act on a resource. Cases own a group
//! directly; assets, incidents and events inherit the scope of the case they
//! reference. Evaluation is strictly:
//!
//! ```text
//! resource has direct group   ──► authorize_direct  ──► Allowed | Denied
//! resource references a case  ──► authorize_via_case ──► Allowed | Denied
//! ```
//!
//! The case lookup is filtered by group membership and archival at the store,
//! so a foreign case and a missing case are indistinguishable. Nothing here
//! writes to the store, and nothing is cached between calls.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{AuthError, LookupError, Result, DENIED_MESSAGE};
use crate::group::GroupSet;
use crate::types::{CaseId, ResourceKind, ResourceScope};
use uuid::Uuid;

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
	/// The resource's group is not in the caller's set.
	GroupMismatch,
	/// No non-archived case in the caller's groups matched.
	CaseNotFound,
	/// The child resource is archived or missing.
	ResourceNotFound,
	/// The child resource does not reference a case.
	MissingCaseReference,
}

impl DenyReason {
	/// Internal detail for logs. Callers only ever see [`DENIED_MESSAGE`].
	pub fn detail(&self) -> &'static str {
		match self {
			DenyReason::GroupMismatch => "group mismatch",
			DenyReason::CaseNotFound => "case not found",
			DenyReason::ResourceNotFound => "resource not found",
			DenyReason::MissingCaseReference => "no case reference",
		}
	}
}

/// Outcome of a single access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
	Allowed,
	Denied { reason: DenyReason },
}

impl AccessDecision {
	pub fn denied(reason: DenyReason) -> Self {
		AccessDecision::Denied { reason }
	}

	pub fn is_allowed(&self) -> bool {
		matches!(self, AccessDecision::Allowed)
	}

	/// The externally visible reason. Identical for every denial.
	pub fn reason(&self) -> &'static str {
		match self {
			AccessDecision::Allowed => "allowed",
			AccessDecision::Denied { .. } => DENIED_MESSAGE,
		}
	}

	/// Converts a denial into [`AuthError::NotFoundOrDenied`].
	pub fn into_result(self) -> Result<()> {
		match self {
			AccessDecision::Allowed => Ok(()),
			AccessDecision::Denied { .. } => Err(AuthError::NotFoundOrDenied),
		}
	}
}

/// Fetches a case's scope, constrained by the caller's groups.
///
/// Implementations must filter at the store by `id`, `group ∈ groups` and
/// `archived = false` in a single read, and return [`LookupError::NotFound`]
/// when nothing matches. They must never fetch unconditionally and compare
/// afterwards.
#[async_trait]
pub trait CaseLookup: Send + Sync {
	async fn find_case(
		&self,
		case_id: &CaseId,
		groups: &GroupSet,
	) -> std::result::Result<ResourceScope, LookupError>;
}

/// Fetches the scope projection of a non-archived child resource.
///
/// Archived or missing resources are [`LookupError::NotFound`].
#[async_trait]
pub trait ResourceLookup: Send + Sync {
	async fn find_scope(
		&self,
		kind: ResourceKind,
		id: &Uuid,
	) -> std::result::Result<ResourceScope, LookupError>;
}

/// Allowed iff `resource_group ∈ groups`.
pub fn authorize_direct(groups: &GroupSet, resource_group: &str) -> AccessDecision {
	if groups.contains(resource_group) {
		AccessDecision::Allowed
	} else {
		AccessDecision::denied(DenyReason::GroupMismatch)
	}
}

/// Authorizes through the owning case.
///
/// # Errors
///
/// Returns [`AuthError::Upstream`] if the lookup itself failed. A missing,
/// archived or foreign case is a `Denied` decision, not an error.
#[instrument(level = "debug", skip(groups, lookup), fields(case_id = %case_id))]
pub async fn authorize_via_case(
	groups: &GroupSet,
	case_id: &CaseId,
	lookup: &dyn CaseLookup,
) -> Result<AccessDecision> {
	match lookup.find_case(case_id, groups).await {
		Ok(scope) if scope.archived => Ok(AccessDecision::denied(DenyReason::CaseNotFound)),
		Ok(scope) => match scope.group.as_deref() {
			Some(group) => Ok(authorize_direct(groups, group)),
			None => Ok(AccessDecision::denied(DenyReason::GroupMismatch)),
		},
		Err(LookupError::NotFound) => Ok(AccessDecision::denied(DenyReason::CaseNotFound)),
		Err(LookupError::Upstream(msg)) => {
			tracing::error!(case_id = %case_id, error = %msg, "case lookup failed");
			Err(AuthError::Upstream(msg))
		}
	}
}

/// The request-scoped authorization capability injected into handlers.
#[derive(Clone)]
pub struct AccessGuard {
	cases: Arc<dyn CaseLookup>,
	resources: Arc<dyn ResourceLookup>,
}

impl AccessGuard {
	pub fn new(cases: Arc<dyn CaseLookup>, resources: Arc<dyn ResourceLookup>) -> Self {
		Self { cases, resources }
	}

	/// Builds a guard from a single store implementing both lookups.
	pub fn from_store<S>(store: Arc<S>) -> Self
	where
		S: CaseLookup + ResourceLookup + 'static,
	{
		Self {
			cases: store.clone(),
			resources: store,
		}
	}

	/// Direct check for a resource whose group is already known, such as a
	/// case about to be created.
	#[instrument(level = "debug", skip(self, groups))]
	pub fn authorize_group(&self, groups: &GroupSet, group: &str) -> AccessDecision {
		let decision = authorize_direct(groups, group);
		log_decision(ResourceKind::Case, &decision);
		decision
	}

	/// Checks access to a case.
	pub async fn authorize_case(&self, groups: &GroupSet, case_id: &CaseId) -> Result<AccessDecision> {
		let decision = authorize_via_case(groups, case_id, self.cases.as_ref()).await?;
		log_decision(ResourceKind::Case, &decision);
		Ok(decision)
	}

	/// Checks access to any resource by kind and id.
	///
	/// Children are resolved through their `case_id`; any group copy they
	/// carry is ignored.
	#[instrument(level = "debug", skip(self, groups), fields(kind = %kind, id = %id))]
	pub async fn authorize_resource(
		&self,
		groups: &GroupSet,
		kind: ResourceKind,
		id: &Uuid,
	) -> Result<AccessDecision> {
		if kind.owns_group() {
			return self.authorize_case(groups, &CaseId::new(*id)).await;
		}

		let scope = match self.resources.find_scope(kind, id).await {
			Ok(scope) => scope,
			Err(LookupError::NotFound) => {
				let decision = AccessDecision::denied(DenyReason::ResourceNotFound);
				log_decision(kind, &decision);
				return Ok(decision);
			}
			Err(LookupError::Upstream(msg)) => {
				tracing::error!(kind = %kind, id = %id, error = %msg, "resource lookup failed");
				return Err(AuthError::Upstream(msg));
			}
		};

		let decision = self.authorize_scope(groups, &scope).await?;
		log_decision(kind, &decision);
		Ok(decision)
	}

	/// Checks access given an already-fetched projection.
	pub async fn authorize_scope(
		&self,
		groups: &GroupSet,
		scope: &ResourceScope,
	) -> Result<AccessDecision> {
		if scope.archived {
			return Ok(AccessDecision::denied(DenyReason::ResourceNotFound));
		}

		let Some(case_id) = scope.case_id else {
			return Ok(AccessDecision::denied(DenyReason::MissingCaseReference));
		};

		authorize_via_case(groups, &case_id, self.cases.as_ref()).await
	}

	/// Like [`authorize_case`](Self::authorize_case) but fails on denial.
	pub async fn require_case(&self, groups: &GroupSet, case_id: &CaseId) -> Result<()> {
		self.authorize_case(groups, case_id).await?.into_result()
	}

	/// Like [`authorize_resource`](Self::authorize_resource) but fails on denial.
	pub async fn require_resource(
		&self,
		groups: &GroupSet,
		kind: ResourceKind,
		id: &Uuid,
	) -> Result<()> {
		self.authorize_resource(groups, kind, id).await?.into_result()
	}

	/// Like [`authorize_group`](Self::authorize_group) but fails on denial.
	pub fn require_group(&self, groups: &GroupSet, group: &str) -> Result<()> {
		self.authorize_group(groups, group).into_result()
	}
}

fn log_decision(kind: ResourceKind, decision: &AccessDecision) {
	match decision {
		AccessDecision::Allowed => tracing::debug!(kind = %kind, "access allowed"),
		AccessDecision::Denied { reason } => {
			tracing::info!(kind = %kind, reason = reason.detail(), "access denied")
		}
	}
}
