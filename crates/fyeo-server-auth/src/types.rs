// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions shared by the authorization layer and its callers.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for each persisted entity
//!   ([`CaseId`], [`AssetId`], [`IncidentId`], [`EventId`]) preventing accidental mixing
//! - **Resource kinds**: The collections a guarded operation can target ([`ResourceKind`])
//! - **Resource scope**: The narrow projection the guard reads from the store ([`ResourceScope`])
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(CaseId, "Unique identifier for a case.");
define_id_type!(AssetId, "Unique identifier for an asset.");
define_id_type!(IncidentId, "Unique identifier for an incident.");
define_id_type!(EventId, "Unique identifier for an event.");

// =============================================================================
// Resource Kinds
// =============================================================================

/// Persisted collections whose access is scoped by group.
///
/// A [`ResourceKind::Case`] owns its group directly. Every other kind inherits
/// its scope from the case it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
	Case,
	Asset,
	Incident,
	Event,
}

impl ResourceKind {
	/// Returns the store collection backing this kind.
	pub fn collection(&self) -> &'static str {
		match self {
			ResourceKind::Case => "cases",
			ResourceKind::Asset => "assets",
			ResourceKind::Incident => "incidents",
			ResourceKind::Event => "events",
		}
	}

	/// Returns true if resources of this kind carry their own owning group.
	pub fn owns_group(&self) -> bool {
		matches!(self, ResourceKind::Case)
	}
}

impl fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResourceKind::Case => write!(f, "case"),
			ResourceKind::Asset => write!(f, "asset"),
			ResourceKind::Incident => write!(f, "incident"),
			ResourceKind::Event => write!(f, "event"),
		}
	}
}

// =============================================================================
// Resource Scope
// =============================================================================

/// Narrow projection of a stored resource: only what an access decision reads.
///
/// `group` is authoritative for cases only. Children may carry a stale
/// denormalized copy of their case's group; the guard never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceScope {
	pub kind: ResourceKind,
	pub id: Uuid,
	pub group: Option<String>,
	pub case_id: Option<CaseId>,
	pub archived: bool,
}

impl ResourceScope {
	/// Projection of a case owning `group`.
	pub fn case(id: CaseId, group: impl Into<String>) -> Self {
		Self {
			kind: ResourceKind::Case,
			id: id.into_inner(),
			group: Some(group.into()),
			case_id: Some(id),
			archived: false,
		}
	}

	/// Projection of a child resource belonging to `case_id`.
	pub fn child(kind: ResourceKind, id: Uuid, case_id: Option<CaseId>) -> Self {
		Self {
			kind,
			id,
			group: None,
			case_id,
			archived: false,
		}
	}

	/// Builder: set the denormalized group copy.
	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.group = Some(group.into());
		self
	}

	/// Builder: set the archived flag.
	pub fn with_archived(mut self, archived: bool) -> Self {
		self.archived = archived;
		self
	}
}
