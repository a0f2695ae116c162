// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group-scoped authorization for the fyeo case-management server.
//!
//! Two pieces compose into one check that runs before every protected read
//! or write:
//!
//! - [`claims`]: derives the caller's [`GroupSet`] from identity claims
//! - [`guard`]: decides whether that set may act on a case or on a child
//!   resource (asset, incident, event) via its owning case
//!
//! # Request lifecycle
//!
//! ```text
//! START ─► extract GroupSet ─► ExtractFailed (401)
//!             │
//!             ├── direct group  ─► authorize_direct   ─► Allowed | Denied
//!             └── case reference ─► authorize_via_case ─► Allowed | Denied
//!
//! Allowed ─► handler performs the requested read/write
//! Denied | ExtractFailed ─► aborted, nothing written
//! ```

pub mod claims;
pub mod error;
pub mod group;
pub mod guard;
pub mod types;

pub use claims::{extract_group_set, Claims, ClaimsExtractor, DEFAULT_GROUPS_CLAIM};
pub use error::{AuthError, LookupError, DENIED_MESSAGE};
pub use group::{CallerIdentity, GroupSet};
pub use guard::{
	authorize_direct, authorize_via_case, AccessDecision, AccessGuard, CaseLookup, DenyReason,
	ResourceLookup,
};
pub use types::{AssetId, CaseId, EventId, IncidentId, ResourceKind, ResourceScope};
