// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group sets and the per-request caller identity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The set of groups a caller may act on.
///
/// Entries are kept verbatim. An empty-string entry is legal and simply never
/// intersects a real resource group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSet(BTreeSet<String>);

impl GroupSet {
	/// Parses a comma-separated group claim.
	pub fn from_claim(value: &str) -> Self {
		Self(value.split(',').map(str::to_string).collect())
	}

	/// Returns true if `group` is a member of this set.
	pub fn contains(&self, group: &str) -> bool {
		self.0.contains(group)
	}

	/// Returns true if any of `groups` is a member of this set.
	pub fn intersects<'a>(&self, mut groups: impl Iterator<Item = &'a str>) -> bool {
		groups.any(|g| self.contains(g))
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<S: Into<String>> FromIterator<S> for GroupSet {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

impl fmt::Display for GroupSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let joined: Vec<&str> = self.iter().collect();
		write!(f, "{}", joined.join(","))
	}
}

/// The authenticated caller of a single request.
///
/// Built at the start of a request from identity-provider output and dropped
/// when the request completes. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdentity {
	pub subject: String,
	pub groups: GroupSet,
}

impl CallerIdentity {
	pub fn new(subject: impl Into<String>, groups: GroupSet) -> Self {
		Self {
			subject: subject.into(),
			groups,
		}
	}
}
