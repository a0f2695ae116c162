// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration produced by a single source.

use serde::Deserialize;

use crate::sections::{
	DatabaseConfigLayer, HttpConfigLayer, IdentityConfigLayer, IncidentsConfigLayer,
	LoggingConfigLayer,
};

/// One source's view of the configuration. Unset sections stay `None` so that
/// lower-precedence values survive a merge.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub identity: Option<IdentityConfigLayer>,
	#[serde(default)]
	pub incidents: Option<IncidentsConfigLayer>,
}

macro_rules! merge_section {
	($self:ident, $other:ident, $field:ident) => {
		if let Some(incoming) = $other.$field {
			match $self.$field.as_mut() {
				Some(existing) => existing.merge(incoming),
				None => $self.$field = Some(incoming),
			}
		}
	};
}

impl ServerConfigLayer {
	/// Overlays `other` on top of `self`, field by field.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section!(self, other, http);
		merge_section!(self, other, database);
		merge_section!(self, other, logging);
		merge_section!(self, other, identity);
		merge_section!(self, other, incidents);
	}
}
