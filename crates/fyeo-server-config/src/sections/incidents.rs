// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Incident reporting configuration.

use serde::Deserialize;

const DEFAULT_GRAPH_WINDOW_DAYS: u32 = 30;

/// Incident configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct IncidentsConfig {
	/// Number of days, ending today, covered by the severity histogram.
	pub graph_window_days: u32,
}

impl Default for IncidentsConfig {
	fn default() -> Self {
		Self {
			graph_window_days: DEFAULT_GRAPH_WINDOW_DAYS,
		}
	}
}

/// Incident configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentsConfigLayer {
	#[serde(default)]
	pub graph_window_days: Option<u32>,
}

impl IncidentsConfigLayer {
	pub fn merge(&mut self, other: IncidentsConfigLayer) {
		if other.graph_window_days.is_some() {
			self.graph_window_days = other.graph_window_days;
		}
	}

	pub fn finalize(self) -> IncidentsConfig {
		IncidentsConfig {
			graph_window_days: self.graph_window_days.unwrap_or(DEFAULT_GRAPH_WINDOW_DAYS),
		}
	}
}
