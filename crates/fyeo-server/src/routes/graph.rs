// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	extract::{rejection::QueryRejection, Query, State},
	Json,
};
use chrono::Utc;
use fyeo_server_auth::CaseId;
use serde::{Deserialize, Serialize};

use crate::{
	api::AppState,
	error::ServerError,
	graph::{severity_histogram, window_start, SeverityHistogram},
	identity::Caller,
};

#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
	/// Comma-separated case ids. Absent means every case of the caller.
	pub cases: Option<String>,
}

impl GraphQuery {
	/// Parsed case ids. Unparseable entries are dropped.
	fn case_ids(&self) -> Option<Vec<CaseId>> {
		self.cases.as_deref().map(|raw| {
			raw.split(',')
				.filter_map(|s| s.trim().parse::<CaseId>().ok())
				.collect()
		})
	}
}

#[derive(Debug, Serialize)]
pub struct GraphResponse {
	pub window_days: u32,
	pub days: SeverityHistogram,
}

/// GET /api/graph/incidents?cases=a,b - Daily severity counts of active
/// incidents.
///
/// Requested cases outside the caller's groups match nothing in the store
/// query and are silently dropped.
#[tracing::instrument(skip_all, fields(subject = %caller.subject()))]
pub async fn graph_incidents(
	caller: Caller,
	State(state): State<AppState>,
	query: Result<Query<GraphQuery>, QueryRejection>,
) -> Result<Json<GraphResponse>, ServerError> {
	let Query(query) = query?;
	let case_ids = query.case_ids();

	let now = Utc::now();
	let since = window_start(now, state.graph_window_days);
	let incidents = state
		.incidents
		.list_active_incidents_since(caller.groups(), case_ids.as_deref(), since)
		.await?;

	let days = severity_histogram(&incidents, now.date_naive(), state.graph_window_days);
	Ok(Json(GraphResponse {
		window_days: state.graph_window_days,
		days,
	}))
}
