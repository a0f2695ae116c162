// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Caller-scoped listings.
//!
//! These never take a resource id. The store query itself is filtered by the
//! caller's groups, so there is nothing for the guard to check.

use axum::{
	extract::{rejection::QueryRejection, Query, State},
	Json,
};
use fyeo_server_auth::CallerIdentity;
use fyeo_server_db::{AssetSummary, Case, IncidentSummary};
use serde::Deserialize;

use crate::{api::AppState, error::ServerError, identity::Caller};

/// GET /api/me - Subject and groups of the caller.
pub async fn get_me(Caller(identity): Caller) -> Json<CallerIdentity> {
	Json(identity)
}

/// GET /api/me/cases
#[tracing::instrument(skip_all, fields(subject = %caller.subject()))]
pub async fn list_my_cases(
	caller: Caller,
	State(state): State<AppState>,
) -> Result<Json<Vec<Case>>, ServerError> {
	let cases = state.cases.list_cases_for_groups(caller.groups()).await?;
	Ok(Json(cases))
}

/// Optional bounds on the live incident count of each asset.
#[derive(Debug, Default, Deserialize)]
pub struct AssetFilter {
	pub incident_count_min: Option<i64>,
	pub incident_count_max: Option<i64>,
}

impl AssetFilter {
	fn matches(&self, summary: &AssetSummary) -> bool {
		self.incident_count_min
			.map_or(true, |min| summary.incident_count >= min)
			&& self
				.incident_count_max
				.map_or(true, |max| summary.incident_count <= max)
	}
}

/// GET /api/me/assets - Assets of the caller's cases with case name and
/// incident count.
#[tracing::instrument(skip_all, fields(subject = %caller.subject()))]
pub async fn list_my_assets(
	caller: Caller,
	State(state): State<AppState>,
	filter: Result<Query<AssetFilter>, QueryRejection>,
) -> Result<Json<Vec<AssetSummary>>, ServerError> {
	let Query(filter) = filter?;
	let assets = state
		.assets
		.list_asset_summaries_for_groups(caller.groups())
		.await?
		.into_iter()
		.filter(|a| filter.matches(a))
		.collect();
	Ok(Json(assets))
}

/// GET /api/me/incidents
#[tracing::instrument(skip_all, fields(subject = %caller.subject()))]
pub async fn list_my_incidents(
	caller: Caller,
	State(state): State<AppState>,
) -> Result<Json<Vec<IncidentSummary>>, ServerError> {
	let incidents = state
		.incidents
		.list_incident_summaries_for_groups(caller.groups())
		.await?;
	Ok(Json(incidents))
}
