// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Incident HTTP handlers.
//!
//! Incidents store a copy of their case's group at creation time. That copy
//! is never consulted for access: every check resolves through `case_id`.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use fyeo_server_auth::{AssetId, EventId, IncidentId, ResourceKind};
use fyeo_server_db::{Asset, Incident, NewIncident};
use serde::Serialize;
use std::collections::HashSet;

use super::parse_id;
use crate::{
	api::AppState,
	error::ServerError,
	graph::{MAX_SEVERITY, MIN_SEVERITY},
	identity::Caller,
};

/// Assets referenced by an incident, resolved within its case.
#[derive(Debug, Serialize)]
pub struct IncidentAssets {
	pub targets: Vec<Asset>,
	pub threat_actors: Vec<Asset>,
}

fn validate_new_incident(new: &NewIncident) -> Result<(), ServerError> {
	if new.title.trim().is_empty() {
		return Err(ServerError::bad_request("Incident title must not be empty"));
	}
	if let Some(severity) = new.severity {
		if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&severity) {
			return Err(ServerError::bad_request(format!(
				"Severity must be between {MIN_SEVERITY} and {MAX_SEVERITY}, got {severity}"
			)));
		}
	}
	Ok(())
}

/// POST /api/incidents - Report an incident against one of the caller's
/// cases.
///
/// Every referenced asset and event must belong to the same case.
///
/// # Errors
/// - 400: Malformed body, bad severity, or an asset or event outside the case
/// - 401: No claims or no group claim
/// - 403: Case missing, archived, or outside the caller's groups
#[tracing::instrument(skip_all, fields(subject = %caller.subject()))]
pub async fn create_incident(
	caller: Caller,
	State(state): State<AppState>,
	payload: Result<Json<NewIncident>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let Json(new) = payload?;
	validate_new_incident(&new)?;

	state.guard.require_case(caller.groups(), &new.case_id).await?;

	let case = state
		.cases
		.get_case(&new.case_id, caller.groups())
		.await?
		.ok_or_else(ServerError::denied)?;

	let referenced: HashSet<AssetId> = new
		.asset_id
		.iter()
		.chain(&new.target_ids)
		.chain(&new.threat_actor_ids)
		.copied()
		.collect();
	if !referenced.is_empty() {
		let ids: Vec<AssetId> = referenced.iter().copied().collect();
		let found = state.assets.list_assets_by_ids(&case.id, &ids).await?;
		if found.len() != ids.len() {
			return Err(ServerError::bad_request(
				"Referenced assets must belong to the incident's case",
			));
		}
	}

	let events: HashSet<EventId> = new.event_ids.iter().copied().collect();
	if !events.is_empty() {
		let ids: Vec<EventId> = events.into_iter().collect();
		let found = state.events.list_events_by_ids(&case.id, &ids).await?;
		if found.len() != ids.len() {
			return Err(ServerError::bad_request(
				"Referenced events must belong to the incident's case",
			));
		}
	}

	let incident = state.incidents.create_incident(&new, &case.group).await?;
	tracing::info!(incident_id = %incident.id, case_id = %case.id, "incident created");
	Ok((StatusCode::CREATED, Json(incident)))
}

/// GET /api/incidents/{id}
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn get_incident(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Incident>, ServerError> {
	let incident_id: IncidentId = parse_id(&id, "incident")?;
	state
		.guard
		.require_resource(caller.groups(), ResourceKind::Incident, incident_id.as_uuid())
		.await?;

	let incident = state
		.incidents
		.get_incident(&incident_id)
		.await?
		.ok_or_else(ServerError::denied)?;
	Ok(Json(incident))
}

/// DELETE /api/incidents/{id} - Archive an incident.
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn delete_incident(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
	let incident_id: IncidentId = parse_id(&id, "incident")?;
	state
		.guard
		.require_resource(caller.groups(), ResourceKind::Incident, incident_id.as_uuid())
		.await?;

	if !state.incidents.archive_incident(&incident_id).await? {
		return Err(ServerError::denied());
	}
	tracing::info!(incident_id = %incident_id, "incident archived");
	Ok(StatusCode::NO_CONTENT)
}

/// GET /api/incidents/{id}/assets - Target assets and threat actors.
///
/// IDs that no longer resolve to a live asset of the incident's case are
/// left out.
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn list_incident_assets(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<IncidentAssets>, ServerError> {
	let incident_id: IncidentId = parse_id(&id, "incident")?;
	state
		.guard
		.require_resource(caller.groups(), ResourceKind::Incident, incident_id.as_uuid())
		.await?;

	let incident = state
		.incidents
		.get_incident(&incident_id)
		.await?
		.ok_or_else(ServerError::denied)?;
	let case_id = incident.case_id.ok_or_else(ServerError::denied)?;

	let targets = state
		.assets
		.list_assets_by_ids(&case_id, &incident.target_ids)
		.await?;
	let threat_actors = state
		.assets
		.list_assets_by_ids(&case_id, &incident.threat_actor_ids)
		.await?;

	Ok(Json(IncidentAssets {
		targets,
		threat_actors,
	}))
}
