// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event HTTP handlers. Events are authorized through their owning case.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use fyeo_server_auth::{AssetId, CaseId, EventId, IncidentId, ResourceKind};
use fyeo_server_db::{Event, EventUpdate, NewEvent};

use super::parse_id;
use crate::{api::AppState, error::ServerError, identity::Caller};

/// Checks that linked assets and incidents live in `case_id`.
async fn check_links(
	state: &AppState,
	case_id: &CaseId,
	asset_id: Option<AssetId>,
	incident_id: Option<IncidentId>,
) -> Result<(), ServerError> {
	if let Some(asset_id) = asset_id {
		let found = state.assets.list_assets_by_ids(case_id, &[asset_id]).await?;
		if found.is_empty() {
			return Err(ServerError::bad_request(
				"Linked asset must belong to the event's case",
			));
		}
	}
	if let Some(incident_id) = incident_id {
		let incident = state.incidents.get_incident(&incident_id).await?;
		if incident.and_then(|i| i.case_id).as_ref() != Some(case_id) {
			return Err(ServerError::bad_request(
				"Linked incident must belong to the event's case",
			));
		}
	}
	Ok(())
}

/// POST /api/events - Record an event in one of the caller's cases.
#[tracing::instrument(skip_all, fields(subject = %caller.subject()))]
pub async fn create_event(
	caller: Caller,
	State(state): State<AppState>,
	payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let Json(new) = payload?;
	if new.url.trim().is_empty() {
		return Err(ServerError::bad_request("Event url must not be empty"));
	}

	state.guard.require_case(caller.groups(), &new.case_id).await?;
	check_links(&state, &new.case_id, new.asset_id, new.incident_id).await?;

	let event = state.events.create_event(&new).await?;
	tracing::info!(event_id = %event.id, case_id = %new.case_id, "event created");
	Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/events/{id}
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn get_event(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Event>, ServerError> {
	let event_id: EventId = parse_id(&id, "event")?;
	state
		.guard
		.require_resource(caller.groups(), ResourceKind::Event, event_id.as_uuid())
		.await?;

	let event = state
		.events
		.get_event(&event_id)
		.await?
		.ok_or_else(ServerError::denied)?;
	Ok(Json(event))
}

/// PATCH /api/events/{id} - Partial update.
///
/// Moving the event to another case requires access to both cases. The
/// linked asset and incident, whether kept or replaced, must belong to the
/// case the event ends up in, so a move has to relink them as well.
#[tracing::instrument(skip(caller, state, payload), fields(subject = %caller.subject()))]
pub async fn update_event(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<EventUpdate>, JsonRejection>,
) -> Result<Json<Event>, ServerError> {
	let event_id: EventId = parse_id(&id, "event")?;
	let Json(update) = payload?;

	state
		.guard
		.require_resource(caller.groups(), ResourceKind::Event, event_id.as_uuid())
		.await?;
	if let Some(target) = &update.case_id {
		state.guard.require_case(caller.groups(), target).await?;
	}

	if update.case_id.is_some() || update.asset_id.is_some() || update.incident_id.is_some() {
		let current = state
			.events
			.get_event(&event_id)
			.await?
			.ok_or_else(ServerError::denied)?;
		let case_id = update
			.case_id
			.or(current.case_id)
			.ok_or_else(ServerError::denied)?;
		check_links(
			&state,
			&case_id,
			update.asset_id.or(current.asset_id),
			update.incident_id.or(current.incident_id),
		)
		.await?;
	}

	let event = state
		.events
		.update_event(&event_id, &update)
		.await?
		.ok_or_else(ServerError::denied)?;
	tracing::info!(event_id = %event_id, "event updated");
	Ok(Json(event))
}

/// DELETE /api/events/{id} - Archive an event.
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn delete_event(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
	let event_id: EventId = parse_id(&id, "event")?;
	state
		.guard
		.require_resource(caller.groups(), ResourceKind::Event, event_id.as_uuid())
		.await?;

	if !state.events.archive_event(&event_id).await? {
		return Err(ServerError::denied());
	}
	tracing::info!(event_id = %event_id, "event archived");
	Ok(StatusCode::NO_CONTENT)
}
