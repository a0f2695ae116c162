// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Case HTTP handlers.
//!
//! A case carries its own group, so creation is checked directly against the
//! requested group and everything else goes through the via-case check.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use fyeo_server_auth::CaseId;
use fyeo_server_db::{Asset, Case, CaseUpdate, NewCase};

use super::parse_id;
use crate::{api::AppState, error::ServerError, identity::Caller};

/// POST /api/cases - Create a case owned by one of the caller's groups.
///
/// # Errors
/// - 400: Malformed body, empty name or empty group
/// - 401: No claims or no group claim
/// - 403: `group` is not one of the caller's groups
#[tracing::instrument(skip_all, fields(subject = %caller.subject()))]
pub async fn create_case(
	caller: Caller,
	State(state): State<AppState>,
	payload: Result<Json<NewCase>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let Json(new) = payload?;
	if new.name.trim().is_empty() {
		return Err(ServerError::bad_request("Case name must not be empty"));
	}
	if new.group.is_empty() {
		return Err(ServerError::bad_request("Case group must not be empty"));
	}

	state.guard.require_group(caller.groups(), &new.group)?;

	let case = state.cases.create_case(&new).await?;
	tracing::info!(case_id = %case.id, group = %case.group, "case created");
	Ok((StatusCode::CREATED, Json(case)))
}

/// GET /api/cases/{id}
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn get_case(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Case>, ServerError> {
	let case_id: CaseId = parse_id(&id, "case")?;
	state.guard.require_case(caller.groups(), &case_id).await?;

	let case = state
		.cases
		.get_case(&case_id, caller.groups())
		.await?
		.ok_or_else(ServerError::denied)?;
	Ok(Json(case))
}

/// PATCH /api/cases/{id} - Partial update.
///
/// Moving a case to another group requires membership of both the current
/// and the new group.
#[tracing::instrument(skip(caller, state, payload), fields(subject = %caller.subject()))]
pub async fn update_case(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<CaseUpdate>, JsonRejection>,
) -> Result<Json<Case>, ServerError> {
	let case_id: CaseId = parse_id(&id, "case")?;
	let Json(update) = payload?;
	if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
		return Err(ServerError::bad_request("Case name must not be empty"));
	}
	if update.group.as_deref().is_some_and(str::is_empty) {
		return Err(ServerError::bad_request("Case group must not be empty"));
	}

	state.guard.require_case(caller.groups(), &case_id).await?;
	if let Some(group) = &update.group {
		state.guard.require_group(caller.groups(), group)?;
	}

	let case = state
		.cases
		.update_case(&case_id, &update)
		.await?
		.ok_or_else(ServerError::denied)?;
	tracing::info!(case_id = %case_id, "case updated");
	Ok(Json(case))
}

/// DELETE /api/cases/{id} - Archive a case.
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn delete_case(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
	let case_id: CaseId = parse_id(&id, "case")?;
	state.guard.require_case(caller.groups(), &case_id).await?;

	if !state.cases.archive_case(&case_id).await? {
		return Err(ServerError::denied());
	}
	tracing::info!(case_id = %case_id, "case archived");
	Ok(StatusCode::NO_CONTENT)
}

/// GET /api/cases/{id}/assets
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn list_case_assets(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Vec<Asset>>, ServerError> {
	let case_id: CaseId = parse_id(&id, "case")?;
	state.guard.require_case(caller.groups(), &case_id).await?;

	let assets = state.assets.list_assets_for_case(&case_id).await?;
	Ok(Json(assets))
}
