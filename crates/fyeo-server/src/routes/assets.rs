// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Asset HTTP handlers. Assets are authorized through their owning case.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use fyeo_server_auth::{AssetId, ResourceKind};
use fyeo_server_db::{Asset, AssetSummary, AssetUpdate, Incident, NewAsset};

use super::parse_id;
use crate::{api::AppState, error::ServerError, identity::Caller};

/// POST /api/assets - Create an asset in one of the caller's cases.
#[tracing::instrument(skip_all, fields(subject = %caller.subject()))]
pub async fn create_asset(
	caller: Caller,
	State(state): State<AppState>,
	payload: Result<Json<NewAsset>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
	let Json(new) = payload?;
	state.guard.require_case(caller.groups(), &new.case_id).await?;

	let asset = state.assets.create_asset(&new).await?;
	tracing::info!(asset_id = %asset.id, case_id = %new.case_id, "asset created");
	Ok((StatusCode::CREATED, Json(asset)))
}

/// GET /api/assets/{id} - Asset with its case name and live incident count.
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn get_asset(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<AssetSummary>, ServerError> {
	let asset_id: AssetId = parse_id(&id, "asset")?;
	state
		.guard
		.require_resource(caller.groups(), ResourceKind::Asset, asset_id.as_uuid())
		.await?;

	let summary = state
		.assets
		.get_asset_summary(&asset_id)
		.await?
		.ok_or_else(ServerError::denied)?;
	Ok(Json(summary))
}

/// PATCH /api/assets/{id} - Partial update.
///
/// When `case_id` is set the caller must also be allowed on the target case.
#[tracing::instrument(skip(caller, state, payload), fields(subject = %caller.subject()))]
pub async fn update_asset(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<AssetUpdate>, JsonRejection>,
) -> Result<Json<Asset>, ServerError> {
	let asset_id: AssetId = parse_id(&id, "asset")?;
	let Json(update) = payload?;

	state
		.guard
		.require_resource(caller.groups(), ResourceKind::Asset, asset_id.as_uuid())
		.await?;
	if let Some(target) = &update.case_id {
		state.guard.require_case(caller.groups(), target).await?;
	}

	let asset = state
		.assets
		.update_asset(&asset_id, &update)
		.await?
		.ok_or_else(ServerError::denied)?;
	tracing::info!(asset_id = %asset_id, "asset updated");
	Ok(Json(asset))
}

/// DELETE /api/assets/{id} - Archive an asset.
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn delete_asset(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
	let asset_id: AssetId = parse_id(&id, "asset")?;
	state
		.guard
		.require_resource(caller.groups(), ResourceKind::Asset, asset_id.as_uuid())
		.await?;

	if !state.assets.archive_asset(&asset_id).await? {
		return Err(ServerError::denied());
	}
	tracing::info!(asset_id = %asset_id, "asset archived");
	Ok(StatusCode::NO_CONTENT)
}

/// GET /api/assets/{id}/incidents - Live incidents targeting the asset.
#[tracing::instrument(skip(caller, state), fields(subject = %caller.subject()))]
pub async fn list_asset_incidents(
	caller: Caller,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Vec<Incident>>, ServerError> {
	let asset_id: AssetId = parse_id(&id, "asset")?;
	state
		.guard
		.require_resource(caller.groups(), ResourceKind::Asset, asset_id.as_uuid())
		.await?;

	let case_id = state
		.assets
		.get_asset(&asset_id)
		.await?
		.and_then(|a| a.case_id)
		.ok_or_else(ServerError::denied)?;

	let incidents = state
		.incidents
		.list_incidents_targeting(&case_id, &asset_id)
		.await?;
	Ok(Json(incidents))
}
