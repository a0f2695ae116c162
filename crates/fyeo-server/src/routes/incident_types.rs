// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{extract::State, Json};
use fyeo_server_db::IncidentType;

use crate::{api::AppState, error::ServerError};

/// GET /api/incident-types - The incident type catalog.
///
/// The catalog is shared by all groups, so no identity is required.
#[tracing::instrument(skip(state))]
pub async fn list_incident_types(
	State(state): State<AppState>,
) -> Result<Json<Vec<IncidentType>>, ServerError> {
	let types = state.incident_types.list_incident_types().await?;
	Ok(Json(types))
}
