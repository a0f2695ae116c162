// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use axum::{
	routing::{get, post},
	Router,
};
use fyeo_server_auth::{AccessGuard, ClaimsExtractor};
use fyeo_server_config::ServerConfig;
use fyeo_server_db::{
	AssetRepository, CaseRepository, EventRepository, IncidentRepository, IncidentTypeRepository,
	ScopeRepository,
};
use http::HeaderName;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

use crate::{error::ServerError, identity::IdentitySource, routes};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub cases: Arc<CaseRepository>,
	pub assets: Arc<AssetRepository>,
	pub incidents: Arc<IncidentRepository>,
	pub events: Arc<EventRepository>,
	pub incident_types: Arc<IncidentTypeRepository>,
	pub guard: AccessGuard,
	pub identity: Arc<IdentitySource>,
	pub graph_window_days: u32,
}

/// Builds the application state from a migrated pool and resolved config.
///
/// # Errors
/// Returns `ServerError::Internal` if a configured header name is invalid.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> Result<AppState, ServerError> {
	let header = |name: &str| {
		HeaderName::from_bytes(name.as_bytes())
			.map_err(|e| ServerError::Internal(format!("invalid header name '{name}': {e}")))
	};

	let identity = IdentitySource {
		claims_header: header(&config.identity.claims_header)?,
		subject_header: header(&config.identity.subject_header)?,
		extractor: ClaimsExtractor::new(config.identity.groups_claim.clone()),
	};

	Ok(AppState {
		cases: Arc::new(CaseRepository::new(pool.clone())),
		assets: Arc::new(AssetRepository::new(pool.clone())),
		incidents: Arc::new(IncidentRepository::new(pool.clone())),
		events: Arc::new(EventRepository::new(pool.clone())),
		incident_types: Arc::new(IncidentTypeRepository::new(pool.clone())),
		guard: AccessGuard::from_store(Arc::new(ScopeRepository::new(pool.clone()))),
		identity: Arc::new(identity),
		graph_window_days: config.incidents.graph_window_days,
		pool,
	})
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route(
			"/api/incident-types",
			get(routes::incident_types::list_incident_types),
		)
		.route("/api/me", get(routes::me::get_me))
		.route("/api/me/cases", get(routes::me::list_my_cases))
		.route("/api/me/assets", get(routes::me::list_my_assets))
		.route("/api/me/incidents", get(routes::me::list_my_incidents))
		.route("/api/cases", post(routes::cases::create_case))
		.route(
			"/api/cases/{id}",
			get(routes::cases::get_case)
				.patch(routes::cases::update_case)
				.delete(routes::cases::delete_case),
		)
		.route("/api/cases/{id}/assets", get(routes::cases::list_case_assets))
		.route("/api/assets", post(routes::assets::create_asset))
		.route(
			"/api/assets/{id}",
			get(routes::assets::get_asset)
				.patch(routes::assets::update_asset)
				.delete(routes::assets::delete_asset),
		)
		.route(
			"/api/assets/{id}/incidents",
			get(routes::assets::list_asset_incidents),
		)
		.route("/api/incidents", post(routes::incidents::create_incident))
		.route(
			"/api/incidents/{id}",
			get(routes::incidents::get_incident).delete(routes::incidents::delete_incident),
		)
		.route(
			"/api/incidents/{id}/assets",
			get(routes::incidents::list_incident_assets),
		)
		.route("/api/events", post(routes::events::create_event))
		.route(
			"/api/events/{id}",
			get(routes::events::get_event)
				.patch(routes::events::update_event)
				.delete(routes::events::delete_event),
		)
		.route("/api/graph/incidents", get(routes::graph::graph_incidents))
		.with_state(state)
}
