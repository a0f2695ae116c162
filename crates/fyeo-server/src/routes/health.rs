// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::{api::AppState, version};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub database: &'static str,
	pub version: &'static str,
}

/// GET /health - Liveness plus a database ping. No identity required.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
		Ok(_) => "ok",
		Err(e) => {
			tracing::warn!(error = %e, "database health check failed");
			"unavailable"
		}
	};

	let (status_code, status) = if database == "ok" {
		(StatusCode::OK, "healthy")
	} else {
		(StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
	};

	(
		status_code,
		Json(HealthResponse {
			status,
			database,
			version: version::VERSION,
		}),
	)
}
