// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Incident type catalog. Shared by every group.

use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::IncidentType;

#[derive(Clone)]
pub struct IncidentTypeRepository {
	pool: SqlitePool,
}

impl IncidentTypeRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_incident_types(&self) -> Result<Vec<IncidentType>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, class, description, severity, business_impact
			FROM incident_types
			ORDER BY class ASC, severity DESC, id ASC
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(rows
			.iter()
			.map(|r| IncidentType {
				id: r.get("id"),
				class: r.get("class"),
				description: r.get("description"),
				severity: r.get("severity"),
				business_impact: r.get("business_impact"),
			})
			.collect())
	}
}
