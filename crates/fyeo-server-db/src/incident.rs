// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Incident repository.
//!
//! Incidents store a copy of their case's group in `group_name`. Nothing in
//! this module filters on that column; group-scoped reads join `cases`.

use chrono::{DateTime, Utc};
use fyeo_server_auth::{AssetId, CaseId, GroupSet, IncidentId};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::error::DbError;
use crate::row::{parse_id, parse_json, parse_opt_id, parse_timestamp, push_group_filter};
use crate::types::{Incident, IncidentSummary, NewIncident};

const INCIDENT_COLUMNS: &str = "i.id, i.case_id, i.asset_id, i.group_name, i.title, i.incident_type, i.description, i.recommendations, i.source, i.severity, i.target_ids, i.threat_actor_ids, i.event_ids, i.is_active, i.is_reported, i.occurred_at, i.created_at";

#[derive(Clone)]
pub struct IncidentRepository {
	pool: SqlitePool,
}

impl IncidentRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new incident.
	///
	/// `case_group` is copied into the incident as-is. It should be the
	/// owning case's group as read during authorization.
	#[tracing::instrument(skip(self, new, case_group), fields(case_id = %new.case_id))]
	pub async fn create_incident(
		&self,
		new: &NewIncident,
		case_group: &str,
	) -> Result<Incident, DbError> {
		let id = IncidentId::generate();
		let now = Utc::now();
		let occurred_at = new.occurred_at.unwrap_or(now);

		sqlx::query(
			r#"
			INSERT INTO incidents (
				id, case_id, asset_id, group_name, title, incident_type, description,
				recommendations, source, severity, target_ids, threat_actor_ids, event_ids,
				is_active, is_reported, occurred_at, created_at, archived
			)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 0, ?, ?, 0)
			"#,
		)
		.bind(id.to_string())
		.bind(new.case_id.to_string())
		.bind(new.asset_id.map(|a| a.to_string()))
		.bind(case_group)
		.bind(&new.title)
		.bind(&new.incident_type)
		.bind(&new.description)
		.bind(&new.recommendations)
		.bind(&new.source)
		.bind(new.severity.map(i64::from))
		.bind(serde_json::to_string(&new.target_ids)?)
		.bind(serde_json::to_string(&new.threat_actor_ids)?)
		.bind(serde_json::to_string(&new.event_ids)?)
		.bind(occurred_at.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(incident_id = %id, "incident created");
		Ok(Incident {
			id,
			case_id: Some(new.case_id),
			asset_id: new.asset_id,
			group: Some(case_group.to_string()),
			title: new.title.clone(),
			incident_type: new.incident_type.clone(),
			description: new.description.clone(),
			recommendations: new.recommendations.clone(),
			source: new.source.clone(),
			severity: new.severity,
			target_ids: new.target_ids.clone(),
			threat_actor_ids: new.threat_actor_ids.clone(),
			event_ids: new.event_ids.clone(),
			is_active: true,
			is_reported: false,
			occurred_at,
			created_at: now,
		})
	}

	/// Get a non-archived incident by ID.
	#[tracing::instrument(skip(self), fields(incident_id = %id))]
	pub async fn get_incident(&self, id: &IncidentId) -> Result<Option<Incident>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {INCIDENT_COLUMNS} FROM incidents i WHERE i.id = ? AND i.archived = 0"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_incident(&r)).transpose()
	}

	/// List incidents of every non-archived case owned by one of `groups`.
	#[tracing::instrument(skip(self, groups), fields(groups = %groups))]
	pub async fn list_incident_summaries_for_groups(
		&self,
		groups: &GroupSet,
	) -> Result<Vec<IncidentSummary>, DbError> {
		let mut qb = QueryBuilder::<Sqlite>::new(format!(
			r#"
			SELECT {INCIDENT_COLUMNS}, c.name AS case_name
			FROM incidents i
			JOIN cases c ON c.id = i.case_id AND c.archived = 0
			WHERE i.archived = 0 AND "#
		));
		push_group_filter(&mut qb, "c.group_name", groups);
		qb.push(" ORDER BY i.occurred_at DESC");

		let rows = qb.build().fetch_all(&self.pool).await?;
		rows.iter()
			.map(|r| {
				Ok(IncidentSummary {
					incident: row_to_incident(r)?,
					case_name: r.get("case_name"),
				})
			})
			.collect()
	}

	/// List live incidents of `case_id` that target `asset_id`.
	#[tracing::instrument(skip(self), fields(case_id = %case_id, asset_id = %asset_id))]
	pub async fn list_incidents_targeting(
		&self,
		case_id: &CaseId,
		asset_id: &AssetId,
	) -> Result<Vec<Incident>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {INCIDENT_COLUMNS}
			FROM incidents i
			WHERE i.case_id = ? AND i.archived = 0
			  AND EXISTS (SELECT 1 FROM json_each(i.target_ids) t WHERE t.value = ?)
			ORDER BY i.occurred_at DESC
			"#
		))
		.bind(case_id.to_string())
		.bind(asset_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_incident).collect()
	}

	/// List active incidents on or after `since` in cases owned by `groups`.
	///
	/// When `case_ids` is given, only those cases are considered. IDs of
	/// cases outside `groups` simply match nothing.
	#[tracing::instrument(skip(self, groups, case_ids), fields(groups = %groups))]
	pub async fn list_active_incidents_since(
		&self,
		groups: &GroupSet,
		case_ids: Option<&[CaseId]>,
		since: DateTime<Utc>,
	) -> Result<Vec<Incident>, DbError> {
		let mut qb = QueryBuilder::<Sqlite>::new(format!(
			r#"
			SELECT {INCIDENT_COLUMNS}
			FROM incidents i
			JOIN cases c ON c.id = i.case_id AND c.archived = 0
			WHERE i.archived = 0 AND i.is_active = 1 AND "#
		));
		push_group_filter(&mut qb, "c.group_name", groups);
		// Timestamps are stored as UTC RFC3339 text, which sorts chronologically.
		qb.push(" AND i.occurred_at >= ");
		qb.push_bind(since.to_rfc3339());

		if let Some(ids) = case_ids {
			if ids.is_empty() {
				return Ok(Vec::new());
			}
			qb.push(" AND c.id IN (");
			let mut separated = qb.separated(", ");
			for id in ids {
				separated.push_bind(id.to_string());
			}
			separated.push_unseparated(")");
		}

		qb.push(" ORDER BY i.occurred_at ASC");

		let rows = qb.build().fetch_all(&self.pool).await?;
		rows.iter().map(row_to_incident).collect()
	}

	/// Archive (soft-delete) an incident.
	#[tracing::instrument(skip(self), fields(incident_id = %id))]
	pub async fn archive_incident(&self, id: &IncidentId) -> Result<bool, DbError> {
		let result = sqlx::query("UPDATE incidents SET archived = 1 WHERE id = ? AND archived = 0")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		tracing::debug!(incident_id = %id, "incident archived");
		Ok(result.rows_affected() > 0)
	}
}

fn row_to_incident(row: &sqlx::sqlite::SqliteRow) -> Result<Incident, DbError> {
	let id: String = row.get("id");
	let case_id: Option<String> = row.get("case_id");
	let asset_id: Option<String> = row.get("asset_id");
	let severity: Option<i64> = row.get("severity");
	let target_ids: String = row.get("target_ids");
	let threat_actor_ids: String = row.get("threat_actor_ids");
	let event_ids: String = row.get("event_ids");
	let is_active: i32 = row.get("is_active");
	let is_reported: i32 = row.get("is_reported");
	let occurred_at: String = row.get("occurred_at");
	let created_at: String = row.get("created_at");

	Ok(Incident {
		id: parse_id(&id, "incident")?,
		case_id: parse_opt_id(case_id, "case")?,
		asset_id: parse_opt_id(asset_id, "asset")?,
		group: row.get("group_name"),
		title: row.get("title"),
		incident_type: row.get("incident_type"),
		description: row.get("description"),
		recommendations: row.get("recommendations"),
		source: row.get("source"),
		severity: severity.and_then(|s| u8::try_from(s).ok()),
		target_ids: parse_json(&target_ids)?,
		threat_actor_ids: parse_json(&threat_actor_ids)?,
		event_ids: parse_json(&event_ids)?,
		is_active: is_active != 0,
		is_reported: is_reported != 0,
		occurred_at: parse_timestamp(&occurred_at, "occurred_at")?,
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}
