// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event repository.

use chrono::Utc;
use fyeo_server_auth::{CaseId, EventId};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::error::DbError;
use crate::row::{parse_id, parse_opt_id, parse_timestamp};
use crate::types::{Event, EventUpdate, NewEvent};

const EVENT_COLUMNS: &str = "id, case_id, asset_id, incident_id, url, title, source_type, site, threat_level, confidence_score, created_at";

#[derive(Clone)]
pub struct EventRepository {
	pool: SqlitePool,
}

impl EventRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, new), fields(case_id = %new.case_id))]
	pub async fn create_event(&self, new: &NewEvent) -> Result<Event, DbError> {
		let id = EventId::generate();
		let now = Utc::now();

		sqlx::query(
			r#"
			INSERT INTO events (id, case_id, asset_id, incident_id, url, title, source_type, site, threat_level, confidence_score, created_at, archived)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
			"#,
		)
		.bind(id.to_string())
		.bind(new.case_id.to_string())
		.bind(new.asset_id.map(|a| a.to_string()))
		.bind(new.incident_id.map(|i| i.to_string()))
		.bind(&new.url)
		.bind(&new.title)
		.bind(&new.source_type)
		.bind(&new.site)
		.bind(new.threat_level)
		.bind(new.confidence_score)
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(event_id = %id, "event created");
		Ok(Event {
			id,
			case_id: Some(new.case_id),
			asset_id: new.asset_id,
			incident_id: new.incident_id,
			url: new.url.clone(),
			title: new.title.clone(),
			source_type: new.source_type.clone(),
			site: new.site.clone(),
			threat_level: new.threat_level,
			confidence_score: new.confidence_score,
			created_at: now,
		})
	}

	/// Get a non-archived event by ID.
	#[tracing::instrument(skip(self), fields(event_id = %id))]
	pub async fn get_event(&self, id: &EventId) -> Result<Option<Event>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {EVENT_COLUMNS} FROM events WHERE id = ? AND archived = 0"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_event(&r)).transpose()
	}

	/// Fetch the non-archived events of `case_id` whose IDs are in `ids`.
	///
	/// IDs belonging to other cases are dropped.
	#[tracing::instrument(skip(self, ids), fields(case_id = %case_id, count = ids.len()))]
	pub async fn list_events_by_ids(
		&self,
		case_id: &CaseId,
		ids: &[EventId],
	) -> Result<Vec<Event>, DbError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let mut qb = QueryBuilder::<Sqlite>::new(format!(
			"SELECT {EVENT_COLUMNS} FROM events WHERE archived = 0 AND case_id = "
		));
		qb.push_bind(case_id.to_string());
		qb.push(" AND id IN (");
		let mut separated = qb.separated(", ");
		for id in ids {
			separated.push_bind(id.to_string());
		}
		separated.push_unseparated(") ORDER BY created_at ASC");

		let rows = qb.build().fetch_all(&self.pool).await?;
		rows.iter().map(row_to_event).collect()
	}

	/// Apply a partial update. Setting `case_id` moves the event.
	#[tracing::instrument(skip(self, update), fields(event_id = %id))]
	pub async fn update_event(
		&self,
		id: &EventId,
		update: &EventUpdate,
	) -> Result<Option<Event>, DbError> {
		let Some(mut event) = self.get_event(id).await? else {
			return Ok(None);
		};

		if let Some(case_id) = update.case_id {
			event.case_id = Some(case_id);
		}
		if let Some(asset_id) = update.asset_id {
			event.asset_id = Some(asset_id);
		}
		if let Some(incident_id) = update.incident_id {
			event.incident_id = Some(incident_id);
		}
		if let Some(title) = &update.title {
			event.title = title.clone();
		}
		if let Some(level) = update.threat_level {
			event.threat_level = Some(level);
		}
		if let Some(score) = update.confidence_score {
			event.confidence_score = Some(score);
		}

		sqlx::query(
			r#"
			UPDATE events
			SET case_id = ?, asset_id = ?, incident_id = ?, title = ?, threat_level = ?, confidence_score = ?
			WHERE id = ? AND archived = 0
			"#,
		)
		.bind(event.case_id.map(|c| c.to_string()))
		.bind(event.asset_id.map(|a| a.to_string()))
		.bind(event.incident_id.map(|i| i.to_string()))
		.bind(&event.title)
		.bind(event.threat_level)
		.bind(event.confidence_score)
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		tracing::debug!(event_id = %id, "event updated");
		Ok(Some(event))
	}

	#[tracing::instrument(skip(self), fields(event_id = %id))]
	pub async fn archive_event(&self, id: &EventId) -> Result<bool, DbError> {
		let result = sqlx::query("UPDATE events SET archived = 1 WHERE id = ? AND archived = 0")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		tracing::debug!(event_id = %id, "event archived");
		Ok(result.rows_affected() > 0)
	}
}

fn row_to_event(row: &sqlx::sqlite::SqliteRow) -> Result<Event, DbError> {
	let id: String = row.get("id");
	let created_at: String = row.get("created_at");

	Ok(Event {
		id: parse_id(&id, "event")?,
		case_id: parse_opt_id(row.get("case_id"), "case")?,
		asset_id: parse_opt_id(row.get("asset_id"), "asset")?,
		incident_id: parse_opt_id(row.get("incident_id"), "incident")?,
		url: row.get("url"),
		title: row.get("title"),
		source_type: row.get("source_type"),
		site: row.get("site"),
		threat_level: row.get("threat_level"),
		confidence_score: row.get("confidence_score"),
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}
