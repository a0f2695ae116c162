// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Case repository.
//!
//! Cases are the only resources that own a group. Group-scoped reads filter
//! by `group_name IN (...)` inside the query itself.

use chrono::Utc;
use fyeo_server_auth::{CaseId, GroupSet};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::error::DbError;
use crate::row::{parse_id, parse_json, parse_timestamp, push_group_filter};
use crate::types::{Case, CaseUpdate, NewCase};

const CASE_COLUMNS: &str = "id, name, case_type, group_name, emails, alert_level, should_notify, created_at, updated_at";

/// Repository for case database operations.
#[derive(Clone)]
pub struct CaseRepository {
	pool: SqlitePool,
}

impl CaseRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new case.
	///
	/// The caller must already have authorized `new.group`.
	#[tracing::instrument(skip(self, new), fields(group = %new.group))]
	pub async fn create_case(&self, new: &NewCase) -> Result<Case, DbError> {
		let id = CaseId::generate();
		let now = Utc::now();
		sqlx::query(
			r#"
			INSERT INTO cases (id, name, case_type, group_name, emails, alert_level, should_notify, created_at, updated_at, archived)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
			"#,
		)
		.bind(id.to_string())
		.bind(&new.name)
		.bind(&new.case_type)
		.bind(&new.group)
		.bind(serde_json::to_string(&new.emails)?)
		.bind(new.alert_level.as_str())
		.bind(new.should_notify as i32)
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(case_id = %id, "case created");
		Ok(Case {
			id,
			name: new.name.clone(),
			case_type: new.case_type.clone(),
			group: new.group.clone(),
			emails: new.emails.clone(),
			alert_level: new.alert_level,
			should_notify: new.should_notify,
			created_at: now,
			updated_at: now,
		})
	}

	/// Get a non-archived case by ID, restricted to `groups`.
	///
	/// # Returns
	/// `None` if the case does not exist, is archived, or belongs to a group
	/// outside `groups`. The three cases are indistinguishable.
	#[tracing::instrument(skip(self, groups), fields(case_id = %id))]
	pub async fn get_case(&self, id: &CaseId, groups: &GroupSet) -> Result<Option<Case>, DbError> {
		let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {CASE_COLUMNS} FROM cases WHERE id = "));
		qb.push_bind(id.to_string());
		qb.push(" AND archived = 0 AND ");
		push_group_filter(&mut qb, "group_name", groups);

		let row = qb.build().fetch_optional(&self.pool).await?;
		row.map(|r| row_to_case(&r)).transpose()
	}

	/// Get a non-archived case by ID regardless of group.
	///
	/// Only for use after the caller has been authorized against this case.
	#[tracing::instrument(skip(self), fields(case_id = %id))]
	pub async fn get_authorized_case(&self, id: &CaseId) -> Result<Option<Case>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {CASE_COLUMNS} FROM cases WHERE id = ? AND archived = 0"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_case(&r)).transpose()
	}

	/// List every non-archived case owned by one of `groups`.
	#[tracing::instrument(skip(self, groups), fields(groups = %groups))]
	pub async fn list_cases_for_groups(&self, groups: &GroupSet) -> Result<Vec<Case>, DbError> {
		let mut qb = QueryBuilder::<Sqlite>::new(format!(
			"SELECT {CASE_COLUMNS} FROM cases WHERE archived = 0 AND "
		));
		push_group_filter(&mut qb, "group_name", groups);
		qb.push(" ORDER BY created_at ASC");

		let rows = qb.build().fetch_all(&self.pool).await?;
		rows.iter().map(row_to_case).collect()
	}

	/// Apply a partial update to a non-archived case.
	///
	/// Authorization, including for a new `group`, is the caller's job.
	///
	/// # Returns
	/// The updated case, or `None` if it is missing or archived.
	#[tracing::instrument(skip(self, update), fields(case_id = %id))]
	pub async fn update_case(&self, id: &CaseId, update: &CaseUpdate) -> Result<Option<Case>, DbError> {
		let Some(mut case) = self.get_authorized_case(id).await? else {
			return Ok(None);
		};

		if let Some(name) = &update.name {
			case.name = name.clone();
		}
		if let Some(emails) = &update.emails {
			case.emails = emails.clone();
		}
		if let Some(level) = update.alert_level {
			case.alert_level = level;
		}
		if let Some(notify) = update.should_notify {
			case.should_notify = notify;
		}
		if let Some(group) = &update.group {
			case.group = group.clone();
		}
		case.updated_at = Utc::now();

		sqlx::query(
			r#"
			UPDATE cases
			SET name = ?, emails = ?, alert_level = ?, should_notify = ?, group_name = ?, updated_at = ?
			WHERE id = ? AND archived = 0
			"#,
		)
		.bind(&case.name)
		.bind(serde_json::to_string(&case.emails)?)
		.bind(case.alert_level.as_str())
		.bind(case.should_notify as i32)
		.bind(&case.group)
		.bind(case.updated_at.to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		tracing::debug!(case_id = %id, "case updated");
		Ok(Some(case))
	}

	/// Archive (soft-delete) a case.
	///
	/// # Returns
	/// `true` if a non-archived case was archived.
	#[tracing::instrument(skip(self), fields(case_id = %id))]
	pub async fn archive_case(&self, id: &CaseId) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE cases
			SET archived = 1, updated_at = ?
			WHERE id = ? AND archived = 0
			"#,
		)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		tracing::debug!(case_id = %id, "case archived");
		Ok(result.rows_affected() > 0)
	}
}

fn row_to_case(row: &sqlx::sqlite::SqliteRow) -> Result<Case, DbError> {
	let id: String = row.get("id");
	let emails: String = row.get("emails");
	let alert_level: String = row.get("alert_level");
	let should_notify: i32 = row.get("should_notify");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Case {
		id: parse_id(&id, "case")?,
		name: row.get("name"),
		case_type: row.get("case_type"),
		group: row.get("group_name"),
		emails: parse_json(&emails)?,
		alert_level: alert_level.parse()?,
		should_notify: should_notify != 0,
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}
