// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed lookups for the access guard.
//!
//! Both lookups read the narrow `{id, group, case_id, archived}` projection
//! and nothing else.

use async_trait::async_trait;
use fyeo_server_auth::{
	CaseId, CaseLookup, GroupSet, LookupError, ResourceKind, ResourceLookup, ResourceScope,
};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use crate::error::DbError;
use crate::row::{parse_opt_id, push_group_filter};

#[derive(Clone)]
pub struct ScopeRepository {
	pool: SqlitePool,
}

impl ScopeRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Single read filtered by id, group membership and archival.
	#[tracing::instrument(skip(self, groups), fields(case_id = %case_id))]
	async fn find_case_scope(
		&self,
		case_id: &CaseId,
		groups: &GroupSet,
	) -> Result<Option<ResourceScope>, DbError> {
		let mut qb = QueryBuilder::<Sqlite>::new("SELECT group_name FROM cases WHERE id = ");
		qb.push_bind(case_id.to_string());
		qb.push(" AND archived = 0 AND ");
		push_group_filter(&mut qb, "group_name", groups);

		let row = qb.build().fetch_optional(&self.pool).await?;
		Ok(row.map(|r| ResourceScope::case(*case_id, r.get::<String, _>("group_name"))))
	}

	#[tracing::instrument(skip(self), fields(kind = %kind, id = %id))]
	async fn find_child_scope(
		&self,
		kind: ResourceKind,
		id: &Uuid,
	) -> Result<Option<ResourceScope>, DbError> {
		// Only incidents keep a group copy. It is projected for completeness and
		// never consulted by the guard.
		let group_column = match kind {
			ResourceKind::Incident => "group_name",
			_ => "NULL AS group_name",
		};
		let sql = format!(
			"SELECT case_id, {group_column} FROM {} WHERE id = ? AND archived = 0",
			kind.collection()
		);

		let row = sqlx::query(&sql)
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		let Some(row) = row else {
			return Ok(None);
		};

		let case_id = parse_opt_id::<CaseId>(row.get("case_id"), "case")?;
		let group: Option<String> = row.get("group_name");
		let scope = ResourceScope::child(kind, *id, case_id);
		Ok(Some(match group {
			Some(group) => scope.with_group(group),
			None => scope,
		}))
	}
}

fn upstream(e: DbError) -> LookupError {
	tracing::warn!(error = %e, "scope lookup failed");
	LookupError::Upstream(e.to_string())
}

#[async_trait]
impl CaseLookup for ScopeRepository {
	async fn find_case(
		&self,
		case_id: &CaseId,
		groups: &GroupSet,
	) -> Result<ResourceScope, LookupError> {
		self.find_case_scope(case_id, groups)
			.await
			.map_err(upstream)?
			.ok_or(LookupError::NotFound)
	}
}

#[async_trait]
impl ResourceLookup for ScopeRepository {
	async fn find_scope(&self, kind: ResourceKind, id: &Uuid) -> Result<ResourceScope, LookupError> {
		// A case is its own scope root; the group-filtered case lookup decides.
		if kind.owns_group() {
			return Ok(ResourceScope::child(kind, *id, Some(CaseId::new(*id))));
		}

		self.find_child_scope(kind, id)
			.await
			.map_err(upstream)?
			.ok_or(LookupError::NotFound)
	}
}
