// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column decoding helpers and shared query fragments.

use chrono::{DateTime, Utc};
use fyeo_server_auth::GroupSet;
use serde::de::DeserializeOwned;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn parse_id<T: From<Uuid>>(value: &str, what: &str) -> Result<T, DbError> {
	Uuid::parse_str(value)
		.map(T::from)
		.map_err(|e| DbError::Internal(format!("Invalid {what} ID: {e}")))
}

pub(crate) fn parse_opt_id<T: From<Uuid>>(
	value: Option<String>,
	what: &str,
) -> Result<Option<T>, DbError> {
	value.map(|v| parse_id(&v, what)).transpose()
}

pub(crate) fn parse_timestamp(value: &str, what: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {what}: {e}")))
}

pub(crate) fn parse_json<T: DeserializeOwned>(value: &str) -> Result<T, DbError> {
	Ok(serde_json::from_str(value)?)
}

/// Appends `<column> IN (?, ?, ...)` bound to every group in `groups`.
///
/// An empty set appends a predicate that matches nothing.
pub(crate) fn push_group_filter(qb: &mut QueryBuilder<'_, Sqlite>, column: &str, groups: &GroupSet) {
	if groups.is_empty() {
		qb.push("0");
		return;
	}

	qb.push(column);
	qb.push(" IN (");
	let mut separated = qb.separated(", ");
	for group in groups.iter() {
		separated.push_bind(group.to_string());
	}
	separated.push_unseparated(")");
}
