// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Asset repository.
//!
//! Assets carry no group of their own. Reads that take a [`GroupSet`] join
//! through the owning case; the others assume the caller already passed the
//! access guard for this asset.

use chrono::Utc;
use fyeo_server_auth::{AssetId, CaseId, GroupSet};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::error::DbError;
use crate::row::{parse_id, parse_json, parse_opt_id, parse_timestamp, push_group_filter};
use crate::types::{Asset, AssetSummary, AssetUpdate, NewAsset};

const ASSET_COLUMNS: &str = "a.id, a.case_id, a.asset_type, a.name, a.urls, a.ips, a.is_threat_actor, a.whois, a.created_at, a.updated_at";

/// Live incidents in the asset's own case that target it.
const INCIDENT_COUNT: &str = r#"
	(SELECT COUNT(*) FROM incidents i, json_each(i.target_ids) t
	 WHERE t.value = a.id AND i.case_id = a.case_id AND i.archived = 0) AS incident_count
"#;

#[derive(Clone)]
pub struct AssetRepository {
	pool: SqlitePool,
}

impl AssetRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, new), fields(case_id = %new.case_id))]
	pub async fn create_asset(&self, new: &NewAsset) -> Result<Asset, DbError> {
		let id = AssetId::generate();
		let now = Utc::now();
		let whois = new.whois.as_ref().map(serde_json::to_string).transpose()?;

		sqlx::query(
			r#"
			INSERT INTO assets (id, case_id, asset_type, name, urls, ips, is_threat_actor, whois, created_at, updated_at, archived)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
			"#,
		)
		.bind(id.to_string())
		.bind(new.case_id.to_string())
		.bind(new.asset_type.as_str())
		.bind(serde_json::to_string(&new.name)?)
		.bind(serde_json::to_string(&new.urls)?)
		.bind(serde_json::to_string(&new.ips)?)
		.bind(new.is_threat_actor as i32)
		.bind(whois)
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(asset_id = %id, "asset created");
		Ok(Asset {
			id,
			case_id: Some(new.case_id),
			asset_type: new.asset_type,
			name: new.name.clone(),
			urls: new.urls.clone(),
			ips: new.ips.clone(),
			is_threat_actor: new.is_threat_actor,
			whois: new.whois.clone(),
			created_at: now,
			updated_at: now,
		})
	}

	/// Get a non-archived asset by ID.
	#[tracing::instrument(skip(self), fields(asset_id = %id))]
	pub async fn get_asset(&self, id: &AssetId) -> Result<Option<Asset>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {ASSET_COLUMNS} FROM assets a WHERE a.id = ? AND a.archived = 0"
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_asset(&r)).transpose()
	}

	/// Get a non-archived asset with its case name and incident count.
	///
	/// `None` if the asset or its case is archived.
	#[tracing::instrument(skip(self), fields(asset_id = %id))]
	pub async fn get_asset_summary(&self, id: &AssetId) -> Result<Option<AssetSummary>, DbError> {
		let row = sqlx::query(&format!(
			r#"
			SELECT {ASSET_COLUMNS}, c.name AS case_name, {INCIDENT_COUNT}
			FROM assets a
			JOIN cases c ON c.id = a.case_id AND c.archived = 0
			WHERE a.id = ? AND a.archived = 0
			"#
		))
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_summary(&r)).transpose()
	}

	/// List the non-archived assets of a case.
	#[tracing::instrument(skip(self), fields(case_id = %case_id))]
	pub async fn list_assets_for_case(&self, case_id: &CaseId) -> Result<Vec<Asset>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {ASSET_COLUMNS} FROM assets a
			WHERE a.case_id = ? AND a.archived = 0
			ORDER BY a.created_at ASC
			"#
		))
		.bind(case_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_asset).collect()
	}

	/// List assets of every non-archived case owned by one of `groups`.
	#[tracing::instrument(skip(self, groups), fields(groups = %groups))]
	pub async fn list_asset_summaries_for_groups(
		&self,
		groups: &GroupSet,
	) -> Result<Vec<AssetSummary>, DbError> {
		let mut qb = QueryBuilder::<Sqlite>::new(format!(
			r#"
			SELECT {ASSET_COLUMNS}, c.name AS case_name, {INCIDENT_COUNT}
			FROM assets a
			JOIN cases c ON c.id = a.case_id AND c.archived = 0
			WHERE a.archived = 0 AND "#
		));
		push_group_filter(&mut qb, "c.group_name", groups);
		qb.push(" ORDER BY a.created_at ASC");

		let rows = qb.build().fetch_all(&self.pool).await?;
		rows.iter().map(row_to_summary).collect()
	}

	/// Fetch the non-archived assets of `case_id` whose IDs are in `ids`.
	///
	/// IDs belonging to other cases are dropped.
	#[tracing::instrument(skip(self, ids), fields(case_id = %case_id, count = ids.len()))]
	pub async fn list_assets_by_ids(
		&self,
		case_id: &CaseId,
		ids: &[AssetId],
	) -> Result<Vec<Asset>, DbError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let mut qb = QueryBuilder::<Sqlite>::new(format!(
			"SELECT {ASSET_COLUMNS} FROM assets a WHERE a.archived = 0 AND a.case_id = "
		));
		qb.push_bind(case_id.to_string());
		qb.push(" AND a.id IN (");
		let mut separated = qb.separated(", ");
		for id in ids {
			separated.push_bind(id.to_string());
		}
		separated.push_unseparated(") ORDER BY a.created_at ASC");

		let rows = qb.build().fetch_all(&self.pool).await?;
		rows.iter().map(row_to_asset).collect()
	}

	/// Apply a partial update to a non-archived asset.
	#[tracing::instrument(skip(self, update), fields(asset_id = %id))]
	pub async fn update_asset(
		&self,
		id: &AssetId,
		update: &AssetUpdate,
	) -> Result<Option<Asset>, DbError> {
		let Some(mut asset) = self.get_asset(id).await? else {
			return Ok(None);
		};

		if let Some(case_id) = update.case_id {
			asset.case_id = Some(case_id);
		}
		if let Some(name) = &update.name {
			asset.name = name.clone();
		}
		if let Some(urls) = &update.urls {
			asset.urls = urls.clone();
		}
		if let Some(ips) = &update.ips {
			asset.ips = ips.clone();
		}
		if let Some(flag) = update.is_threat_actor {
			asset.is_threat_actor = flag;
		}
		if let Some(whois) = &update.whois {
			asset.whois = Some(whois.clone());
		}
		asset.updated_at = Utc::now();

		let whois = asset.whois.as_ref().map(serde_json::to_string).transpose()?;
		sqlx::query(
			r#"
			UPDATE assets
			SET case_id = ?, name = ?, urls = ?, ips = ?, is_threat_actor = ?, whois = ?, updated_at = ?
			WHERE id = ? AND archived = 0
			"#,
		)
		.bind(asset.case_id.map(|c| c.to_string()))
		.bind(serde_json::to_string(&asset.name)?)
		.bind(serde_json::to_string(&asset.urls)?)
		.bind(serde_json::to_string(&asset.ips)?)
		.bind(asset.is_threat_actor as i32)
		.bind(whois)
		.bind(asset.updated_at.to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		tracing::debug!(asset_id = %id, "asset updated");
		Ok(Some(asset))
	}

	/// Archive (soft-delete) an asset.
	#[tracing::instrument(skip(self), fields(asset_id = %id))]
	pub async fn archive_asset(&self, id: &AssetId) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE assets
			SET archived = 1, updated_at = ?
			WHERE id = ? AND archived = 0
			"#,
		)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		tracing::debug!(asset_id = %id, "asset archived");
		Ok(result.rows_affected() > 0)
	}
}

fn row_to_asset(row: &sqlx::sqlite::SqliteRow) -> Result<Asset, DbError> {
	let id: String = row.get("id");
	let case_id: Option<String> = row.get("case_id");
	let asset_type: String = row.get("asset_type");
	let name: String = row.get("name");
	let urls: String = row.get("urls");
	let ips: String = row.get("ips");
	let is_threat_actor: i32 = row.get("is_threat_actor");
	let whois: Option<String> = row.get("whois");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Asset {
		id: parse_id(&id, "asset")?,
		case_id: parse_opt_id(case_id, "case")?,
		asset_type: asset_type.parse()?,
		name: parse_json(&name)?,
		urls: parse_json(&urls)?,
		ips: parse_json(&ips)?,
		is_threat_actor: is_threat_actor != 0,
		whois: whois.as_deref().map(parse_json).transpose()?,
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}

fn row_to_summary(row: &sqlx::sqlite::SqliteRow) -> Result<AssetSummary, DbError> {
	Ok(AssetSummary {
		asset: row_to_asset(row)?,
		case_name: row.get("case_name"),
		incident_count: row.get("incident_count"),
	})
}
