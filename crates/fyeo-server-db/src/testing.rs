// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fixtures for tests in this crate and in the server's integration tests.

use fyeo_server_auth::{AssetId, CaseId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::asset::AssetRepository;
use crate::case::CaseRepository;
use crate::types::{Asset, AssetName, AssetType, Case, NewAsset, NewCase};

/// In-memory pool with the full schema applied.
///
/// Limited to one connection: every `:memory:` connection is its own database.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str(":memory:")
		.unwrap()
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await
		.expect("Failed to create test pool");

	crate::pool::run_migrations(&pool)
		.await
		.expect("Failed to run migrations");

	pool
}

pub fn new_case(name: &str, group: &str) -> NewCase {
	NewCase {
		name: name.to_string(),
		case_type: "brand".to_string(),
		group: group.to_string(),
		emails: vec![format!("{name}@example.com")],
		alert_level: Default::default(),
		should_notify: false,
	}
}

pub async fn insert_case(pool: &SqlitePool, name: &str, group: &str) -> Case {
	CaseRepository::new(pool.clone())
		.create_case(&new_case(name, group))
		.await
		.unwrap()
}

pub fn new_asset(case_id: CaseId, common_name: &str) -> NewAsset {
	NewAsset {
		case_id,
		asset_type: AssetType::Domain,
		name: AssetName {
			common: Some(common_name.to_string()),
			..Default::default()
		},
		urls: vec![format!("https://{common_name}")],
		ips: vec![],
		is_threat_actor: false,
		whois: None,
	}
}

pub async fn insert_asset(pool: &SqlitePool, case_id: CaseId, common_name: &str) -> Asset {
	AssetRepository::new(pool.clone())
		.create_asset(&new_asset(case_id, common_name))
		.await
		.unwrap()
}

/// Marks a row archived without going through a repository.
pub async fn archive_row(pool: &SqlitePool, table: &str, id: &str) {
	sqlx::query(&format!("UPDATE {table} SET archived = 1 WHERE id = ?"))
		.bind(id)
		.execute(pool)
		.await
		.unwrap();
}

/// Inserts an asset row that references no case at all.
pub async fn insert_orphan_asset(pool: &SqlitePool) -> AssetId {
	let id = AssetId::generate();
	let now = chrono::Utc::now().to_rfc3339();
	sqlx::query(
		r#"
		INSERT INTO assets (id, case_id, asset_type, created_at, updated_at)
		VALUES (?, NULL, 'domain', ?, ?)
		"#,
	)
	.bind(id.to_string())
	.bind(&now)
	.bind(&now)
	.execute(pool)
	.await
	.unwrap();
	id
}
