// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_asset_authorization() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let case_a_id = f.case_a.case.id.to_string();
	let case_b_id = f.case_b.case.id.to_string();
	let asset_a_id = f.case_a.asset.id.to_string();
	let asset_b_id = f.case_b.asset.id.to_string();

	let cases = vec![
		AuthzCase {
			name: "member_can_get_asset",
			method: Method::GET,
			path: format!("/api/assets/{asset_a_id}"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_group_cannot_get_asset",
			method: Method::GET,
			path: format!("/api/assets/{asset_a_id}"),
			user: Some(f.user_b.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_can_list_asset_incidents",
			method: Method::GET,
			path: format!("/api/assets/{asset_a_id}/incidents"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_group_cannot_list_asset_incidents",
			method: Method::GET,
			path: format!("/api/assets/{asset_b_id}/incidents"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_can_create_asset_in_own_case",
			method: Method::POST,
			path: "/api/assets".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({
				"case_id": case_a_id,
				"asset_type": "person",
				"name": {"first": "Jane", "last": "Doe"}
			})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "member_cannot_create_asset_in_foreign_case",
			method: Method::POST,
			path: "/api/assets".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({"case_id": case_b_id, "asset_type": "domain"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_can_update_asset",
			method: Method::PATCH,
			path: format!("/api/assets/{asset_a_id}"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"urls": ["https://teamA.example.org"]})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member_cannot_move_asset_into_foreign_case",
			method: Method::PATCH,
			path: format!("/api/assets/{asset_a_id}"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"case_id": case_b_id})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_cannot_pull_foreign_asset_into_own_case",
			method: Method::PATCH,
			path: format!("/api/assets/{asset_b_id}"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"case_id": case_a_id})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other_group_cannot_delete_asset",
			method: Method::DELETE,
			path: format!("/api/assets/{asset_a_id}"),
			user: Some(f.user_b.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "no_groups_cannot_get_asset",
			method: Method::GET,
			path: format!("/api/assets/{asset_a_id}"),
			user: Some(f.no_groups.clone()),
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_asset_summary_includes_case_name_and_count() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.get(&format!("/api/assets/{}", f.case_a.asset.id), Some(&f.user_a))
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	assert_eq!(body["case_name"], f.case_a.case.name.as_str());
	// The fixture incident plus the stale-group incident both target it.
	assert_eq!(body["incident_count"], 2);
}

#[tokio::test]
async fn test_member_of_both_groups_can_move_asset() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/assets/{}", f.case_a.asset.id);

	let response = app
		.patch(
			&path,
			Some(&f.user_ab),
			json!({"case_id": f.case_b.case.id.to_string()}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	assert_eq!(
		app.get(&path, Some(&f.user_a)).await.status(),
		StatusCode::FORBIDDEN
	);
	assert_eq!(app.get(&path, Some(&f.user_b)).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_deleted_asset_is_forbidden() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/assets/{}", f.case_a.asset.id);

	assert_eq!(
		app.delete(&path, Some(&f.user_a)).await.status(),
		StatusCode::NO_CONTENT
	);
	let response = app.get(&path, Some(&f.user_a)).await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	assert_eq!(
		body_json(response).await["message"],
		"group mismatch or case not found"
	);
}
