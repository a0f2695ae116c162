// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_case_authorization() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let case_a_id = f.case_a.case.id.to_string();
	let case_b_id = f.case_b.case.id.to_string();
	let archived_id = f.archived_case.id.to_string();

	let cases = vec![
		AuthzCase {
			name: "member_can_get_own_case",
			method: Method::GET,
			path: format!("/api/cases/{case_a_id}"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_group_cannot_get_case",
			method: Method::GET,
			path: format!("/api/cases/{case_a_id}"),
			user: Some(f.user_b.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "multi_group_member_can_get_both_cases",
			method: Method::GET,
			path: format!("/api/cases/{case_b_id}"),
			user: Some(f.user_ab.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "archived_case_is_forbidden",
			method: Method::GET,
			path: format!("/api/cases/{archived_id}"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unknown_case_is_forbidden",
			method: Method::GET,
			path: format!("/api/cases/{}", uuid::Uuid::new_v4()),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "malformed_case_id_is_bad_request",
			method: Method::GET,
			path: "/api/cases/not-a-uuid".to_string(),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "no_claims_is_unauthorized",
			method: Method::GET,
			path: format!("/api/cases/{case_a_id}"),
			user: Some(f.no_claims.clone()),
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "anonymous_is_unauthorized",
			method: Method::GET,
			path: format!("/api/cases/{case_a_id}"),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "member_can_list_case_assets",
			method: Method::GET,
			path: format!("/api/cases/{case_a_id}/assets"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_group_cannot_list_case_assets",
			method: Method::GET,
			path: format!("/api/cases/{case_a_id}/assets"),
			user: Some(f.user_b.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_can_create_case_in_own_group",
			method: Method::POST,
			path: "/api/cases".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({"name": "New engagement", "case_type": "vip", "group": "teamA"})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "member_cannot_create_case_in_other_group",
			method: Method::POST,
			path: "/api/cases".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({"name": "Sneaky", "case_type": "vip", "group": "teamB"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "create_case_without_group_is_bad_request",
			method: Method::POST,
			path: "/api/cases".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({"name": "No group", "case_type": "vip"})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "member_can_update_own_case",
			method: Method::PATCH,
			path: format!("/api/cases/{case_a_id}"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"name": "Acme monitoring (renamed)", "should_notify": true})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_group_cannot_update_case",
			method: Method::PATCH,
			path: format!("/api/cases/{case_a_id}"),
			user: Some(f.user_b.clone()),
			body: Some(json!({"name": "Hijacked"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_cannot_move_case_to_foreign_group",
			method: Method::PATCH,
			path: format!("/api/cases/{case_a_id}"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"group": "teamB"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other_group_cannot_delete_case",
			method: Method::DELETE,
			path: format!("/api/cases/{case_b_id}"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_denials_are_indistinguishable() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let foreign = app
		.get(&format!("/api/cases/{}", f.case_b.case.id), Some(&f.user_a))
		.await;
	let missing = app
		.get(&format!("/api/cases/{}", uuid::Uuid::new_v4()), Some(&f.user_a))
		.await;
	let archived = app
		.get(&format!("/api/cases/{}", f.archived_case.id), Some(&f.user_a))
		.await;

	assert_eq!(foreign.status(), StatusCode::FORBIDDEN);
	assert_eq!(missing.status(), StatusCode::FORBIDDEN);
	assert_eq!(archived.status(), StatusCode::FORBIDDEN);

	let foreign = body_json(foreign).await;
	assert_eq!(foreign, body_json(missing).await);
	assert_eq!(foreign, body_json(archived).await);
	assert_eq!(foreign["error"], "forbidden");
	assert_eq!(foreign["message"], "group mismatch or case not found");
}

#[tokio::test]
async fn test_member_of_both_groups_can_move_case() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/cases/{}", f.case_a.case.id);

	let response = app
		.patch(&path, Some(&f.user_ab), json!({"group": "teamB"}))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await["group"], "teamB");

	// The original owners lose access immediately.
	let response = app.get(&path, Some(&f.user_a)).await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	let response = app.get(&path, Some(&f.user_b)).await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_archived_case_hides_children() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.delete(&format!("/api/cases/{}", f.case_a.case.id), Some(&f.user_a))
		.await;
	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	for path in [
		format!("/api/cases/{}", f.case_a.case.id),
		format!("/api/assets/{}", f.case_a.asset.id),
		format!("/api/incidents/{}", f.case_a.incident.id),
		format!("/api/events/{}", f.case_a.event.id),
	] {
		let response = app.get(&path, Some(&f.user_a)).await;
		assert_eq!(response.status(), StatusCode::FORBIDDEN, "{path}");
	}

	let response = app
		.delete(&format!("/api/cases/{}", f.case_a.case.id), Some(&f.user_a))
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_denied_write_changes_nothing() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.patch(
			&format!("/api/cases/{}", f.case_a.case.id),
			Some(&f.user_b),
			json!({"name": "Hijacked"}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let stored = app
		.state
		.cases
		.get_authorized_case(&f.case_a.case.id)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(stored.name, f.case_a.case.name);
}
