// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_event_authorization() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let case_a_id = f.case_a.case.id.to_string();
	let case_b_id = f.case_b.case.id.to_string();
	let event_a_id = f.case_a.event.id.to_string();
	let event_b_id = f.case_b.event.id.to_string();

	let cases = vec![
		AuthzCase {
			name: "member_can_get_event",
			method: Method::GET,
			path: format!("/api/events/{event_a_id}"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_group_cannot_get_event",
			method: Method::GET,
			path: format!("/api/events/{event_b_id}"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_can_record_event",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({
				"case_id": case_a_id,
				"url": "https://forum.example.net/thread/1",
				"source_type": "forum",
				"threat_level": 2
			})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "member_cannot_record_event_in_foreign_case",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({"case_id": case_b_id, "url": "https://x.example"})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "event_cannot_link_foreign_incident",
			method: Method::POST,
			path: "/api/events".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({
				"case_id": case_a_id,
				"url": "https://x.example",
				"incident_id": f.case_b.incident.id.to_string()
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "member_can_update_event",
			method: Method::PATCH,
			path: format!("/api/events/{event_a_id}"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"title": "Confirmed dump", "confidence_score": 0.95})),
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "member_cannot_move_event_into_foreign_case",
			method: Method::PATCH,
			path: format!("/api/events/{event_a_id}"),
			user: Some(f.user_a.clone()),
			body: Some(json!({"case_id": case_b_id})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "other_group_cannot_delete_event",
			method: Method::DELETE,
			path: format!("/api/events/{event_a_id}"),
			user: Some(f.user_b.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_can_delete_event",
			method: Method::DELETE,
			path: format!("/api/events/{event_a_id}"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::NO_CONTENT,
		},
		AuthzCase {
			name: "deleted_event_is_forbidden",
			method: Method::GET,
			path: format!("/api/events/{event_a_id}"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_member_of_both_groups_can_move_event() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/events/{}", f.case_a.event.id);

	let response = app
		.patch(
			&path,
			Some(&f.user_ab),
			json!({
				"case_id": f.case_b.case.id.to_string(),
				"asset_id": f.case_b.asset.id.to_string(),
				"incident_id": f.case_b.incident.id.to_string()
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	assert_eq!(body["case_id"], f.case_b.case.id.to_string());
	assert_eq!(body["asset_id"], f.case_b.asset.id.to_string());
	assert_eq!(body["incident_id"], f.case_b.incident.id.to_string());
}

#[tokio::test]
async fn test_move_must_relink_asset_and_incident() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/events/{}", f.case_a.event.id);

	// Links left pointing at case A.
	let response = app
		.patch(
			&path,
			Some(&f.user_ab),
			json!({"case_id": f.case_b.case.id.to_string()}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	// Incident relinked, asset still in case A.
	let response = app
		.patch(
			&path,
			Some(&f.user_ab),
			json!({
				"case_id": f.case_b.case.id.to_string(),
				"incident_id": f.case_b.incident.id.to_string()
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let stored = app
		.state
		.events
		.get_event(&f.case_a.event.id)
		.await
		.unwrap()
		.unwrap();
	assert_eq!(stored.case_id, Some(f.case_a.case.id));
	assert_eq!(stored.asset_id, Some(f.case_a.asset.id));
	assert_eq!(stored.incident_id, Some(f.case_a.incident.id));
}

#[tokio::test]
async fn test_relink_to_foreign_asset_is_rejected() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.patch(
			&format!("/api/events/{}", f.case_a.event.id),
			Some(&f.user_ab),
			json!({"asset_id": f.case_b.asset.id.to_string()}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
