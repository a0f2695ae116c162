// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_incident_authorization() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let case_a_id = f.case_a.case.id.to_string();
	let case_b_id = f.case_b.case.id.to_string();
	let incident_a_id = f.case_a.incident.id.to_string();
	let incident_b_id = f.case_b.incident.id.to_string();

	let cases = vec![
		AuthzCase {
			name: "member_can_get_incident",
			method: Method::GET,
			path: format!("/api/incidents/{incident_a_id}"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_group_cannot_get_incident",
			method: Method::GET,
			path: format!("/api/incidents/{incident_b_id}"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_can_list_incident_assets",
			method: Method::GET,
			path: format!("/api/incidents/{incident_a_id}/assets"),
			user: Some(f.user_a.clone()),
			body: None,
			expected_status: StatusCode::OK,
		},
		AuthzCase {
			name: "other_group_cannot_list_incident_assets",
			method: Method::GET,
			path: format!("/api/incidents/{incident_a_id}/assets"),
			user: Some(f.user_b.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "member_can_report_incident",
			method: Method::POST,
			path: "/api/incidents".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({
				"case_id": case_a_id,
				"title": "Lookalike domain registered",
				"incident_type": "phishing-domain",
				"severity": 3,
				"target_ids": [f.case_a.asset.id.to_string()]
			})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "member_cannot_report_incident_in_foreign_case",
			method: Method::POST,
			path: "/api/incidents".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({
				"case_id": case_b_id,
				"title": "Sneaky",
				"incident_type": "phishing-domain"
			})),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "incident_cannot_target_foreign_asset",
			method: Method::POST,
			path: "/api/incidents".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({
				"case_id": case_a_id,
				"title": "Cross-case target",
				"incident_type": "phishing-domain",
				"target_ids": [f.case_b.asset.id.to_string()]
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "incident_can_reference_own_event",
			method: Method::POST,
			path: "/api/incidents".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({
				"case_id": case_a_id,
				"title": "Dump confirmed",
				"incident_type": "data-breach",
				"event_ids": [f.case_a.event.id.to_string()]
			})),
			expected_status: StatusCode::CREATED,
		},
		AuthzCase {
			name: "incident_cannot_reference_foreign_event",
			method: Method::POST,
			path: "/api/incidents".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({
				"case_id": case_a_id,
				"title": "Cross-case event",
				"incident_type": "data-breach",
				"event_ids": [f.case_b.event.id.to_string()]
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "incident_severity_out_of_range",
			method: Method::POST,
			path: "/api/incidents".to_string(),
			user: Some(f.user_a.clone()),
			body: Some(json!({
				"case_id": case_a_id,
				"title": "Too severe",
				"incident_type": "data-breach",
				"severity": 9
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "other_group_cannot_delete_incident",
			method: Method::DELETE,
			path: format!("/api/incidents/{incident_a_id}"),
			user: Some(f.user_b.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_stale_incident_group_is_ignored() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/incidents/{}", f.stale_incident.id);

	// The stored copy says teamB but the owning case belongs to teamA.
	assert_eq!(app.get(&path, Some(&f.user_a)).await.status(), StatusCode::OK);
	assert_eq!(
		app.get(&path, Some(&f.user_b)).await.status(),
		StatusCode::FORBIDDEN
	);
	assert_eq!(
		app.delete(&path, Some(&f.user_b)).await.status(),
		StatusCode::FORBIDDEN
	);
}

#[tokio::test]
async fn test_new_incident_copies_case_group() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.post(
			"/api/incidents",
			Some(&f.user_ab),
			json!({
				"case_id": f.case_b.case.id.to_string(),
				"title": "Executive impersonation",
				"incident_type": "social-media-impersonation",
				"severity": 2
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let body = body_json(response).await;
	assert_eq!(body["group"], "teamB");
	assert_eq!(body["is_active"], true);
}

#[tokio::test]
async fn test_incident_assets_lists_targets() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.get(
			&format!("/api/incidents/{}/assets", f.case_a.incident.id),
			Some(&f.user_a),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let body = body_json(response).await;
	let targets = body["targets"].as_array().unwrap();
	assert_eq!(targets.len(), 1);
	assert_eq!(targets[0]["id"], f.case_a.asset.id.to_string());
	assert!(body["threat_actors"].as_array().unwrap().is_empty());
}
