// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::{
	body::Body,
	http::{header::HeaderName, header::HeaderValue, Method, Request, StatusCode},
	response::Response,
	Router,
};
use chrono::{Duration, Utc};
use fyeo_server_db::{
	Asset, AssetName, AssetType, Case, Event, Incident, NewAsset, NewCase, NewEvent, NewIncident,
};
use serde::Serialize;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use fyeo_server::{
	api::{create_app_state, create_router, AppState},
	ServerConfig,
};

/// A caller as the gateway would present it.
#[derive(Clone)]
pub struct TestUser {
	pub subject: String,
	pub claims: Option<Value>,
}

impl TestUser {
	pub fn with_groups(subject: &str, groups: &str) -> Self {
		Self {
			subject: subject.to_string(),
			claims: Some(json!({ "cognito:groups": groups, "email": format!("{subject}@test.com") })),
		}
	}

	/// Claims present but without a group claim.
	pub fn without_groups(subject: &str) -> Self {
		Self {
			subject: subject.to_string(),
			claims: Some(json!({ "email": format!("{subject}@test.com") })),
		}
	}

	/// Subject header only, no claims at all.
	pub fn without_claims(subject: &str) -> Self {
		Self {
			subject: subject.to_string(),
			claims: None,
		}
	}

	pub fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
		let mut headers = vec![(
			HeaderName::from_static("x-fyeo-identity-id"),
			HeaderValue::from_str(&self.subject).unwrap(),
		)];
		if let Some(claims) = &self.claims {
			headers.push((
				HeaderName::from_static("x-fyeo-claims"),
				HeaderValue::from_str(&claims.to_string()).unwrap(),
			));
		}
		headers
	}
}

#[derive(Clone)]
pub struct CaseFixture {
	pub case: Case,
	pub asset: Asset,
	pub incident: Incident,
	pub event: Event,
}

#[derive(Clone)]
pub struct Fixtures {
	pub case_a: CaseFixture,
	pub case_b: CaseFixture,
	/// Archived case owned by teamA.
	pub archived_case: Case,
	/// Incident in case_a whose stored group copy says teamB.
	pub stale_incident: Incident,
	pub user_a: TestUser,
	pub user_b: TestUser,
	pub user_ab: TestUser,
	pub no_groups: TestUser,
	pub no_claims: TestUser,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_authz.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
		let pool = fyeo_server::db::create_pool(&db_url).await.unwrap();
		fyeo_server::db::run_migrations(&pool).await.unwrap();

		let config = ServerConfig::default();
		let state = create_app_state(pool, &config).unwrap();
		let fixtures = create_fixtures(&state).await;
		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			_temp_dir: temp_dir,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn patch(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PATCH, path, user, Some(body)).await
	}

	pub async fn delete(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::DELETE, path, user, Option::<()>::None)
			.await
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			for (name, value) in test_user.headers() {
				builder = builder.header(name, value);
			}
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header("content-type", "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}
}

pub async fn body_json(response: Response<Body>) -> Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<Value>,
	pub expected_status: StatusCode,
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PATCH => {
				app
					.patch(&case.path, case.user.as_ref(), body.clone())
					.await
			}
			(m, _) if *m == Method::DELETE => app.delete(&case.path, case.user.as_ref()).await,
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		if response.status() != case.expected_status {
			let (parts, body) = response.into_parts();
			let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
			let body_str = String::from_utf8_lossy(&body_bytes);
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, parts.status, body_str
			);
		}
	}
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	let case_a = create_case_fixture(state, "Acme monitoring", "teamA").await;
	let case_b = create_case_fixture(state, "Globex monitoring", "teamB").await;

	let archived_case = create_case(state, "Retired engagement", "teamA").await;
	state.cases.archive_case(&archived_case.id).await.unwrap();

	let stale_incident = state
		.incidents
		.create_incident(
			&new_incident(&case_a.case, &case_a.asset, 2),
			"teamB",
		)
		.await
		.unwrap();

	Fixtures {
		case_a,
		case_b,
		archived_case,
		stale_incident,
		user_a: TestUser::with_groups("sub-a", "teamA"),
		user_b: TestUser::with_groups("sub-b", "teamB"),
		user_ab: TestUser::with_groups("sub-ab", "teamA,teamB"),
		no_groups: TestUser::without_groups("sub-none"),
		no_claims: TestUser::without_claims("sub-anon"),
	}
}

async fn create_case(state: &AppState, name: &str, group: &str) -> Case {
	state
		.cases
		.create_case(&NewCase {
			name: name.to_string(),
			case_type: "brand-protection".to_string(),
			group: group.to_string(),
			emails: vec![format!("alerts@{group}.test")],
			alert_level: Default::default(),
			should_notify: false,
		})
		.await
		.unwrap()
}

pub fn new_incident(case: &Case, target: &Asset, severity: u8) -> NewIncident {
	NewIncident {
		case_id: case.id,
		asset_id: Some(target.id),
		title: format!("Credentials for {} leaked", case.name),
		incident_type: "credential-leak".to_string(),
		description: "Paste site dump".to_string(),
		recommendations: "Rotate passwords".to_string(),
		source: "pastebin".to_string(),
		severity: Some(severity),
		target_ids: vec![target.id],
		threat_actor_ids: Vec::new(),
		event_ids: Vec::new(),
		occurred_at: Some(Utc::now() - Duration::hours(1)),
	}
}

async fn create_case_fixture(state: &AppState, name: &str, group: &str) -> CaseFixture {
	let case = create_case(state, name, group).await;

	let asset = state
		.assets
		.create_asset(&NewAsset {
			case_id: case.id,
			asset_type: AssetType::Domain,
			name: AssetName {
				common: Some(format!("{group}.example.com")),
				..Default::default()
			},
			urls: vec![format!("https://{group}.example.com")],
			ips: Vec::new(),
			is_threat_actor: false,
			whois: None,
		})
		.await
		.unwrap();

	let incident = state
		.incidents
		.create_incident(&new_incident(&case, &asset, 4), &case.group)
		.await
		.unwrap();

	let event = state
		.events
		.create_event(&NewEvent {
			case_id: case.id,
			asset_id: Some(asset.id),
			incident_id: Some(incident.id),
			url: format!("https://paste.example.net/{group}"),
			title: "Dump mentioning domain".to_string(),
			source_type: "paste".to_string(),
			site: "paste.example.net".to_string(),
			threat_level: Some(3),
			confidence_score: Some(0.8),
		})
		.await
		.unwrap();

	CaseFixture {
		case,
		asset,
		incident,
		event,
	}
}
