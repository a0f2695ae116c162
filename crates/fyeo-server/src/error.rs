// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.
//!
//! Denials, missing resources and archived resources all render the same
//! 403 body. Store failures render a generic 500 and are only detailed in
//! logs.

use axum::{
	extract::rejection::{JsonRejection, QueryRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use fyeo_server_auth::{AuthError, DENIED_MESSAGE};
use fyeo_server_db::DbError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Claim extraction or access check failed.
	#[error(transparent)]
	Auth(#[from] AuthError),

	/// Database error from fyeo-server-db.
	#[error("Database error: {0}")]
	Db(#[from] DbError),

	/// Invalid request payload or parameter.
	#[error("Invalid request: {0}")]
	BadRequest(String),

	/// Internal server error.
	#[error("Internal error: {0}")]
	Internal(String),
}

impl ServerError {
	/// The uniform denial. Also used when an authorized resource vanishes
	/// between the check and the read.
	pub fn denied() -> Self {
		ServerError::Auth(AuthError::NotFoundOrDenied)
	}

	pub fn bad_request(message: impl Into<String>) -> Self {
		ServerError::BadRequest(message.into())
	}
}

impl From<JsonRejection> for ServerError {
	fn from(rejection: JsonRejection) -> Self {
		ServerError::BadRequest(rejection.body_text())
	}
}

impl From<QueryRejection> for ServerError {
	fn from(rejection: QueryRejection) -> Self {
		ServerError::BadRequest(rejection.body_text())
	}
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	fn new(error: &str, message: impl Into<String>) -> Self {
		Self {
			error: error.to_string(),
			message: message.into(),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, body) = match &self {
			ServerError::Auth(e @ (AuthError::NoClaims { .. } | AuthError::NoGroups)) => {
				tracing::info!(error = %e, "request not authenticated");
				(
					StatusCode::UNAUTHORIZED,
					ErrorResponse::new("unauthorized", e.to_string()),
				)
			}
			ServerError::Auth(AuthError::NotFoundOrDenied) => (
				StatusCode::FORBIDDEN,
				ErrorResponse::new("forbidden", DENIED_MESSAGE),
			),
			ServerError::Auth(AuthError::Upstream(msg)) => {
				tracing::error!(error = %msg, "authorization lookup failed");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "An internal error occurred"),
				)
			}
			ServerError::Db(e) => {
				tracing::error!(error = %e, "database error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("database_error", "A database error occurred"),
				)
			}
			ServerError::BadRequest(msg) => (
				StatusCode::BAD_REQUEST,
				ErrorResponse::new("bad_request", msg.clone()),
			),
			ServerError::Internal(msg) => {
				tracing::error!(error = %msg, "internal error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					ErrorResponse::new("internal_error", "An internal error occurred"),
				)
			}
		};

		(status, Json(body)).into_response()
	}
}
