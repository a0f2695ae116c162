// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP service for fyeo case management.
//!
//! Every route except `/health` and `/api/incident-types` identifies the
//! caller from gateway headers and runs the group guard before touching
//! the store.

pub mod api;
pub mod error;
pub mod graph;
pub mod identity;
pub mod routes;
pub mod version;

pub use api::{create_app_state, create_router, AppState};
pub use error::{ErrorResponse, ServerError};
pub use fyeo_server_config::ServerConfig;
pub use fyeo_server_db as db;
pub use identity::{Caller, IdentitySource};
