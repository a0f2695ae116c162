// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for the fyeo server.
//!
//! Every repository takes an explicit [`sqlx::SqlitePool`]. Read paths never
//! return archived rows; deletion is archival.

pub mod asset;
pub mod case;
pub mod error;
pub mod event;
pub mod incident;
pub mod incident_type;
pub mod pool;
mod row;
pub mod scope;
pub mod testing;
pub mod types;

pub use asset::AssetRepository;
pub use case::CaseRepository;
pub use error::{DbError, Result};
pub use event::EventRepository;
pub use incident::IncidentRepository;
pub use incident_type::IncidentTypeRepository;
pub use pool::{create_pool, run_migrations};
pub use scope::ScopeRepository;
pub use types::*;
