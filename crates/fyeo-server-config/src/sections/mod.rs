// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.
//!
//! Each section comes as a pair: a partial `*ConfigLayer` that sources
//! produce and merge, and a fully resolved `*Config` the server consumes.

mod database;
mod http;
mod identity;
mod incidents;
mod logging;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use identity::{IdentityConfig, IdentityConfigLayer};
pub use incidents::{IncidentsConfig, IncidentsConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};

pub(crate) use identity::is_valid_header_name;
