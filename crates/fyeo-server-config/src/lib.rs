// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the fyeo server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`FYEO_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use fyeo_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Largest accepted incident graph window.
pub const MAX_GRAPH_WINDOW_DAYS: u32 = 365;

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
	pub identity: IdentityConfig,
	pub incidents: IncidentsConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`FYEO_SERVER_*`)
/// 2. Config file (`/etc/fyeo/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		http: layer.http.unwrap_or_default().finalize(),
		database: layer.database.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
		identity: layer.identity.unwrap_or_default().finalize(),
		incidents: layer.incidents.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		groups_claim = %config.identity.groups_claim,
		graph_window_days = config.incidents.graph_window_days,
		"Server configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.http.port == 0 {
		return Err(ConfigError::Validation(
			"http.port must be non-zero".to_string(),
		));
	}

	if config.http.request_timeout_secs == 0 {
		return Err(ConfigError::Validation(
			"http.request_timeout_secs must be non-zero".to_string(),
		));
	}

	if config.identity.groups_claim.is_empty() {
		return Err(ConfigError::Validation(
			"identity.groups_claim must not be empty".to_string(),
		));
	}

	for (key, value) in [
		("identity.claims_header", &config.identity.claims_header),
		("identity.subject_header", &config.identity.subject_header),
	] {
		if !sections::is_valid_header_name(value) {
			return Err(ConfigError::InvalidValue {
				key: key.to_string(),
				message: format!("'{value}' is not a valid header name"),
			});
		}
	}

	let window = config.incidents.graph_window_days;
	if !(1..=MAX_GRAPH_WINDOW_DAYS).contains(&window) {
		return Err(ConfigError::Validation(format!(
			"incidents.graph_window_days must be between 1 and {MAX_GRAPH_WINDOW_DAYS}, got {window}"
		)));
	}

	Ok(())
}
