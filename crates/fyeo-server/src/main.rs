// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! fyeo case-management server binary.

use clap::{Parser, Subcommand};
use fyeo_server::{create_app_state, create_router, version};
use std::path::PathBuf;
use std::time::Duration;
use tower_http::{
	cors::{Any, CorsLayer},
	timeout::TimeoutLayer,
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// fyeo server - group-scoped case management API.
#[derive(Parser, Debug)]
#[command(name = "fyeo-server", about = "fyeo case-management server", version)]
struct Args {
	/// Path to a TOML config file. Defaults to /etc/fyeo/server.toml.
	#[arg(long, env = "FYEO_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => fyeo_server_config::load_config_with_file(path)?,
		None => fyeo_server_config::load_config()?,
	};

	let json_logs = config.logging.json;
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
		.with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting fyeo-server"
	);

	let pool = fyeo_server::db::create_pool(&config.database.url).await?;
	fyeo_server::db::run_migrations(&pool).await?;

	let state = create_app_state(pool, &config)?;

	let app = create_router(state)
		.layer(TimeoutLayer::new(Duration::from_secs(
			config.http.request_timeout_secs,
		)))
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
