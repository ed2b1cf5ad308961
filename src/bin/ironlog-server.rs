// ABOUTME: Server binary for the IronLog workout tracking API
// ABOUTME: Loads configuration, opens the database, and serves the REST routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronLog Contributors

//! # IronLog API Server Binary
//!
//! Starts the IronLog REST API: routines, exercise sets, body measurements,
//! session progress, derived statistics, and the exercise catalog.

use anyhow::Result;
use clap::Parser;
use ironlog::{
    config::environment::{DatabaseUrl, ServerConfig},
    database::Database,
    logging,
    resources::ServerResources,
    server::IronLogServer,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "ironlog-server")]
#[command(about = "IronLog - self-hosted workout tracking API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (sqlite: path)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle container environments where clap may not work properly
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Argument parsing failed: {e}");
            eprintln!("Using default configuration");
            Args {
                http_port: None,
                database_url: None,
            }
        }
    };

    // Load configuration from environment, then apply CLI overrides
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&database_url)?;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting IronLog API server");
    info!("{}", config.summary());

    // Open the database; migrations run as part of the open
    let database = Database::new(&config.database.url.to_connection_string()).await?;
    info!(
        "Database ready: {}",
        config.database.url.to_connection_string()
    );

    let http_port = config.http_port;
    let resources = Arc::new(ServerResources::new(database, Arc::new(config)));
    let server = IronLogServer::new(resources);

    display_available_endpoints(http_port);
    info!("Ready to log workouts!");

    if let Err(e) = server.run(http_port).await {
        error!("Server error: {e}");
        return Err(e);
    }

    Ok(())
}

/// Display all available API endpoints with their port
#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(port: u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    info!("=== Available API Endpoints ===");
    info!("Health:");
    info!("   Liveness:          GET  http://{host}:{port}/health");
    info!("   Readiness:         GET  http://{host}:{port}/ready");
    info!("Routines:");
    info!("   Create Routine:    POST http://{host}:{port}/api/routines");
    info!("   List Routines:     GET  http://{host}:{port}/api/routines?device_id={{id}}");
    info!("   Active Routine:    GET  http://{host}:{port}/api/routines/active?device_id={{id}}");
    info!("   Get/Update/Delete: GET|PUT|DELETE http://{host}:{port}/api/routines/{{id}}");
    info!("   Activate Routine:  POST http://{host}:{port}/api/routines/{{id}}/activate");
    info!("Exercise Sets:");
    info!("   Log Set:           POST http://{host}:{port}/api/sets");
    info!("   List Sets:         GET  http://{host}:{port}/api/sets?device_id={{id}}");
    info!("   Update/Delete Set: PUT|DELETE http://{host}:{port}/api/sets/{{id}}");
    info!("Body Measurements:");
    info!("   Record:            POST http://{host}:{port}/api/measurements");
    info!("   List:              GET  http://{host}:{port}/api/measurements?device_id={{id}}");
    info!("   Delete:            DELETE http://{host}:{port}/api/measurements/{{id}}");
    info!("Session Progress:");
    info!("   Get Progress:      GET  http://{host}:{port}/api/session-progress/{{device}}/{{routine}}");
    info!("   Complete Session:  POST http://{host}:{port}/api/session-progress/complete");
    info!("   Skip Session:      POST http://{host}:{port}/api/session-progress/skip");
    info!("   Sync Snapshot:     PUT  http://{host}:{port}/api/session-progress/sync");
    info!("Statistics:");
    info!("   Derived Stats:     GET  http://{host}:{port}/api/stats/{{device}}?period=week|month|year|all");
    info!("Exercise Catalog:");
    info!("   List Exercises:    GET  http://{host}:{port}/api/exercises");
    info!("   Lookup Exercise:   GET  http://{host}:{port}/api/exercises/{{name}}");
    info!("   Add Custom:        POST http://{host}:{port}/api/exercises");
    info!("=== End of Endpoint List ===");
}
