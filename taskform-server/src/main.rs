//! `TaskForm` server -- schema-validated todos form over HTTP.
//!
//! An axum server that renders a dynamic list-of-tasks form, applies
//! posted control actions (insert/remove/reorder/replace), and
//! validates submissions against the shared schema. Valid submissions
//! redirect with the validated value serialized into the query string.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:8080
//! cargo run --bin taskform-server
//!
//! # Run on custom address
//! cargo run --bin taskform-server -- --bind 127.0.0.1:3000
//!
//! # Or via environment variable
//! TASKFORM_ADDR=127.0.0.1:3000 cargo run --bin taskform-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskform_server::config::{ServerCliArgs, ServerConfig};
use taskform_server::routes::{self, AppState};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskform server");

    let state = Arc::new(AppState::with_config(config.max_tasks, config.max_body_size));

    match routes::start_server_with_state(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "taskform server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    }
}
