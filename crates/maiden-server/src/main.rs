//! Maiden server binary
//!
//! ## Usage
//!
//! ```bash
//! # Serve ./data, ./app and ./doc on port 5000
//! maiden
//!
//! # On a norns
//! maiden --data /home/we/dust --app /home/we/maiden/app/build --doc /home/we/norns/doc
//! ```

use std::process::ExitCode;

use clap::Parser;
use maiden_server::Config;
use maiden_server::constants::VERSION;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(version = VERSION, "starting maiden");
    tracing::info!(
        port = config.port,
        bind = %config.bind,
        data = %config.data_dir.display(),
        app = %config.app_dir.display(),
        doc = %config.doc_dir.display(),
        "configuration"
    );

    if let Err(e) = maiden_server::serve(config).await {
        tracing::error!("Server error: {:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
