//! missions-web - Tutorial missions HTTP service
//!
//! Serves the tar-creation and extraction missions: users download
//! mission files or the reference tarball, and upload their results for
//! validation. Completion bookkeeping is an in-process ledger.

use anyhow::Result;
use clap::Parser;
use missions_common::{MissionConfig, ReferenceArchive};
use missions_web::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "missions-web", about = "Tutorial missions HTTP service")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 5731, env = "MISSIONS_PORT")]
    port: u16,

    /// Path to a TOML mission configuration file
    /// (falls back to MISSIONS_CONFIG, then the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting missions-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();

    // Mission constants are immutable once loaded
    let config = MissionConfig::load(cli.config.as_deref())?;
    info!("Wrapper directory: {}", config.tar.wrapper_dir_name);
    info!(
        "Expected files: {}",
        config
            .tar
            .files
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    );

    // Build the reference tarball once; its wanted member's bytes are the
    // comparison target for the extraction mission
    let reference = ReferenceArchive::build(&config.untar)?;
    info!(
        "Reference tarball {} ready ({} bytes, wants {})",
        reference.tarball_name(),
        reference.bytes().len(),
        reference.wanted_path()
    );

    let state = AppState::new(config, reference);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", cli.port)).await?;
    info!("missions-web listening on http://127.0.0.1:{}", cli.port);
    info!("Health check: http://127.0.0.1:{}/health", cli.port);

    axum::serve(listener, app).await?;

    Ok(())
}
