use anyhow::Result;
use clap::Parser;

use dpvs_exporter::cli::DaemonCli;
use dpvs_exporter::logging::init_tracing;
use dpvs_exporter::metrics_server::install_telemetry_recorder;
use dpvs_exporter::orchestrator::Exporter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();
    let loaded = cli.load_config().await?;

    if cli.validate {
        match &loaded.path {
            Some(path) => println!("configuration OK: {}", path.display()),
            None => println!("configuration OK: built-in defaults"),
        }
        return Ok(());
    }

    init_tracing(&loaded.config.general)?;
    match &loaded.path {
        Some(path) => tracing::info!(path = %path.display(), "configuration loaded"),
        None => tracing::warn!("config file not found, using built-in defaults"),
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dpvs-exporter starting");

    let telemetry = install_telemetry_recorder()?;
    let exporter = Exporter::build(loaded.config, Some(telemetry)).await?;
    exporter.run().await
}
