//! CLI argument definitions for dpvs-exporter.
//!
//! Flag names follow the usual Prometheus exporter convention
//! (`--web.listen-address`, `--web.telemetry-path`). Flags take precedence
//! over environment variables, which take precedence over the config file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use dpvs_exporter_core::config::ExporterConfig;
use dpvs_exporter_core::error::{ConfigError, ExporterError};

/// Config path used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/dpvs-exporter/dpvs-exporter.toml";

/// Prometheus exporter for DPVS load-balancer statistics.
///
/// Reads connection and interface counters from dpvs-agent and serves
/// them in the Prometheus text format.
#[derive(Parser, Debug)]
#[command(name = "dpvs-exporter")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to dpvs-exporter.toml.
    ///
    /// When omitted, the default path is tried and built-in defaults are
    /// used if it does not exist.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on for telemetry (e.g. `:9101`, `127.0.0.1:9101`).
    #[arg(long = "web.listen-address", value_name = "HOST:PORT")]
    pub web_listen_address: Option<String>,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path", value_name = "PATH")]
    pub web_telemetry_path: Option<String>,

    /// dpvs-agent address.
    #[arg(long = "agent.server", value_name = "HOST:PORT")]
    pub agent_server: Option<String>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration and exit without starting the exporter.
    #[arg(long)]
    pub validate: bool,
}

/// A validated configuration and where it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: ExporterConfig,
    /// `None` when the default path was missing and defaults were used.
    pub path: Option<PathBuf>,
}

impl DaemonCli {
    /// Load the config file, then apply env and CLI overrides and validate.
    ///
    /// A missing file is an error only when `--config` was given explicitly.
    pub async fn load_config(&self) -> Result<LoadedConfig> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let (mut config, path) = match ExporterConfig::from_file(&path).await {
            Ok(config) => (config, Some(path)),
            Err(ExporterError::Config(ConfigError::FileNotFound { .. }))
                if self.config.is_none() =>
            {
                (ExporterConfig::default(), None)
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "failed to load config from {}: {}",
                    display(&path),
                    e
                ));
            }
        };

        config.apply_env_overrides();
        self.apply_overrides(&mut config)?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        Ok(LoadedConfig { config, path })
    }

    /// Apply command-line overrides on top of an already loaded config.
    pub fn apply_overrides(&self, config: &mut ExporterConfig) -> Result<()> {
        if let Some(address) = &self.web_listen_address {
            config
                .metrics
                .set_listen_address(address)
                .map_err(|e| anyhow::anyhow!("{}", e))?;
        }
        if let Some(path) = &self.web_telemetry_path {
            config.metrics.endpoint.clone_from(path);
        }
        if let Some(server) = &self.agent_server {
            config.agent.server.clone_from(server);
        }
        if let Some(level) = &self.log_level {
            config.general.log_level.clone_from(level);
        }
        if let Some(format) = &self.log_format {
            config.general.log_format.clone_from(format);
        }
        Ok(())
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
