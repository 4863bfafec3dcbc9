//! Exporter assembly and lifecycle.
//!
//! The [`Exporter`] wires the agent client, the composite collector and the
//! HTTP server together.
//!
//! # Startup
//!
//! 1. Build the stats source (dpvs-agent client)
//! 2. Initial discovery (virtual services and NIC names); a transport failure
//!    aborts startup, an absent payload starts with an empty registry
//! 3. Spawn the rediscovery task if configured
//! 4. Serve until SIGTERM/SIGINT
//!
//! # Shutdown
//!
//! The shutdown broadcast stops the HTTP server (in-flight scrapes finish)
//! and then the rediscovery task.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use dpvs_exporter_collector::{DpvsAgentClient, DpvsCollector, StatsSource};
use dpvs_exporter_core::config::ExporterConfig;

use crate::metrics_server::{self, AppState};

/// The assembled exporter.
pub struct Exporter<S: StatsSource> {
    /// Validated configuration.
    config: ExporterConfig,
    /// Composite collector shared by the scrape handler and rediscovery.
    collector: Arc<DpvsCollector<S>>,
    /// Global telemetry handle appended to every scrape.
    telemetry: Option<PrometheusHandle>,
    /// Shutdown broadcast sender.
    shutdown_tx: broadcast::Sender<()>,
    /// Subscribed at build time so a shutdown sent before `serve` is not lost.
    shutdown_rx: broadcast::Receiver<()>,
}

impl Exporter<DpvsAgentClient> {
    /// Build an exporter that reads from the configured dpvs-agent.
    pub async fn build(config: ExporterConfig, telemetry: Option<PrometheusHandle>) -> Result<Self> {
        let client = DpvsAgentClient::from_config(&config.agent)
            .map_err(|e| anyhow::anyhow!("failed to create dpvs-agent client: {}", e))?;
        tracing::info!(server = client.base_url(), "dpvs-agent client created");
        Self::build_with_source(config, Arc::new(client), telemetry).await
    }
}

impl<S: StatsSource> Exporter<S> {
    /// Build from an arbitrary stats source and run the initial discovery.
    pub async fn build_with_source(
        config: ExporterConfig,
        source: Arc<S>,
        telemetry: Option<PrometheusHandle>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        let collector = DpvsCollector::builder()
            .source(source)
            .config(&config)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build collector: {}", e))?;

        let summary = collector
            .discover()
            .await
            .map_err(|e| anyhow::anyhow!("initial discovery against dpvs-agent failed: {}", e))?;
        if summary.conn_entities.is_none() {
            tracing::warn!("no virtual services discovered, connection metrics start empty");
        }
        if summary.nic_entities.is_none() {
            tracing::warn!("no interfaces discovered, interface metrics start empty");
        }

        let (shutdown_tx, shutdown_rx) = broadcast::channel(4);

        Ok(Self {
            config,
            collector: Arc::new(collector),
            telemetry,
            shutdown_tx,
            shutdown_rx,
        })
    }

    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    pub fn collector(&self) -> &Arc<DpvsCollector<S>> {
        &self.collector
    }

    /// A sender that stops [`serve`](Self::serve) when sent to.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub fn router(&self) -> Router {
        metrics_server::router(AppState::new(
            Arc::clone(&self.collector),
            self.telemetry.clone(),
            &self.config.metrics.endpoint,
        ))
    }

    /// Bind the configured address and serve until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<()> {
        let addr = self.config.metrics.socket_addr()?;
        if addr.ip().is_unspecified() {
            tracing::warn!(
                listen_addr = %addr,
                "metrics endpoint is exposed on all interfaces; restrict listen_addr in untrusted networks"
            );
        }
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", addr, e))?;

        let shutdown_tx = self.shutdown_tx.clone();
        tokio::spawn(async move {
            match wait_for_shutdown_signal().await {
                Ok(signal) => tracing::info!(signal = signal, "shutdown signal received"),
                Err(e) => tracing::error!(error = %e, "signal handling failed, shutting down"),
            }
            let _ = shutdown_tx.send(());
        });

        self.serve(listener).await
    }

    /// Serve on an already bound listener until the shutdown broadcast.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr()?;
        let router = self.router();

        let rediscovery = self.config.collector.rediscover_interval().map(|interval| {
            spawn_rediscovery(
                Arc::clone(&self.collector),
                interval,
                self.shutdown_tx.subscribe(),
            )
        });

        tracing::info!(
            listen_addr = %local_addr,
            endpoint = self.config.metrics.endpoint.as_str(),
            "serving metrics"
        );

        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .map_err(|e| anyhow::anyhow!("metrics server error: {}", e))?;

        // Stop background tasks that subscribed after an early shutdown.
        let _ = self.shutdown_tx.send(());
        if let Some(task) = rediscovery {
            let _ = task.await;
        }

        tracing::info!("dpvs-exporter shut down");
        Ok(())
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Spawn a background task that periodically rebuilds both registries.
///
/// A failed rediscovery keeps the previous registries.
pub fn spawn_rediscovery<S: StatsSource>(
    collector: Arc<DpvsCollector<S>>,
    period: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; startup discovery already ran.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = collector.discover().await {
                        tracing::warn!(error = %e, "rediscovery failed, keeping previous registries");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::debug!("rediscovery task shutting down");
                    break;
                }
            }
        }
    })
}
