//! Prometheus scrape endpoint.
//!
//! Each `GET <endpoint>` runs one composite collection and renders it through a
//! per-scrape recorder, then appends the exporter's own telemetry from the
//! global recorder. Collection problems never turn into a 5xx.
//!
//! # Usage
//!
//! ```ignore
//! let telemetry = install_telemetry_recorder()?;
//! let app = router(AppState::new(collector, Some(telemetry)), &config.metrics.endpoint);
//! ```

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

use dpvs_exporter_collector::{DpvsCollector, StatsSource, render_exposition};
use dpvs_exporter_core::metrics as m;

/// Content type of the Prometheus text format.
pub const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Install the global recorder used for the exporter's own telemetry.
///
/// This function should be called once per process. Unlike the per-scrape
/// recorder, this one is never bound to a socket: its output is appended to
/// the scrape response.
///
/// # Errors
///
/// - Invalid histogram buckets
/// - Global recorder is already installed
pub fn install_telemetry_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(m::SCRAPE_DURATION_SECONDS.to_owned()),
            &m::SCRAPE_DURATION_BUCKETS,
        )
        .map_err(|e| anyhow::anyhow!("invalid scrape duration buckets: {}", e))?
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;

    m::describe_all();
    metrics::gauge!(m::BUILD_INFO, "version" => env!("CARGO_PKG_VERSION")).set(1.0);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "telemetry recorder installed");
    Ok(handle)
}

/// Shared state of the scrape handlers.
pub struct AppState<S: StatsSource> {
    collector: Arc<DpvsCollector<S>>,
    telemetry: Option<PrometheusHandle>,
    endpoint: Arc<str>,
}

impl<S: StatsSource> AppState<S> {
    pub fn new(
        collector: Arc<DpvsCollector<S>>,
        telemetry: Option<PrometheusHandle>,
        endpoint: &str,
    ) -> Self {
        Self {
            collector,
            telemetry,
            endpoint: Arc::from(endpoint),
        }
    }
}

// derive(Clone) would require S: Clone
impl<S: StatsSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            collector: Arc::clone(&self.collector),
            telemetry: self.telemetry.clone(),
            endpoint: Arc::clone(&self.endpoint),
        }
    }
}

/// Build the HTTP router: landing page on `/` and metrics on the endpoint.
pub fn router<S: StatsSource>(state: AppState<S>) -> Router {
    let endpoint = state.endpoint.to_string();
    Router::new()
        .route("/", get(landing::<S>))
        .route(&endpoint, get(scrape::<S>))
        .with_state(state)
}

async fn scrape<S: StatsSource>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let report = state.collector.collect().await;
    let mut body = render_exposition(report.samples());
    if let Some(telemetry) = &state.telemetry {
        body.push_str(&telemetry.render());
    }

    tracing::debug!(
        samples = report.sample_count(),
        conn = report.conn.label(),
        nic = report.nic.label(),
        elapsed_ms = report.elapsed.as_millis(),
        "scrape served"
    );

    ([(header::CONTENT_TYPE, TEXT_FORMAT)], body)
}

async fn landing<S: StatsSource>(State(state): State<AppState<S>>) -> Html<String> {
    Html(format!(
        "<html>\n<head><title>DPVS Exporter</title></head>\n<body>\n\
         <h1>DPVS Exporter</h1>\n<p><a href=\"{0}\">{0}</a></p>\n</body>\n</html>\n",
        state.endpoint
    ))
}
