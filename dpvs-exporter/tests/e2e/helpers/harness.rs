//! Runs an exporter on a loopback port and scrapes it.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use dpvs_exporter::orchestrator::Exporter;
use dpvs_exporter_core::config::ExporterConfig;

use super::fake_source::FakeSource;

/// A running exporter.
#[allow(dead_code)]
pub struct RunningExporter {
    pub addr: SocketAddr,
    pub endpoint: String,
    pub shutdown: broadcast::Sender<()>,
    pub task: JoinHandle<anyhow::Result<()>>,
}

#[allow(dead_code)]
impl RunningExporter {
    pub async fn start(config: ExporterConfig, source: Arc<FakeSource>) -> Self {
        let endpoint = config.metrics.endpoint.clone();
        let exporter = Exporter::build_with_source(config, source, None)
            .await
            .expect("exporter should build");
        let shutdown = exporter.shutdown_handle();

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(exporter.serve(listener));

        Self {
            addr,
            endpoint,
            shutdown,
            task,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(format!("http://{}{}", self.addr, path))
            .await
            .expect("request should succeed")
    }

    /// Scrape the metrics endpoint and return (status, content-type, body).
    pub async fn scrape(&self) -> (u16, String, String) {
        let resp = self.get(&self.endpoint).await;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let body = resp.text().await.expect("body");
        (status, content_type, body)
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        self.task
            .await
            .expect("server task should not panic")
            .expect("server should stop cleanly");
    }
}
