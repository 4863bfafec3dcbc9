//! S5: self-telemetry appended to the scrape.
//!
//! Installs the process-wide recorder, so it runs serially.

use std::sync::Arc;

use dpvs_exporter::metrics_server::install_telemetry_recorder;
use dpvs_exporter::orchestrator::Exporter;
use serial_test::serial;
use tokio::net::TcpListener;

use crate::helpers::config::TestConfigBuilder;
use crate::helpers::fake_source::{FakeSource, nic};

#[tokio::test]
#[serial]
async fn test_e2e_scrape_includes_exporter_telemetry() {
    let telemetry = install_telemetry_recorder().expect("recorder installs once per process");
    let source = Arc::new(FakeSource::new());
    source.set_nics(vec![nic("dpdk0", 1)]).await;
    let exporter = Exporter::build_with_source(TestConfigBuilder::new().build(), source, Some(telemetry))
        .await
        .unwrap();
    let shutdown = exporter.shutdown_handle();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(exporter.serve(listener));

    // The first scrape records the cycle counters; the second renders them.
    let url = format!("http://{addr}/metrics");
    let _ = reqwest::get(&url).await.unwrap().text().await.unwrap();
    let body = reqwest::get(&url).await.unwrap().text().await.unwrap();

    assert!(body.contains("dpvs_nic_dpdk0_in_bytes"));
    assert!(body.contains("dpvs_exporter_build_info"));
    assert!(body.contains("dpvs_exporter_scrapes_total{collector=\"nic\",outcome=\"collected\"}"));
    assert!(body.contains("dpvs_exporter_scrape_duration_seconds_bucket"));

    let _ = shutdown.send(());
    task.await.unwrap().unwrap();
}
