//! S3: graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use dpvs_exporter::orchestrator::Exporter;
use tokio::net::TcpListener;

use crate::helpers::config::TestConfigBuilder;
use crate::helpers::fake_source::FakeSource;
use crate::helpers::harness::RunningExporter;

#[tokio::test]
async fn test_e2e_shutdown_stops_accepting_connections() {
    let exporter =
        RunningExporter::start(TestConfigBuilder::new().build(), Arc::new(FakeSource::new())).await;
    let addr = exporter.addr;

    exporter.stop().await;

    let result = reqwest::Client::new()
        .get(format!("http://{addr}/metrics"))
        .timeout(Duration::from_secs(1))
        .send()
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_e2e_shutdown_before_serve_is_not_lost() {
    // Given: shutdown is requested before the server starts
    let exporter = Exporter::build_with_source(
        TestConfigBuilder::new().rediscover_interval_secs(5).build(),
        Arc::new(FakeSource::new()),
        None,
    )
    .await
    .unwrap();
    let _ = exporter.shutdown_handle().send(());

    // When: serving starts afterwards
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), exporter.serve(listener)).await;

    // Then: serve returns promptly
    assert!(matches!(result, Ok(Ok(()))));
}
