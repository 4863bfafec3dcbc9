//! S2: periodic rediscovery.
//!
//! Validates that a new topology becomes visible without a restart and that
//! a failed rediscovery keeps serving the previous registry.

use std::sync::Arc;
use std::time::Duration;

use dpvs_exporter::orchestrator::spawn_rediscovery;
use dpvs_exporter_collector::DpvsCollector;
use dpvs_exporter_collector::model::ServerStats;
use tokio::sync::broadcast;

use crate::helpers::config::TestConfigBuilder;
use crate::helpers::fake_source::{FakeSource, service, services};
use crate::helpers::harness::RunningExporter;

fn stats(conns: i64) -> Option<ServerStats> {
    Some(ServerStats {
        conns: Some(conns),
        ..Default::default()
    })
}

async fn discovered(source: Arc<FakeSource>) -> Arc<DpvsCollector<FakeSource>> {
    let collector = DpvsCollector::builder().source(source).build().unwrap();
    collector.discover().await.unwrap();
    Arc::new(collector)
}

#[tokio::test(start_paused = true)]
async fn test_e2e_rediscovery_picks_up_new_service() {
    // Given: one service registered
    let source = Arc::new(FakeSource::new());
    source
        .set_services(Some(services(vec![service("10.0.0.1", 80, 6, stats(1), &[])])))
        .await;
    let collector = discovered(Arc::clone(&source)).await;
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let task = spawn_rediscovery(Arc::clone(&collector), Duration::from_secs(30), shutdown_rx);

    // When: a second service appears and one period elapses
    source
        .set_services(Some(services(vec![
            service("10.0.0.1", 80, 6, stats(1), &[]),
            service("10.0.0.7", 53, 17, stats(3), &[]),
        ])))
        .await;
    tokio::time::sleep(Duration::from_secs(31)).await;

    // Then: the new service is registered and collected
    assert!(collector.conn().registry().contains("10.0.0.7:53:UDP"));
    let report = collector.collect().await;
    assert_eq!(report.conn.samples().len(), 10);

    let _ = shutdown_tx.send(());
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_e2e_failed_rediscovery_keeps_previous_registry() {
    let source = Arc::new(FakeSource::new());
    source
        .set_services(Some(services(vec![service("10.0.0.1", 80, 6, stats(1), &[])])))
        .await;
    let collector = discovered(Arc::clone(&source)).await;
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let task = spawn_rediscovery(Arc::clone(&collector), Duration::from_secs(30), shutdown_rx);

    source.set_unreachable(true).await;
    tokio::time::sleep(Duration::from_secs(61)).await;

    assert!(collector.conn().registry().contains("10.0.0.1:80:TCP"));

    let _ = shutdown_tx.send(());
    task.await.unwrap();
}

#[tokio::test]
async fn test_e2e_server_with_rediscovery_stops_cleanly() {
    let source = Arc::new(FakeSource::new());
    source
        .set_services(Some(services(vec![service("10.0.0.1", 80, 6, stats(1), &[])])))
        .await;
    let config = TestConfigBuilder::new().rediscover_interval_secs(60).build();
    let exporter = RunningExporter::start(config, source).await;

    let (status, _, _) = exporter.scrape().await;
    assert_eq!(status, 200);

    // stop() awaits the rediscovery task as well
    exporter.stop().await;
}
