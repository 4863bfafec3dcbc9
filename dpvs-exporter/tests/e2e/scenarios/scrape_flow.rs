//! S1: scrape flow over HTTP.
//!
//! Validates the rendered body for a healthy agent, for an outage, and
//! for the landing page.

use std::sync::Arc;

use dpvs_exporter_collector::model::ServerStats;

use crate::helpers::config::TestConfigBuilder;
use crate::helpers::fake_source::{FakeSource, nic, service, services};
use crate::helpers::harness::RunningExporter;

async fn healthy_source() -> Arc<FakeSource> {
    let source = Arc::new(FakeSource::new());
    source
        .set_services(Some(services(vec![service(
            "10.0.0.1",
            80,
            6,
            Some(ServerStats {
                conns: Some(5),
                in_bytes: Some(100),
                ..Default::default()
            }),
            &[("10.0.0.2", 8080)],
        )])))
        .await;
    source.set_nics(vec![nic("dpdk0", 9000)]).await;
    source
}

// ----- T1.1 healthy scrape -----

#[tokio::test]
async fn test_e2e_scrape_renders_connection_and_interface_metrics() {
    // Given: VIP + RS and one interface registered
    let exporter =
        RunningExporter::start(TestConfigBuilder::new().build(), healthy_source().await).await;

    // When: Prometheus scrapes
    let (status, content_type, body) = exporter.scrape().await;

    // Then: 200 with the text format and both groups present
    assert_eq!(status, 200);
    assert!(content_type.starts_with("text/plain; version=0.0.4"));
    assert!(body.contains("{conns=\"10.0.0.1:80:TCP\"} 5"));
    assert!(body.contains("{inBytes=\"10.0.0.1:80:TCP\"} 100"));
    assert!(body.contains("# TYPE dpvs_nic_dpdk0_in_bytes counter"));
    assert!(body.contains("# TYPE dpvs_nic_dpdk0_buff_available gauge"));
    assert!(body.contains("dpvs_nic_dpdk0_in_bytes{nic=\"dpdk0\",source=\"dpvs-agent\"} 9000"));

    // Then: the RS is listed without stats, so its counters read 0
    assert!(body.contains("{conns=\"10.0.0.2:8080:TCP\"} 0"));

    exporter.stop().await;
}

// ----- T1.2 outage -----

#[tokio::test]
async fn test_e2e_agent_outage_still_returns_zeroed_connections() {
    // Given: a running exporter with two connection entities registered
    let source = healthy_source().await;
    let exporter = RunningExporter::start(TestConfigBuilder::new().build(), Arc::clone(&source)).await;

    // When: the agent becomes unreachable
    source.set_unreachable(true).await;
    let (status, _, body) = exporter.scrape().await;

    // Then: still 200, every connection metric is 0, no interface metrics
    assert_eq!(status, 200);
    assert!(body.contains("{conns=\"10.0.0.1:80:TCP\"} 0"));
    assert!(body.contains("{outPkts=\"10.0.0.2:8080:TCP\"} 0"));
    assert!(!body.contains("nic=\"dpdk0\""));

    exporter.stop().await;
}

#[tokio::test]
async fn test_e2e_outage_without_zero_fill_emits_nothing() {
    let source = healthy_source().await;
    let config = TestConfigBuilder::new().zero_fill_on_error(false).build();
    let exporter = RunningExporter::start(config, Arc::clone(&source)).await;

    source.set_unreachable(true).await;
    let (status, _, body) = exporter.scrape().await;

    assert_eq!(status, 200);
    assert!(!body.contains("10.0.0.1:80:TCP"));

    exporter.stop().await;
}

// ----- T1.3 routes -----

#[tokio::test]
async fn test_e2e_custom_endpoint_and_landing_page() {
    let config = TestConfigBuilder::new()
        .endpoint("/dpvs/metrics")
        .namespace("lb")
        .build();
    let exporter = RunningExporter::start(config, healthy_source().await).await;

    let landing = exporter.get("/").await;
    assert_eq!(landing.status().as_u16(), 200);
    assert!(landing.text().await.unwrap().contains("href=\"/dpvs/metrics\""));

    let (status, _, body) = exporter.scrape().await;
    assert_eq!(status, 200);
    assert!(body.contains("lb_nic_dpdk0_in_bytes"));

    let missing = exporter.get("/metrics").await;
    assert_eq!(missing.status().as_u16(), 404);

    exporter.stop().await;
}
