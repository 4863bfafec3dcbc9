//! S4: startup discovery.
//!
//! An unreachable agent aborts startup; an agent that answers with no data
//! starts the exporter with empty registries.

use std::sync::Arc;

use dpvs_exporter::orchestrator::Exporter;

use crate::helpers::config::TestConfigBuilder;
use crate::helpers::fake_source::FakeSource;
use crate::helpers::harness::RunningExporter;

#[tokio::test]
async fn test_e2e_unreachable_agent_aborts_startup() {
    let source = Arc::new(FakeSource::new());
    source.set_unreachable(true).await;

    let result = Exporter::build_with_source(TestConfigBuilder::new().build(), source, None).await;

    let err = result.err().expect("startup should fail");
    assert!(err.to_string().contains("initial discovery"));
}

#[tokio::test]
async fn test_e2e_invalid_config_is_rejected_before_discovery() {
    let mut config = TestConfigBuilder::new().build();
    config.agent.timeout_secs = 0;

    let result = Exporter::build_with_source(config, Arc::new(FakeSource::new()), None).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_e2e_empty_agent_starts_with_empty_registries() {
    let exporter =
        RunningExporter::start(TestConfigBuilder::new().build(), Arc::new(FakeSource::new())).await;

    let (status, _, body) = exporter.scrape().await;

    assert_eq!(status, 200);
    assert!(!body.contains("dpvs_conn_"));
    assert!(!body.contains("dpvs_nic_"));

    exporter.stop().await;
}
