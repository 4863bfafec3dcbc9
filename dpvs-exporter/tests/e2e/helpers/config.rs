//! Test configuration builder for E2E tests.

use std::io::Write;
use std::path::PathBuf;

use dpvs_exporter_core::config::ExporterConfig;

/// Builder for test-friendly `ExporterConfig` instances.
///
/// Defaults: loopback listen address, short agent timeout, rediscovery off.
#[allow(dead_code)]
pub struct TestConfigBuilder {
    config: ExporterConfig,
}

#[allow(dead_code)]
impl TestConfigBuilder {
    pub fn new() -> Self {
        let mut config = ExporterConfig::default();
        config.metrics.listen_addr = "127.0.0.1".to_owned();
        config.agent.timeout_secs = 2;
        Self { config }
    }

    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.config.metrics.endpoint = endpoint.to_owned();
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.config.metrics.namespace = namespace.to_owned();
        self
    }

    pub fn zero_fill_on_error(mut self, enabled: bool) -> Self {
        self.config.collector.zero_fill_on_error = enabled;
        self
    }

    pub fn rediscover_interval_secs(mut self, secs: u64) -> Self {
        self.config.collector.rediscover_interval_secs = secs;
        self
    }

    pub fn build(self) -> ExporterConfig {
        self.config
    }

    /// Serialize the config to a temporary TOML file.
    pub fn build_file(self) -> (tempfile::NamedTempFile, PathBuf) {
        let content = toml::to_string(&self.config).expect("config should serialize");
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        let path = file.path().to_path_buf();
        (file, path)
    }
}
