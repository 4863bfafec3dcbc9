//! Scripted stats source for E2E tests.
//!
//! Responses can be changed while the exporter is running.

use tokio::sync::Mutex;

use dpvs_exporter_collector::model::{
    NicDeviceStats, RealServerExpandList, RealServerSpecExpand, RealServerSpecTiny, ServerStats,
    VirtualServerSpecExpand, VsResponse,
};
use dpvs_exporter_collector::{SourceError, StatsSource};

#[allow(dead_code)]
#[derive(Default)]
pub struct FakeSource {
    services: Mutex<Option<VsResponse>>,
    nic_stats: Mutex<Option<Vec<NicDeviceStats>>>,
    nic_names: Mutex<Option<Vec<String>>>,
    unreachable: Mutex<bool>,
}

#[allow(dead_code)]
impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_services(&self, services: Option<VsResponse>) {
        *self.services.lock().await = services;
    }

    pub async fn set_nics(&self, stats: Vec<NicDeviceStats>) {
        *self.nic_names.lock().await = Some(
            stats
                .iter()
                .map(|s| s.name.clone().unwrap_or_default())
                .collect(),
        );
        *self.nic_stats.lock().await = Some(stats);
    }

    pub async fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock().await = unreachable;
    }

    async fn check(&self) -> Result<(), SourceError> {
        if *self.unreachable.lock().await {
            return Err(SourceError::Transport("connection refused".to_owned()));
        }
        Ok(())
    }
}

impl StatsSource for FakeSource {
    async fn list_virtual_services(&self) -> Result<Option<VsResponse>, SourceError> {
        self.check().await?;
        Ok(self.services.lock().await.clone())
    }

    async fn list_nic_stats(&self) -> Result<Option<Vec<NicDeviceStats>>, SourceError> {
        self.check().await?;
        Ok(self.nic_stats.lock().await.clone())
    }

    async fn list_nic_names(&self) -> Result<Option<Vec<String>>, SourceError> {
        self.check().await?;
        Ok(self.nic_names.lock().await.clone())
    }
}

/// One virtual service with real servers (no stats on the real servers).
#[allow(dead_code)]
pub fn service(
    addr: &str,
    port: i64,
    proto: i64,
    stats: Option<ServerStats>,
    real_servers: &[(&str, i64)],
) -> VirtualServerSpecExpand {
    let items = real_servers
        .iter()
        .map(|(ip, port)| RealServerSpecExpand {
            spec: Some(RealServerSpecTiny {
                ip: Some((*ip).to_owned()),
                port: Some(*port),
                ..Default::default()
            }),
            stats: None,
        })
        .collect();
    VirtualServerSpecExpand {
        addr: Some(addr.to_owned()),
        port: Some(port),
        proto: Some(proto),
        stats,
        rss: Some(RealServerExpandList { items: Some(items) }),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn services(items: Vec<VirtualServerSpecExpand>) -> VsResponse {
    VsResponse { items: Some(items) }
}

#[allow(dead_code)]
pub fn nic(name: &str, in_bytes: i64) -> NicDeviceStats {
    NicDeviceStats {
        name: Some(name.to_owned()),
        buf_avail: Some(2048),
        buf_inuse: Some(16),
        in_bytes: Some(in_bytes),
        ..Default::default()
    }
}
