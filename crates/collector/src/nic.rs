//! 인터페이스 통계 수집
//!
//! DPDK 포트별 버퍼, 바이트, 패킷, 에러 카운터를 수집합니다.
//! 인터페이스 이름이 그대로 식별자이며, 페이로드가 없거나 조회가 실패하면
//! 이번 사이클은 아무것도 내보내지 않습니다.
//!
//! 메트릭 이름: `<namespace>_nic_<name>_<field>{nic="<name>",source="dpvs-agent"}`

use std::sync::Arc;

use crate::descriptor::MetricKind;
use crate::error::SourceError;
use crate::feed::{EntityFeed, LiveEntity};
use crate::model::NicDeviceStats;
use crate::registry::DiscoveredEntity;
use crate::schema::{AbsentPolicy, FieldSpec, GroupSchema};
use crate::source::StatsSource;

/// 수집기 이름
pub const NIC_COLLECTOR: &str = "nic";

static NIC_FIELDS: [FieldSpec; 7] = [
    FieldSpec {
        suffix: "buff_available",
        label: "nic",
        help: "Available buffer count for incoming packets.",
        kind: MetricKind::Gauge,
    },
    FieldSpec {
        suffix: "buff_inuse",
        label: "nic",
        help: "In-use buffer count for incoming packets.",
        kind: MetricKind::Gauge,
    },
    FieldSpec {
        suffix: "in_bytes",
        label: "nic",
        help: "Bytes received.",
        kind: MetricKind::Counter,
    },
    FieldSpec {
        suffix: "in_packets",
        label: "nic",
        help: "Packets received.",
        kind: MetricKind::Counter,
    },
    FieldSpec {
        suffix: "out_bytes",
        label: "nic",
        help: "Bytes transmitted.",
        kind: MetricKind::Counter,
    },
    FieldSpec {
        suffix: "out_packets",
        label: "nic",
        help: "Packets transmitted.",
        kind: MetricKind::Counter,
    },
    FieldSpec {
        suffix: "in_errors",
        label: "nic",
        help: "Receive errors.",
        kind: MetricKind::Counter,
    },
];

/// 인터페이스 통계 그룹 스키마
pub static NIC_SCHEMA: GroupSchema = GroupSchema {
    subsystem: "nic",
    fields: &NIC_FIELDS,
    const_labels: &[("source", "dpvs-agent")],
    on_absent: AbsentPolicy::Skip,
};

/// 인터페이스 조회를 엔티티로 바꾸는 피드
pub struct NicFeed<S: StatsSource> {
    source: Arc<S>,
}

impl<S: StatsSource> NicFeed<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

impl<S: StatsSource> EntityFeed for NicFeed<S> {
    fn name(&self) -> &'static str {
        NIC_COLLECTOR
    }

    fn schema(&self) -> &'static GroupSchema {
        &NIC_SCHEMA
    }

    async fn fetch(&self) -> Result<Option<Vec<LiveEntity>>, SourceError> {
        let stats = self.source.list_nic_stats().await?;
        Ok(stats.map(|stats| stats.into_iter().map(live_interface).collect()))
    }

    async fn discover(&self) -> Result<Option<Vec<DiscoveredEntity>>, SourceError> {
        let names = self.source.list_nic_names().await?;
        Ok(names.map(discover_interfaces))
    }
}

/// 인터페이스 이름 목록을 엔티티로 바꿉니다.
pub fn discover_interfaces(names: Vec<String>) -> Vec<DiscoveredEntity> {
    names
        .into_iter()
        .map(|name| DiscoveredEntity::new(name, None))
        .collect()
}

/// NIC_FIELDS 순서의 행. 이름이 없으면 빈 문자열입니다.
fn live_interface(stats: NicDeviceStats) -> LiveEntity {
    LiveEntity {
        values: vec![
            stats.buf_avail,
            stats.buf_inuse,
            stats.in_bytes,
            stats.in_pkts,
            stats.out_bytes,
            stats.out_pkts,
            stats.in_errors,
        ],
        identifier: stats.name.unwrap_or_default(),
    }
}
