//! 연결 통계 수집
//!
//! 가상 서비스(VIP)와 그 아래 실서버(RS)의 연결 수, 바이트, 패킷 카운터를 수집합니다.
//! 실서버는 소속 가상 서비스의 프로토콜을 물려받아 식별자를 만듭니다.
//!
//! 메트릭 이름: `<namespace>_conn_<address>:<port>:<PROTO>_<field>`

use std::sync::Arc;

use crate::descriptor::MetricKind;
use crate::error::SourceError;
use crate::feed::{EntityFeed, LiveEntity};
use crate::identifier::server_identifier;
use crate::model::{ServerStats, VirtualServerSpecExpand, VsResponse};
use crate::registry::DiscoveredEntity;
use crate::schema::{AbsentPolicy, FieldSpec, GroupSchema};
use crate::source::StatsSource;

/// 수집기 이름
pub const CONN_COLLECTOR: &str = "conn";

/// 가상 서비스 역할 표기
pub const ROLE_VIRTUAL_SERVICE: &str = "VIP";

/// 실서버 역할 표기
pub const ROLE_REAL_SERVER: &str = "RS";

static CONN_FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        suffix: "conns",
        label: "conns",
        help: "Connections",
        kind: MetricKind::Counter,
    },
    FieldSpec {
        suffix: "in_bytes",
        label: "inBytes",
        help: "Incoming bytes",
        kind: MetricKind::Counter,
    },
    FieldSpec {
        suffix: "out_bytes",
        label: "outBytes",
        help: "Outgoing bytes",
        kind: MetricKind::Counter,
    },
    FieldSpec {
        suffix: "in_pkts",
        label: "inPkts",
        help: "Incoming packets",
        kind: MetricKind::Counter,
    },
    FieldSpec {
        suffix: "out_pkts",
        label: "outPkts",
        help: "Outgoing packets",
        kind: MetricKind::Counter,
    },
];

/// 연결 통계 그룹 스키마
///
/// 가상 서비스 조회가 통째로 비면 등록된 모든 엔티티를 0으로 내보냅니다.
pub static CONN_SCHEMA: GroupSchema = GroupSchema {
    subsystem: "conn",
    fields: &CONN_FIELDS,
    const_labels: &[],
    on_absent: AbsentPolicy::ZeroFill,
};

/// 가상 서비스 조회를 연결 엔티티로 바꾸는 피드
pub struct ConnFeed<S: StatsSource> {
    source: Arc<S>,
}

impl<S: StatsSource> ConnFeed<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

impl<S: StatsSource> EntityFeed for ConnFeed<S> {
    fn name(&self) -> &'static str {
        CONN_COLLECTOR
    }

    fn schema(&self) -> &'static GroupSchema {
        &CONN_SCHEMA
    }

    async fn fetch(&self) -> Result<Option<Vec<LiveEntity>>, SourceError> {
        let services = self.source.list_virtual_services().await?;
        Ok(services.and_then(live_connections))
    }

    async fn discover(&self) -> Result<Option<Vec<DiscoveredEntity>>, SourceError> {
        let services = self.source.list_virtual_services().await?;
        Ok(services.map(|resp| discover_connections(&resp)))
    }
}

/// 가상 서비스 목록에서 VIP와 RS 엔티티를 찾습니다.
pub fn discover_connections(resp: &VsResponse) -> Vec<DiscoveredEntity> {
    let mut entities = Vec::new();
    for vs in resp.items.iter().flatten() {
        entities.push(DiscoveredEntity::new(
            virtual_service_identifier(vs),
            Some(ROLE_VIRTUAL_SERVICE),
        ));
        for (identifier, _) in real_servers(vs) {
            entities.push(DiscoveredEntity::new(identifier, Some(ROLE_REAL_SERVER)));
        }
    }
    entities
}

/// 가상 서비스 목록을 실시간 엔티티 행으로 바꿉니다.
///
/// `Items`가 없거나 비어 있으면 페이로드 부재(`None`)로 취급합니다.
pub fn live_connections(resp: VsResponse) -> Option<Vec<LiveEntity>> {
    let items = resp.items.filter(|items| !items.is_empty())?;

    let mut rows = Vec::new();
    for vs in &items {
        rows.push(LiveEntity {
            identifier: virtual_service_identifier(vs),
            values: stats_values(vs.stats.as_ref()),
        });
        for (identifier, stats) in real_servers(vs) {
            rows.push(LiveEntity {
                identifier,
                values: stats_values(stats),
            });
        }
    }
    Some(rows)
}

fn virtual_service_identifier(vs: &VirtualServerSpecExpand) -> String {
    server_identifier(vs.addr.as_deref(), vs.port, vs.proto)
}

/// (식별자, 통계) 쌍. 실서버는 가상 서비스의 프로토콜을 사용합니다.
fn real_servers(
    vs: &VirtualServerSpecExpand,
) -> impl Iterator<Item = (String, Option<&ServerStats>)> {
    vs.rss
        .iter()
        .flat_map(|list| list.items.iter().flatten())
        .map(move |rs| {
            let spec = rs.spec.as_ref();
            let identifier = server_identifier(
                spec.and_then(|s| s.ip.as_deref()),
                spec.and_then(|s| s.port),
                vs.proto,
            );
            (identifier, rs.stats.as_ref())
        })
}

/// CONN_FIELDS 순서의 값
fn stats_values(stats: Option<&ServerStats>) -> Vec<Option<i64>> {
    match stats {
        Some(s) => vec![s.conns, s.in_bytes, s.out_bytes, s.in_pkts, s.out_pkts],
        None => vec![None; CONN_FIELDS.len()],
    }
}
