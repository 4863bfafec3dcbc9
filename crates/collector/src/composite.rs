//! 복합 수집기
//!
//! [`DpvsCollector`]는 연결 통계 수집기와 인터페이스 통계 수집기를 하나의
//! describe/collect 계약으로 묶어 서빙 레이어에 노출합니다.
//!
//! # 장애 격리
//!
//! 두 하위 수집기는 각자의 태스크에서 동시에 실행됩니다. 한쪽이 패닉하더라도
//! `JoinError`로 잡혀 [`CycleOutcome::Faulted`]가 되고, 다른 쪽의 샘플은 그대로 반환됩니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! let collector = DpvsCollector::builder()
//!     .source(Arc::new(DpvsAgentClient::from_config(&config.agent)?))
//!     .config(&config)
//!     .build()?;
//!
//! collector.discover().await?;
//! let report = collector.collect().await;
//! ```

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dpvs_exporter_core::config::ExporterConfig;
use dpvs_exporter_core::error::{ConfigError, ExporterError};
use dpvs_exporter_core::metrics as m;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::conn::{CONN_COLLECTOR, ConnFeed};
use crate::descriptor::{MetricDesc, MetricSample};
use crate::error::SourceError;
use crate::feed::EntityFeed;
use crate::group::{DEFAULT_FETCH_TIMEOUT, GroupCollector};
use crate::nic::{NIC_COLLECTOR, NicFeed};
use crate::outcome::CycleOutcome;
use crate::registry::DiscoveredEntity;
use crate::source::StatsSource;

/// 복합 수집 한 번의 결과
#[derive(Debug)]
pub struct ScrapeReport {
    /// 연결 통계 수집 결과
    pub conn: CycleOutcome,
    /// 인터페이스 통계 수집 결과
    pub nic: CycleOutcome,
    /// 전체 소요 시간
    pub elapsed: Duration,
}

impl ScrapeReport {
    /// 연결 통계, 인터페이스 통계 순서로 이어 붙인 샘플
    pub fn samples(&self) -> impl Iterator<Item = &MetricSample> {
        self.conn.samples().iter().chain(self.nic.samples())
    }

    pub fn sample_count(&self) -> usize {
        self.conn.samples().len() + self.nic.samples().len()
    }

    /// (수집기 이름, 결과) 쌍
    pub fn outcomes(&self) -> [(&'static str, &CycleOutcome); 2] {
        [(CONN_COLLECTOR, &self.conn), (NIC_COLLECTOR, &self.nic)]
    }
}

/// 디스커버리 결과. `None`은 페이로드 부재로 레지스트리를 유지했음을 뜻합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverySummary {
    /// 등록된 연결 엔티티 수
    pub conn_entities: Option<usize>,
    /// 등록된 인터페이스 수
    pub nic_entities: Option<usize>,
}

/// 연결 통계와 인터페이스 통계를 묶은 수집기
pub struct DpvsCollector<S: StatsSource> {
    conn: Arc<GroupCollector<ConnFeed<S>>>,
    nic: Arc<GroupCollector<NicFeed<S>>>,
}

impl<S: StatsSource> DpvsCollector<S> {
    pub fn builder() -> DpvsCollectorBuilder<S> {
        DpvsCollectorBuilder::new()
    }

    pub fn conn(&self) -> &GroupCollector<ConnFeed<S>> {
        &self.conn
    }

    pub fn nic(&self) -> &GroupCollector<NicFeed<S>> {
        &self.nic
    }

    /// 두 레지스트리에 등록된 모든 디스크립터 (연결 통계 먼저)
    pub fn describe(&self) -> Vec<Arc<MetricDesc>> {
        let mut descs = self.conn.describe();
        descs.extend(self.nic.describe());
        descs
    }

    /// 두 하위 수집기를 동시에 실행하고 결과를 모읍니다.
    ///
    /// 어떤 경우에도 에러를 반환하지 않습니다.
    pub async fn collect(&self) -> ScrapeReport {
        let started = Instant::now();

        let conn = Arc::clone(&self.conn);
        let nic = Arc::clone(&self.nic);
        let conn_task = tokio::spawn(async move { conn.collect().await });
        let nic_task = tokio::spawn(async move { nic.collect().await });
        let (conn_result, nic_result) = tokio::join!(conn_task, nic_task);

        let report = ScrapeReport {
            conn: contain(CONN_COLLECTOR, conn_result),
            nic: contain(NIC_COLLECTOR, nic_result),
            elapsed: started.elapsed(),
        };

        for (collector, outcome) in report.outcomes() {
            metrics::counter!(
                m::SCRAPES_TOTAL,
                m::LABEL_COLLECTOR => collector,
                m::LABEL_OUTCOME => outcome.label()
            )
            .increment(1);
        }
        metrics::histogram!(m::SCRAPE_DURATION_SECONDS).record(report.elapsed.as_secs_f64());

        report
    }

    /// agent에서 현재 토폴로지를 조회해 두 레지스트리를 교체합니다.
    ///
    /// 어느 한쪽이라도 조회에 실패하면 아무것도 교체하지 않고 에러를 반환합니다.
    /// 페이로드가 없는 쪽은 기존 레지스트리를 유지합니다.
    pub async fn discover(&self) -> Result<DiscoverySummary, SourceError> {
        let (conn, nic) = tokio::join!(self.conn.discover(), self.nic.discover());
        let (conn, nic) = (conn?, nic?);

        let summary = DiscoverySummary {
            conn_entities: apply(&self.conn, conn),
            nic_entities: apply(&self.nic, nic),
        };
        metrics::counter!(m::REGISTRY_REBUILDS_TOTAL).increment(1);
        info!(
            conn_entities = ?summary.conn_entities,
            nic_entities = ?summary.nic_entities,
            "discovery completed"
        );
        Ok(summary)
    }
}

/// 조회된 토폴로지로 레지스트리를 교체합니다. 페이로드가 없으면 기존 레지스트리를 유지합니다.
fn apply<F: EntityFeed>(
    collector: &GroupCollector<F>,
    entities: Option<Vec<DiscoveredEntity>>,
) -> Option<usize> {
    match entities {
        Some(entities) => Some(collector.initialize(entities)),
        None => {
            warn!(
                collector = collector.name(),
                "dpvs-agent returned no topology, keeping current registry"
            );
            None
        }
    }
}

/// 하위 수집 태스크의 패닉을 `Faulted`로 바꿉니다.
fn contain(collector: &'static str, result: Result<CycleOutcome, JoinError>) -> CycleOutcome {
    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            let reason = if e.is_panic() {
                panic_message(e.into_panic())
            } else {
                e.to_string()
            };
            warn!(collector, reason = reason.as_str(), "collector fault contained");
            metrics::counter!(m::COLLECTOR_FAULTS_TOTAL, m::LABEL_COLLECTOR => collector)
                .increment(1);
            CycleOutcome::Faulted { reason }
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panic: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panic: {msg}")
    } else {
        "panic: <non-string payload>".to_owned()
    }
}

/// 복합 수집기 빌더
pub struct DpvsCollectorBuilder<S: StatsSource> {
    source: Option<Arc<S>>,
    namespace: String,
    fetch_timeout: Duration,
    zero_fill_on_error: bool,
}

impl<S: StatsSource> DpvsCollectorBuilder<S> {
    pub fn new() -> Self {
        Self {
            source: None,
            namespace: "dpvs".to_owned(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            zero_fill_on_error: true,
        }
    }

    /// 통계 소스를 설정합니다. 두 하위 수집기가 공유합니다.
    pub fn source(mut self, source: Arc<S>) -> Self {
        self.source = Some(source);
        self
    }

    /// 익스포터 설정에서 네임스페이스, 타임아웃, 0 대체 여부를 가져옵니다.
    pub fn config(mut self, config: &ExporterConfig) -> Self {
        self.namespace = config.metrics.namespace.clone();
        self.fetch_timeout = config.agent.timeout();
        self.zero_fill_on_error = config.collector.zero_fill_on_error;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn zero_fill_on_error(mut self, enabled: bool) -> Self {
        self.zero_fill_on_error = enabled;
        self
    }

    /// 빈 레지스트리로 수집기를 만듭니다. [`DpvsCollector::discover`]로 채웁니다.
    pub fn build(self) -> Result<DpvsCollector<S>, ExporterError> {
        let source = self.source.ok_or_else(|| ConfigError::InvalidValue {
            field: "source".to_owned(),
            reason: "stats source must be provided".to_owned(),
        })?;

        let conn = GroupCollector::new(ConnFeed::new(Arc::clone(&source)), self.namespace.clone())
            .with_fetch_timeout(self.fetch_timeout)
            .with_zero_fill_on_error(self.zero_fill_on_error);
        let nic = GroupCollector::new(NicFeed::new(source), self.namespace)
            .with_fetch_timeout(self.fetch_timeout)
            .with_zero_fill_on_error(self.zero_fill_on_error);

        Ok(DpvsCollector {
            conn: Arc::new(conn),
            nic: Arc::new(nic),
        })
    }
}

impl<S: StatsSource> Default for DpvsCollectorBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
