//! 범용 그룹 수집기
//!
//! [`GroupCollector`]는 "식별자 → 고정된 메트릭 묶음" 수집기의 describe/collect/재초기화를
//! 한 번만 구현합니다. 연결 통계와 인터페이스 통계는 [`EntityFeed`] 구현만 다릅니다.
//!
//! # 수집 사이클
//! ```text
//! snapshot(registry) ─▶ fetch (timeout) ─┬─ Err  ─▶ zero_fill_on_error && ZeroFill ? Defaulted : Skipped
//!                                        ├─ None ─▶ ZeroFill ? Defaulted : Skipped
//!                                        └─ Some ─▶ registry 매칭 ─▶ Collected
//! ```
//! 레지스트리에 없는 식별자는 조용히 건너뜁니다. describe가 내놓지 않은 디스크립터는
//! 절대 내보내지 않습니다.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dpvs_exporter_core::metrics as m;
use tracing::{debug, info, warn};

use crate::descriptor::{MetricDesc, MetricSample};
use crate::error::SourceError;
use crate::feed::EntityFeed;
use crate::outcome::CycleOutcome;
use crate::registry::{DescriptorRegistry, DiscoveredEntity, SharedRegistry, emit_defaults};
use crate::schema::AbsentPolicy;

/// 업스트림 조회 기본 타임아웃
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// 페이로드 부재 시 사유 문자열
const EMPTY_PAYLOAD: &str = "empty payload from dpvs-agent";

/// 피드 하나와 그 레지스트리를 묶은 수집기
pub struct GroupCollector<F: EntityFeed> {
    feed: F,
    namespace: String,
    registry: SharedRegistry,
    fetch_timeout: Duration,
    zero_fill_on_error: bool,
}

impl<F: EntityFeed> GroupCollector<F> {
    /// 빈 레지스트리로 수집기를 생성합니다.
    pub fn new(feed: F, namespace: impl Into<String>) -> Self {
        let registry = SharedRegistry::new(DescriptorRegistry::empty(feed.schema()));
        Self {
            feed,
            namespace: namespace.into(),
            registry,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            zero_fill_on_error: true,
        }
    }

    /// 조회 타임아웃을 설정합니다.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// 조회 실패 시 0 대체 여부를 설정합니다.
    ///
    /// 스키마의 부재 정책이 `ZeroFill`일 때만 의미가 있습니다.
    pub fn with_zero_fill_on_error(mut self, enabled: bool) -> Self {
        self.zero_fill_on_error = enabled;
        self
    }

    pub fn name(&self) -> &'static str {
        self.feed.name()
    }

    /// 현재 레지스트리 스냅샷
    pub fn registry(&self) -> Arc<DescriptorRegistry> {
        self.registry.snapshot()
    }

    /// 엔티티 목록으로 새 레지스트리를 만들어 교체합니다. 등록된 엔티티 수를 반환합니다.
    pub fn initialize(&self, entities: impl IntoIterator<Item = DiscoveredEntity>) -> usize {
        let registry = DescriptorRegistry::build(self.feed.schema(), &self.namespace, entities);
        let count = registry.len();
        self.registry.replace(registry);

        #[allow(clippy::cast_precision_loss)]
        metrics::gauge!(m::REGISTERED_ENTITIES, m::LABEL_COLLECTOR => self.name()).set(count as f64);
        info!(collector = self.name(), entities = count, "descriptor registry rebuilt");
        count
    }

    /// 피드에서 현재 토폴로지를 조회합니다. 레지스트리는 건드리지 않습니다.
    pub async fn discover(&self) -> Result<Option<Vec<DiscoveredEntity>>, SourceError> {
        self.bounded(self.feed.discover()).await
    }

    /// 현재 등록된 모든 디스크립터
    pub fn describe(&self) -> Vec<Arc<MetricDesc>> {
        self.registry.snapshot().descriptors().cloned().collect()
    }

    /// 한 사이클을 수집합니다. 에러는 전파하지 않고 결과로 돌려줍니다.
    pub async fn collect(&self) -> CycleOutcome {
        let registry = self.registry.snapshot();
        let name = self.name();
        let policy = registry.schema().on_absent;

        match self.bounded(self.feed.fetch()).await {
            Err(e) => {
                warn!(collector = name, error = %e, "failed to fetch stats from dpvs-agent");
                metrics::counter!(m::SOURCE_ERRORS_TOTAL, m::LABEL_COLLECTOR => name).increment(1);

                if self.zero_fill_on_error && policy == AbsentPolicy::ZeroFill {
                    CycleOutcome::Defaulted {
                        samples: emit_defaults(&registry),
                        reason: e.to_string(),
                    }
                } else {
                    CycleOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
            }
            Ok(None) => {
                debug!(collector = name, "dpvs-agent returned no data");
                match policy {
                    AbsentPolicy::ZeroFill => CycleOutcome::Defaulted {
                        samples: emit_defaults(&registry),
                        reason: EMPTY_PAYLOAD.to_owned(),
                    },
                    AbsentPolicy::Skip => CycleOutcome::Skipped {
                        reason: EMPTY_PAYLOAD.to_owned(),
                    },
                }
            }
            Ok(Some(live)) => {
                let mut samples: Vec<MetricSample> =
                    Vec::with_capacity(live.len() * registry.schema().width());
                for entity in live {
                    match registry.get(&entity.identifier) {
                        Some(group) => samples.extend(group.samples(&entity.values)),
                        None => debug!(
                            collector = name,
                            identifier = entity.identifier.as_str(),
                            "skipping unregistered entity"
                        ),
                    }
                }
                CycleOutcome::Collected { samples }
            }
        }
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, SourceError>>,
    ) -> Result<T, SourceError> {
        match tokio::time::timeout(self.fetch_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                after_ms: u64::try_from(self.fetch_timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
