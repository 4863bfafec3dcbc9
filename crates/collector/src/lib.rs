//! DPVS 통계 수집기
//!
//! dpvs-agent에서 가상 서비스/실서버 연결 통계와 DPDK 인터페이스 통계를 읽어
//! 식별자별 메트릭 샘플로 바꿉니다. 메트릭 이름에 엔티티 식별자가 들어가므로
//! 디스크립터는 시작 시점 디스커버리로 미리 만들어 레지스트리에 보관합니다.
//!
//! # Module Structure
//!
//! - [`error`]: 조회 에러 (`SourceError`)
//! - [`identifier`]: 서버 식별자 생성 (`server_identifier`)
//! - [`descriptor`]: 메트릭 디스크립터와 샘플 (`MetricDesc`, `MetricSample`)
//! - [`schema`]: 그룹별 필드 정의 (`GroupSchema`, `FieldSpec`)
//! - [`registry`]: 식별자 → 디스크립터 묶음 (`DescriptorRegistry`, `SharedRegistry`)
//! - [`outcome`]: 수집 사이클 결과 (`CycleOutcome`)
//! - [`feed`]: 업스트림 조회 → 엔티티 행 (`EntityFeed`)
//! - [`group`]: 범용 그룹 수집기 (`GroupCollector`)
//! - [`conn`]: 연결 통계 (`ConnFeed`, `CONN_SCHEMA`)
//! - [`nic`]: 인터페이스 통계 (`NicFeed`, `NIC_SCHEMA`)
//! - [`composite`]: 복합 수집기 (`DpvsCollector`, `DpvsCollectorBuilder`)
//! - [`model`]: dpvs-agent JSON 모델
//! - [`source`]: 통계 소스 추상화 (`StatsSource`)
//! - [`agent`]: dpvs-agent HTTP 클라이언트 (`DpvsAgentClient`)
//! - [`exposition`]: Prometheus 텍스트 렌더링 (`render_exposition`)
//!
//! # Architecture
//!
//! ```text
//! dpvs-agent --HTTP--> DpvsAgentClient (StatsSource)
//!                          |
//!              +-----------+-----------+
//!              |                       |
//!        ConnFeed                 NicFeed
//!              |                       |
//!   GroupCollector<conn>     GroupCollector<nic>
//!              |                       |
//!              +------ DpvsCollector --+
//!                          |
//!                  render_exposition()
//! ```

pub mod agent;
pub mod composite;
pub mod conn;
pub mod descriptor;
pub mod error;
pub mod exposition;
pub mod feed;
pub mod group;
pub mod identifier;
pub mod model;
pub mod nic;
pub mod outcome;
pub mod registry;
pub mod schema;
pub mod source;

// --- 주요 타입 re-export ---

// 복합 수집기
pub use composite::{DiscoverySummary, DpvsCollector, DpvsCollectorBuilder, ScrapeReport};

// 그룹 수집기
pub use group::GroupCollector;
pub use outcome::CycleOutcome;

// 에러
pub use error::SourceError;

// 식별자, 디스크립터, 레지스트리
pub use descriptor::{MetricDesc, MetricKind, MetricSample, build_fq_name};
pub use identifier::{Protocol, server_identifier};
pub use registry::{DescriptorRegistry, DiscoveredEntity, SharedRegistry, emit_defaults};

// 피드
pub use conn::{CONN_SCHEMA, ConnFeed};
pub use feed::{EntityFeed, LiveEntity};
pub use nic::{NIC_SCHEMA, NicFeed};

// 소스
pub use agent::DpvsAgentClient;
pub use source::StatsSource;

// 렌더링
pub use exposition::render_exposition;
