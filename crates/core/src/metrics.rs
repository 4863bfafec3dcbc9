//! 자체 메트릭 상수 및 설명 등록
//!
//! 익스포터 자신의 동작 상태(스크레이프 결과, agent 조회 실패, 레지스트리 재구성)를
//! 나타내는 메트릭 이름을 중앙에서 정의합니다. DPVS 엔티티별 메트릭은
//! 디스커버리 결과에 따라 동적으로 만들어지므로 여기에 없습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `dpvs_exporter_`
//! - 접미어: `_total` (counter), `_seconds` (histogram), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use dpvs_exporter_core::metrics as m;
//!
//! metrics::counter!(m::SOURCE_ERRORS_TOTAL, m::LABEL_COLLECTOR => "conn").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 수집기 레이블 키 (conn, nic)
pub const LABEL_COLLECTOR: &str = "collector";

/// 사이클 결과 레이블 키 (collected, defaulted, skipped, faulted)
pub const LABEL_OUTCOME: &str = "outcome";

// ─── 수집 사이클 메트릭 ─────────────────────────────────────────────

/// 수집기별 스크레이프 사이클 수 (counter, labels: collector, outcome)
pub const SCRAPES_TOTAL: &str = "dpvs_exporter_scrapes_total";

/// agent 조회 실패 수 (counter, label: collector)
pub const SOURCE_ERRORS_TOTAL: &str = "dpvs_exporter_source_errors_total";

/// 수집 중 복구된 런타임 장애 수 (counter, label: collector)
pub const COLLECTOR_FAULTS_TOTAL: &str = "dpvs_exporter_collector_faults_total";

/// 전체 스크레이프 소요 시간 (histogram, 초)
pub const SCRAPE_DURATION_SECONDS: &str = "dpvs_exporter_scrape_duration_seconds";

// ─── 레지스트리 메트릭 ──────────────────────────────────────────────

/// 레지스트리에 등록된 엔티티 수 (gauge, label: collector)
pub const REGISTERED_ENTITIES: &str = "dpvs_exporter_registered_entities";

/// 레지스트리 재구성 수 (counter)
pub const REGISTRY_REBUILDS_TOTAL: &str = "dpvs_exporter_registry_rebuilds_total";

// ─── 데몬 메트릭 ────────────────────────────────────────────────────

/// 빌드 정보 (gauge, 항상 1, label: version)
pub const BUILD_INFO: &str = "dpvs_exporter_build_info";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 스크레이프 소요 시간 버킷 (초)
///
/// 1ms ~ 10s 범위, agent 타임아웃 기본값(10초)까지 포함
pub const SCRAPE_DURATION_BUCKETS: [f64; 9] = [0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 자체 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(
        SCRAPES_TOTAL,
        "Collection cycles per collector and outcome"
    );
    describe_counter!(
        SOURCE_ERRORS_TOTAL,
        "Failed DPVS agent queries per collector"
    );
    describe_counter!(
        COLLECTOR_FAULTS_TOTAL,
        "Runtime faults contained at the collector boundary"
    );
    describe_histogram!(
        SCRAPE_DURATION_SECONDS,
        "Time to run one full collection pass in seconds"
    );
    describe_gauge!(
        REGISTERED_ENTITIES,
        "Entities currently described by each collector's registry"
    );
    describe_counter!(
        REGISTRY_REBUILDS_TOTAL,
        "Number of times the descriptor registries were rebuilt"
    );
    describe_gauge!(
        BUILD_INFO,
        "Build information (always 1, with version label)"
    );
}
