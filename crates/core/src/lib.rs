//! dpvs-exporter 공통 크레이트
//!
//! 수집기 크레이트와 데몬이 함께 사용하는 설정, 에러, 자체 메트릭 이름을 정의합니다.

pub mod config;
pub mod error;
pub mod metrics;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, ExporterError, UpstreamError};

// 설정
pub use config::{AgentConfig, CollectorConfig, ExporterConfig, GeneralConfig, MetricsConfig};
