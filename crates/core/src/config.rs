//! 설정 관리 -- dpvs-exporter.toml 파싱 및 런타임 설정
//!
//! [`ExporterConfig`]는 익스포터 전체 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`DPVS_EXPORTER_AGENT_SERVER=10.0.0.1:53225` 형식)
//! 3. 설정 파일 (`dpvs-exporter.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), dpvs_exporter_core::error::ExporterError> {
//! use dpvs_exporter_core::config::ExporterConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = ExporterConfig::load("dpvs-exporter.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = ExporterConfig::parse("[agent]\nserver = \"10.0.0.1:53225\"")?;
//! # Ok(())
//! # }
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, ExporterError};

/// dpvs-exporter 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// 일반 설정 (로깅)
    #[serde(default)]
    pub general: GeneralConfig,
    /// DPVS agent 연결 설정
    #[serde(default)]
    pub agent: AgentConfig,
    /// 메트릭 노출 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// 수집기 동작 설정
    #[serde(default)]
    pub collector: CollectorConfig,
}

impl ExporterConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ExporterError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ExporterError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ExporterError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                ExporterError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, ExporterError> {
        toml::from_str(toml_str).map_err(|e| {
            ExporterError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `DPVS_EXPORTER_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(
            &mut self.general.log_level,
            "DPVS_EXPORTER_GENERAL_LOG_LEVEL",
        );
        override_string(
            &mut self.general.log_format,
            "DPVS_EXPORTER_GENERAL_LOG_FORMAT",
        );

        // Agent
        override_string(&mut self.agent.server, "DPVS_EXPORTER_AGENT_SERVER");
        override_u64(
            &mut self.agent.timeout_secs,
            "DPVS_EXPORTER_AGENT_TIMEOUT_SECS",
        );

        // Metrics
        override_string(
            &mut self.metrics.listen_addr,
            "DPVS_EXPORTER_METRICS_LISTEN_ADDR",
        );
        override_u16(&mut self.metrics.port, "DPVS_EXPORTER_METRICS_PORT");
        override_string(&mut self.metrics.endpoint, "DPVS_EXPORTER_METRICS_ENDPOINT");
        override_string(
            &mut self.metrics.namespace,
            "DPVS_EXPORTER_METRICS_NAMESPACE",
        );

        // Collector
        override_bool(
            &mut self.collector.zero_fill_on_error,
            "DPVS_EXPORTER_COLLECTOR_ZERO_FILL_ON_ERROR",
        );
        override_u64(
            &mut self.collector.rediscover_interval_secs,
            "DPVS_EXPORTER_COLLECTOR_REDISCOVER_INTERVAL_SECS",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ExporterError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        // agent 검증
        if self.agent.server.trim().is_empty() {
            return Err(invalid("agent.server", "must not be empty".to_owned()));
        }
        if self.agent.server.contains("://") {
            return Err(invalid(
                "agent.server",
                "must be host:port without a scheme".to_owned(),
            ));
        }
        if self.agent.timeout_secs == 0 {
            return Err(invalid(
                "agent.timeout_secs",
                "must be greater than 0".to_owned(),
            ));
        }

        // metrics 검증
        self.metrics.socket_addr()?;
        if self.metrics.port == 0 {
            return Err(invalid("metrics.port", "must not be 0".to_owned()));
        }
        if !self.metrics.endpoint.starts_with('/') || self.metrics.endpoint.len() < 2 {
            return Err(invalid(
                "metrics.endpoint",
                "must be an absolute path other than '/'".to_owned(),
            ));
        }
        if !is_valid_namespace(&self.metrics.namespace) {
            return Err(invalid(
                "metrics.namespace",
                "must be non-empty, use only [a-zA-Z0-9_] and not start with a digit".to_owned(),
            ));
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// DPVS agent 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// agent 주소 (host:port, 스킴 없음)
    pub server: String,
    /// 요청당 타임아웃 (초)
    pub timeout_secs: u64,
}

impl AgentConfig {
    /// 요청 타임아웃을 `Duration`으로 반환합니다.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            server: "localhost:53225".to_owned(),
            timeout_secs: 10,
        }
    }
}

/// 메트릭 노출 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 수신 IP 주소
    pub listen_addr: String,
    /// 수신 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
    /// 메트릭 이름 네임스페이스 (`<namespace>_conn_...`)
    pub namespace: String,
}

impl MetricsConfig {
    /// `listen_addr`와 `port`를 소켓 주소로 변환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, ExporterError> {
        let ip: IpAddr = self.listen_addr.parse().map_err(|e| {
            invalid(
                "metrics.listen_addr",
                format!("'{}' is not an IP address: {e}", self.listen_addr),
            )
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// `host:port` 형식의 수신 주소를 적용합니다.
    ///
    /// 호스트가 비어 있으면 (`:9101`) 모든 인터페이스(`0.0.0.0`)에서 수신합니다.
    /// IPv6 주소는 `[::1]:9101`처럼 대괄호로 감쌉니다.
    pub fn set_listen_address(&mut self, address: &str) -> Result<(), ExporterError> {
        let (host, port) = address.rsplit_once(':').ok_or_else(|| {
            invalid(
                "web.listen-address",
                format!("'{address}' is not in host:port form"),
            )
        })?;
        let port: u16 = port.parse().map_err(|e| {
            invalid(
                "web.listen-address",
                format!("invalid port '{port}': {e}"),
            )
        })?;
        let host = host.trim_start_matches('[').trim_end_matches(']');

        self.listen_addr = if host.is_empty() {
            "0.0.0.0".to_owned()
        } else {
            host.to_owned()
        };
        self.port = port;
        Ok(())
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_owned(),
            port: 9101,
            endpoint: "/metrics".to_owned(),
            namespace: "dpvs".to_owned(),
        }
    }
}

/// 수집기 동작 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// agent 조회가 실패했을 때 등록된 연결 메트릭을 0으로 내보낼지 여부
    pub zero_fill_on_error: bool,
    /// 레지스트리 재구성 주기 (초, 0이면 비활성)
    pub rediscover_interval_secs: u64,
}

impl CollectorConfig {
    /// 재구성 주기를 반환합니다. 비활성이면 `None`.
    pub fn rediscover_interval(&self) -> Option<Duration> {
        (self.rediscover_interval_secs > 0)
            .then(|| Duration::from_secs(self.rediscover_interval_secs))
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            zero_fill_on_error: true,
            rediscover_interval_secs: 0,
        }
    }
}

fn invalid(field: &str, reason: String) -> ExporterError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

fn is_valid_namespace(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
