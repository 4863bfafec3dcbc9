//! 에러 타입 -- 도메인별 에러 정의

/// dpvs-exporter 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum ExporterError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// DPVS agent 조회 에러
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// DPVS agent 조회 에러
///
/// 수집 사이클 안에서는 로그로만 남고 전파되지 않습니다.
/// 시작 시점의 디스커버리처럼 실패가 치명적인 경로에서만 이 타입으로 올라옵니다.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// 요청 전송 또는 응답 수신 실패 (타임아웃 포함)
    #[error("request failed: {0}")]
    Request(String),

    /// 응답 본문 디코딩 실패
    #[error("decode failed: {0}")]
    Decode(String),
}
