//! 수집기 에러 타입
//!
//! [`SourceError`]는 DPVS agent 조회 중 발생하는 모든 에러를 표현합니다.
//! 수집 사이클 안에서는 로그와 카운터로만 남고, 시작 시점 디스커버리처럼
//! 호출자에게 전파해야 하는 경로에서는 `From<SourceError> for ExporterError`로
//! 변환되어 `?` 연산자로 올라갑니다.

use dpvs_exporter_core::error::{ExporterError, UpstreamError};

/// DPVS agent 조회 에러
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 연결 실패, 요청 전송 실패 등 전송 계층 에러
    #[error("transport error: {0}")]
    Transport(String),

    /// 2xx가 아닌 응답
    #[error("unexpected status {status} from {url}")]
    Status {
        /// 요청 URL
        url: String,
        /// HTTP 상태 코드
        status: u16,
    },

    /// 응답 본문 디코딩 실패
    #[error("decode error: {0}")]
    Decode(String),

    /// 조회 시간 초과
    #[error("request timed out after {after_ms}ms")]
    Timeout {
        /// 적용된 타임아웃 (밀리초)
        after_ms: u64,
    },
}

impl From<SourceError> for ExporterError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Decode(msg) => ExporterError::Upstream(UpstreamError::Decode(msg)),
            other => ExporterError::Upstream(UpstreamError::Request(other.to_string())),
        }
    }
}
