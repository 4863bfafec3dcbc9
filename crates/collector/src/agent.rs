//! DPVS agent HTTP 클라이언트
//!
//! dpvs-agent의 REST API에서 가상 서비스와 인터페이스 통계를 읽어옵니다.
//! 빈 본문은 에러가 아니라 페이로드 부재(`Ok(None)`)로 취급합니다.

use std::time::Duration;

use dpvs_exporter_core::config::AgentConfig;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::SourceError;
use crate::model::{NicDeviceStats, NicStatsResponse, VsResponse};
use crate::source::StatsSource;

/// 기본 agent 주소
pub const DEFAULT_SERVER: &str = "localhost:53225";

/// 가상 서비스 목록 경로
pub const VIRTUAL_SERVICES_PATH: &str = "/v2/vs";

/// 인터페이스 통계 경로
pub const NIC_STATS_PATH: &str = "/v2/device/name/nic?verbose=false&stats=true";

/// dpvs-agent 클라이언트
#[derive(Debug, Clone)]
pub struct DpvsAgentClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl DpvsAgentClient {
    /// `server`는 `host:port` 형식입니다. 비어 있으면 [`DEFAULT_SERVER`]를 사용합니다.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, SourceError> {
        let server = if server.trim().is_empty() {
            DEFAULT_SERVER
        } else {
            server.trim()
        };
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            base_url: format!("http://{server}"),
            timeout,
        })
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, SourceError> {
        Self::new(&config.server, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, SourceError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = url.as_str(), "querying dpvs-agent");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.request_error(e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| SourceError::Decode(format!("{url}: {e}")))
    }

    fn request_error(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout {
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

impl StatsSource for DpvsAgentClient {
    async fn list_virtual_services(&self) -> Result<Option<VsResponse>, SourceError> {
        self.get_json(VIRTUAL_SERVICES_PATH).await
    }

    async fn list_nic_stats(&self) -> Result<Option<Vec<NicDeviceStats>>, SourceError> {
        let resp: Option<NicStatsResponse> = self.get_json(NIC_STATS_PATH).await?;
        Ok(resp.map(NicStatsResponse::into_labeled_stats))
    }

    async fn list_nic_names(&self) -> Result<Option<Vec<String>>, SourceError> {
        let resp: Option<NicStatsResponse> = self.get_json(NIC_STATS_PATH).await?;
        Ok(resp.map(NicStatsResponse::into_names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_server_falls_back_to_default() {
        let client = DpvsAgentClient::new("  ", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:53225");
    }

    #[test]
    fn from_config_uses_server_address() {
        let config = AgentConfig {
            server: "10.1.1.1:8082".to_owned(),
            timeout_secs: 3,
        };
        let client = DpvsAgentClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://10.1.1.1:8082");
        assert_eq!(client.timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn unreachable_agent_is_a_transport_error() {
        // 127.0.0.1:1 은 일반적으로 열려 있지 않음
        let client = DpvsAgentClient::new("127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let err = client.list_virtual_services().await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Transport(_) | SourceError::Timeout { .. }
        ));
    }
}
