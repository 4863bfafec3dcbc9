//! DPVS 통계 소스 추상화
//!
//! [`StatsSource`] 트레이트는 수집기가 사용하는 읽기 전용 조회 세 가지를 추상화합니다.
//! 운영 환경에서는 [`DpvsAgentClient`](crate::agent::DpvsAgentClient)를,
//! 테스트에서는 `MockStatsSource`를 사용합니다.
//!
//! ```text
//! ┌──────────────────┐
//! │   DpvsCollector  │
//! └────────┬─────────┘
//!          ▼
//!   ┌─────────────┐
//!   │ StatsSource │ (trait)
//!   └─────────────┘
//!       │      │
//!       ▼      ▼
//!  ┌────────┐ ┌──────┐
//!  │ Agent  │ │ Mock │
//!  └───┬────┘ └──────┘
//!      ▼
//!  dpvs-agent (HTTP)
//! ```
//!
//! # 부재와 에러의 구분
//!
//! 모든 조회는 `Result<Option<T>, SourceError>`를 반환합니다.
//! `Ok(None)`은 "응답은 왔지만 데이터가 없음"이며 에러가 아닙니다.

use std::future::Future;

use crate::error::SourceError;
use crate::model::{NicDeviceStats, VsResponse};

/// DPVS 통계 조회 트레이트
///
/// `Send + Sync + 'static`이므로 `Arc`로 감싸 여러 수집 태스크에서 공유할 수 있습니다.
pub trait StatsSource: Send + Sync + 'static {
    /// 가상 서비스 목록 (실서버와 통계 포함)
    fn list_virtual_services(
        &self,
    ) -> impl Future<Output = Result<Option<VsResponse>, SourceError>> + Send;

    /// 인터페이스별 통계. 각 항목의 `name`은 채워진 상태입니다.
    fn list_nic_stats(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<NicDeviceStats>>, SourceError>> + Send;

    /// 인터페이스 이름 목록
    fn list_nic_names(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<String>>, SourceError>> + Send;
}

/// 테스트용 Mock 통계 소스
///
/// 설정한 응답을 그대로 돌려주며, 실패나 패닉도 주입할 수 있습니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockStatsSource {
    /// list_virtual_services 응답
    pub services: Option<VsResponse>,
    /// list_nic_stats 응답
    pub nic_stats: Option<Vec<NicDeviceStats>>,
    /// list_nic_names 응답
    pub nic_names: Option<Vec<String>>,
    /// 가상 서비스 조회 실패 여부
    pub fail_services: bool,
    /// 인터페이스 조회 실패 여부
    pub fail_nics: bool,
    /// 인터페이스 통계 조회 시 패닉 여부
    pub panic_on_nic_stats: bool,
}

#[cfg(test)]
impl MockStatsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(mut self, services: VsResponse) -> Self {
        self.services = Some(services);
        self
    }

    pub fn with_nic_stats(mut self, stats: Vec<NicDeviceStats>) -> Self {
        self.nic_stats = Some(stats);
        self
    }

    pub fn with_nic_names(mut self, names: &[&str]) -> Self {
        self.nic_names = Some(names.iter().map(|n| (*n).to_owned()).collect());
        self
    }

    pub fn with_failing_services(mut self) -> Self {
        self.fail_services = true;
        self
    }

    pub fn with_failing_nics(mut self) -> Self {
        self.fail_nics = true;
        self
    }

    pub fn with_panicking_nic_stats(mut self) -> Self {
        self.panic_on_nic_stats = true;
        self
    }
}

#[cfg(test)]
impl StatsSource for MockStatsSource {
    async fn list_virtual_services(&self) -> Result<Option<VsResponse>, SourceError> {
        if self.fail_services {
            return Err(SourceError::Transport("mock failure".to_owned()));
        }
        Ok(self.services.clone())
    }

    async fn list_nic_stats(&self) -> Result<Option<Vec<NicDeviceStats>>, SourceError> {
        if self.panic_on_nic_stats {
            panic!("mock nic stats panic");
        }
        if self.fail_nics {
            return Err(SourceError::Transport("mock failure".to_owned()));
        }
        Ok(self.nic_stats.clone())
    }

    async fn list_nic_names(&self) -> Result<Option<Vec<String>>, SourceError> {
        if self.fail_nics {
            return Err(SourceError::Transport("mock failure".to_owned()));
        }
        Ok(self.nic_names.clone())
    }
}
