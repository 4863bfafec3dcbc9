//! 엔티티 피드
//!
//! [`EntityFeed`]는 업스트림 조회 하나를 레지스트리가 이해하는 행으로 바꿉니다.
//! 수집 시에는 [`LiveEntity`](식별자 + 필드 순서의 값)를, 디스커버리 시에는
//! [`DiscoveredEntity`]를 돌려줍니다.

use std::future::Future;

use crate::error::SourceError;
use crate::registry::DiscoveredEntity;
use crate::schema::GroupSchema;

/// 한 사이클에서 관측된 엔티티
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveEntity {
    /// 조인 키
    pub identifier: String,
    /// 스키마 필드 순서의 값 (없으면 `None`)
    pub values: Vec<Option<i64>>,
}

/// 업스트림 조회를 엔티티 행으로 바꾸는 트레이트
pub trait EntityFeed: Send + Sync + 'static {
    /// 수집기 이름 (로그와 자체 메트릭 레이블)
    fn name(&self) -> &'static str;

    /// 이 피드가 채우는 그룹 스키마
    fn schema(&self) -> &'static GroupSchema;

    /// 현재 통계. `Ok(None)`은 페이로드 부재입니다.
    fn fetch(&self) -> impl Future<Output = Result<Option<Vec<LiveEntity>>, SourceError>> + Send;

    /// 현재 토폴로지. `Ok(None)`은 페이로드 부재입니다.
    fn discover(
        &self,
    ) -> impl Future<Output = Result<Option<Vec<DiscoveredEntity>>, SourceError>> + Send;
}
