//! 디스크립터 그룹 스키마
//!
//! 연결 통계와 인터페이스 통계는 "식별자 → 고정된 필드 묶음"이라는 같은 모양을 가집니다.
//! [`GroupSchema`]는 그 차이(서브시스템 이름, 필드 목록, 상수 레이블, 페이로드 부재 시 동작)만
//! 정적으로 기술하고, 나머지 로직은 [`GroupCollector`](crate::group::GroupCollector)가
//! 한 번만 구현합니다.

use crate::descriptor::MetricKind;

/// 그룹 안의 필드 하나
#[derive(Debug)]
pub struct FieldSpec {
    /// 메트릭 이름 접미어 (`<identifier>_<suffix>`)
    pub suffix: &'static str,
    /// 가변 레이블 이름 (값은 식별자)
    pub label: &'static str,
    /// 도움말
    pub help: &'static str,
    /// 메트릭 종류
    pub kind: MetricKind,
}

/// 업스트림 페이로드가 통째로 비었을 때의 동작
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentPolicy {
    /// 등록된 모든 디스크립터를 0으로 내보냄
    ZeroFill,
    /// 아무것도 내보내지 않음
    Skip,
}

/// 디스크립터 그룹 스키마
#[derive(Debug)]
pub struct GroupSchema {
    /// 서브시스템 이름 (`conn`, `nic`)
    pub subsystem: &'static str,
    /// 엔티티마다 만들어지는 필드 (순서가 샘플 순서)
    pub fields: &'static [FieldSpec],
    /// 모든 디스크립터에 붙는 상수 레이블
    pub const_labels: &'static [(&'static str, &'static str)],
    /// 페이로드 부재 시 동작
    pub on_absent: AbsentPolicy,
}

impl GroupSchema {
    /// 엔티티 하나당 디스크립터 수
    pub fn width(&self) -> usize {
        self.fields.len()
    }
}
