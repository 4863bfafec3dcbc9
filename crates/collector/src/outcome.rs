//! 수집 사이클 결과
//!
//! 수집기는 에러를 호출자에게 전파하지 않는 대신, 어떤 경로로 끝났는지를
//! [`CycleOutcome`]으로 돌려줍니다. 장애 복구 경로도 일반 분기와 똑같이 테스트할 수 있습니다.

use crate::descriptor::MetricSample;

/// 한 수집기의 한 사이클 결과
#[derive(Debug)]
pub enum CycleOutcome {
    /// 실시간 데이터를 레지스트리와 맞춰 내보냄
    Collected {
        /// 내보낸 샘플
        samples: Vec<MetricSample>,
    },
    /// 업스트림 데이터가 없어 등록된 엔티티를 0으로 내보냄
    Defaulted {
        /// 0 값 샘플
        samples: Vec<MetricSample>,
        /// 대체 사유
        reason: String,
    },
    /// 이번 사이클은 아무것도 내보내지 않음
    Skipped {
        /// 건너뛴 사유
        reason: String,
    },
    /// 수집 중 런타임 장애가 발생했고 경계에서 복구됨
    Faulted {
        /// 장애 내용
        reason: String,
    },
}

impl CycleOutcome {
    /// 이 사이클이 내보낸 샘플 (Skipped/Faulted는 빈 슬라이스)
    pub fn samples(&self) -> &[MetricSample] {
        match self {
            Self::Collected { samples } | Self::Defaulted { samples, .. } => samples,
            Self::Skipped { .. } | Self::Faulted { .. } => &[],
        }
    }

    pub fn into_samples(self) -> Vec<MetricSample> {
        match self {
            Self::Collected { samples } | Self::Defaulted { samples, .. } => samples,
            Self::Skipped { .. } | Self::Faulted { .. } => Vec::new(),
        }
    }

    /// 자체 메트릭 `outcome` 레이블 값
    pub fn label(&self) -> &'static str {
        match self {
            Self::Collected { .. } => "collected",
            Self::Defaulted { .. } => "defaulted",
            Self::Skipped { .. } => "skipped",
            Self::Faulted { .. } => "faulted",
        }
    }

    /// 실패 또는 대체 사유
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Collected { .. } => None,
            Self::Defaulted { reason, .. } | Self::Skipped { reason } | Self::Faulted { reason } => {
                Some(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_and_faulted_have_no_samples() {
        let skipped = CycleOutcome::Skipped {
            reason: "agent unreachable".to_owned(),
        };
        let faulted = CycleOutcome::Faulted {
            reason: "panic".to_owned(),
        };
        assert!(skipped.samples().is_empty());
        assert!(faulted.into_samples().is_empty());
        assert_eq!(skipped.reason(), Some("agent unreachable"));
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(
            CycleOutcome::Collected {
                samples: Vec::new()
            }
            .label(),
            "collected"
        );
        assert_eq!(
            CycleOutcome::Defaulted {
                samples: Vec::new(),
                reason: "empty payload".to_owned(),
            }
            .label(),
            "defaulted"
        );
    }
}
