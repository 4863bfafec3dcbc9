//! 메트릭 디스크립터와 샘플
//!
//! [`MetricDesc`]는 측정값 하나의 불변 메타데이터(이름, 도움말, 종류, 레이블 스키마)이고,
//! [`MetricSample`]은 한 수집 사이클에서 디스크립터에 값을 붙인 결과입니다.
//! 디스크립터는 레지스트리가 `Arc`로 소유하며 생성 후 변경되지 않습니다.

use std::sync::Arc;

/// 메트릭 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// 업스트림이 보고하는 누적값
    Counter,
    /// 순간값
    Gauge,
}

impl MetricKind {
    /// 노출 포맷의 `# TYPE` 표기
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
        }
    }
}

/// 메트릭 디스크립터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    fq_name: String,
    help: String,
    kind: MetricKind,
    variable_labels: Vec<String>,
    const_labels: Vec<(String, String)>,
}

impl MetricDesc {
    /// 디스크립터를 생성합니다.
    pub fn new(
        fq_name: impl Into<String>,
        help: impl Into<String>,
        kind: MetricKind,
        variable_labels: Vec<String>,
        const_labels: Vec<(String, String)>,
    ) -> Self {
        Self {
            fq_name: fq_name.into(),
            help: help.into(),
            kind,
            variable_labels,
            const_labels,
        }
    }

    pub fn name(&self) -> &str {
        &self.fq_name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn variable_labels(&self) -> &[String] {
        &self.variable_labels
    }

    pub fn const_labels(&self) -> &[(String, String)] {
        &self.const_labels
    }
}

/// `namespace`, `subsystem`, `name`을 `_`로 연결한 완전한 메트릭 이름을 만듭니다.
///
/// 빈 부분은 건너뛰고, `name`이 비어 있으면 빈 문자열을 반환합니다.
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    [namespace, subsystem, name]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// 디스크립터 하나에 값과 레이블 값을 붙인 샘플
#[derive(Debug, Clone)]
pub struct MetricSample {
    desc: Arc<MetricDesc>,
    value: f64,
    label_values: Vec<String>,
}

impl MetricSample {
    /// 샘플을 생성합니다. `label_values`는 디스크립터의 가변 레이블 순서를 따릅니다.
    pub fn new(desc: Arc<MetricDesc>, value: f64, label_values: Vec<String>) -> Self {
        Self {
            desc,
            value,
            label_values,
        }
    }

    pub fn desc(&self) -> &Arc<MetricDesc> {
        &self.desc
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label_values(&self) -> &[String] {
        &self.label_values
    }

    /// 가변 레이블과 상수 레이블을 (이름, 값) 쌍으로 반환합니다.
    pub fn labels(&self) -> Vec<(&str, &str)> {
        self.desc
            .variable_labels
            .iter()
            .zip(&self.label_values)
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .chain(
                self.desc
                    .const_labels
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            )
            .collect()
    }
}
