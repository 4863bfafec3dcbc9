//! Prometheus 텍스트 포맷 렌더링
//!
//! 스크레이프마다 새 `PrometheusRecorder`를 만들고 로컬 레코더로 설치한 뒤
//! 샘플을 기록합니다. 이번 사이클에 수집되지 않은 메트릭은 출력에 남지 않습니다.
//! 메트릭 이름의 와이어 단계 정리(`.` → `_`)는 레코더가 담당합니다.

use metrics::Label;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::descriptor::{MetricKind, MetricSample};

/// 샘플 목록을 Prometheus 텍스트 포맷으로 렌더링합니다.
pub fn render_exposition<'a>(samples: impl IntoIterator<Item = &'a MetricSample>) -> String {
    let recorder = PrometheusBuilder::new().build_recorder();

    metrics::with_local_recorder(&recorder, || {
        for sample in samples {
            record(sample);
        }
    });

    recorder.handle().render()
}

fn record(sample: &MetricSample) {
    let desc = sample.desc();
    let name = desc.name().to_owned();
    let labels: Vec<Label> = sample
        .labels()
        .into_iter()
        .map(|(k, v)| Label::new(k.to_owned(), v.to_owned()))
        .collect();

    match desc.kind() {
        MetricKind::Counter => {
            metrics::describe_counter!(name.clone(), desc.help().to_owned());
            metrics::counter!(name, labels).absolute(counter_value(sample.value()));
        }
        MetricKind::Gauge => {
            metrics::describe_gauge!(name.clone(), desc.help().to_owned());
            metrics::gauge!(name, labels).set(sample.value());
        }
    }
}

/// 카운터는 음수가 될 수 없으므로 0으로 고정합니다.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn counter_value(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MetricDesc;
    use std::sync::Arc;

    fn sample(name: &str, kind: MetricKind, value: f64) -> MetricSample {
        let desc = Arc::new(MetricDesc::new(
            name,
            "Test help",
            kind,
            vec!["nic".to_owned()],
            vec![("source".to_owned(), "dpvs-agent".to_owned())],
        ));
        MetricSample::new(desc, value, vec!["dpdk0".to_owned()])
    }

    #[test]
    fn renders_help_type_and_value() {
        let samples = vec![
            sample("dpvs_nic_dpdk0_in_bytes", MetricKind::Counter, 42.0),
            sample("dpvs_nic_dpdk0_buff_inuse", MetricKind::Gauge, 7.0),
        ];

        let body = render_exposition(&samples);

        assert!(body.contains("# HELP dpvs_nic_dpdk0_in_bytes Test help"));
        assert!(body.contains("# TYPE dpvs_nic_dpdk0_in_bytes counter"));
        assert!(body.contains("# TYPE dpvs_nic_dpdk0_buff_inuse gauge"));
        assert!(body.contains("dpvs_nic_dpdk0_in_bytes{nic=\"dpdk0\",source=\"dpvs-agent\"} 42"));
        assert!(body.contains("dpvs_nic_dpdk0_buff_inuse{nic=\"dpdk0\",source=\"dpvs-agent\"} 7"));
    }

    #[test]
    fn each_render_starts_empty() {
        let first = vec![sample("dpvs_nic_dpdk0_in_bytes", MetricKind::Counter, 1.0)];
        let _ = render_exposition(&first);

        let body = render_exposition(std::iter::empty());

        assert!(!body.contains("dpvs_nic_dpdk0_in_bytes"));
    }

    #[test]
    fn counter_value_clamps_negative_and_nan() {
        assert_eq!(counter_value(-3.0), 0);
        assert_eq!(counter_value(f64::NAN), 0);
        assert_eq!(counter_value(12.9), 12);
    }
}
