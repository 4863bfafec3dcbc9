//! 디스크립터 레지스트리
//!
//! [`DescriptorRegistry`]는 디스커버리 시점에 만들어지는 불변 매핑(식별자 → 디스크립터 그룹)입니다.
//! 수집 중에는 읽기만 하고, 토폴로지가 바뀌면 새 레지스트리를 통째로 만들어
//! [`SharedRegistry::replace`]로 교체합니다. 부분 수정 API는 없습니다.
//!
//! # 동시성
//! ```text
//! discovery ──build──▶ DescriptorRegistry ──replace──▶ SharedRegistry (ArcSwap)
//!                                                         │
//!                              scrape ◀──snapshot (Arc)───┘
//! ```
//! 스크레이프는 시작할 때 `Arc` 스냅샷 하나를 잡고 끝까지 그것만 사용하므로,
//! 교체가 동시에 일어나도 반쯤 만들어진 레지스트리를 보지 않습니다.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::descriptor::{MetricDesc, MetricSample, build_fq_name};
use crate::schema::GroupSchema;

/// 디스커버리로 찾은 엔티티
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredEntity {
    /// 조인 키
    pub identifier: String,
    /// 도움말에 붙는 역할 (`VIP`, `RS`), 없으면 필드 도움말 그대로
    pub role: Option<&'static str>,
}

impl DiscoveredEntity {
    pub fn new(identifier: impl Into<String>, role: Option<&'static str>) -> Self {
        Self {
            identifier: identifier.into(),
            role,
        }
    }
}

/// 엔티티 하나의 디스크립터 묶음
#[derive(Debug)]
pub struct DescriptorGroup {
    identifier: String,
    descs: Vec<Arc<MetricDesc>>,
}

impl DescriptorGroup {
    fn build(schema: &GroupSchema, namespace: &str, entity: &DiscoveredEntity) -> Self {
        let const_labels: Vec<(String, String)> = schema
            .const_labels
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();

        let descs = schema
            .fields
            .iter()
            .map(|field| {
                let name = build_fq_name(
                    namespace,
                    schema.subsystem,
                    &format!("{}_{}", entity.identifier, field.suffix),
                );
                let help = match entity.role {
                    Some(role) => format!("{} for {role}", field.help),
                    None => field.help.to_owned(),
                };
                Arc::new(MetricDesc::new(
                    name,
                    help,
                    field.kind,
                    vec![field.label.to_owned()],
                    const_labels.clone(),
                ))
            })
            .collect();

        Self {
            identifier: entity.identifier.clone(),
            descs,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// 스키마 필드 순서의 디스크립터
    pub fn descriptors(&self) -> &[Arc<MetricDesc>] {
        &self.descs
    }

    /// 필드 순서의 값으로 샘플을 만듭니다. 없는 값은 0입니다.
    pub fn samples(&self, values: &[Option<i64>]) -> Vec<MetricSample> {
        self.descs
            .iter()
            .enumerate()
            .map(|(i, desc)| {
                let value = values.get(i).copied().flatten().unwrap_or(0);
                // 업스트림 카운터는 2^53 미만이므로 f64 변환 손실은 실용적으로 없음
                #[allow(clippy::cast_precision_loss)]
                let value = value as f64;
                MetricSample::new(Arc::clone(desc), value, vec![self.identifier.clone()])
            })
            .collect()
    }

    /// 모든 디스크립터를 0으로 채운 샘플
    pub fn zero_samples(&self) -> Vec<MetricSample> {
        self.samples(&[])
    }
}

/// 식별자 → 디스크립터 그룹 매핑
#[derive(Debug)]
pub struct DescriptorRegistry {
    schema: &'static GroupSchema,
    groups: BTreeMap<String, DescriptorGroup>,
}

impl DescriptorRegistry {
    /// 엔티티가 없는 레지스트리
    pub fn empty(schema: &'static GroupSchema) -> Self {
        Self {
            schema,
            groups: BTreeMap::new(),
        }
    }

    /// 디스커버리 결과로 레지스트리를 만듭니다.
    ///
    /// 같은 식별자가 여러 번 나오면 마지막 것이 남습니다.
    pub fn build(
        schema: &'static GroupSchema,
        namespace: &str,
        entities: impl IntoIterator<Item = DiscoveredEntity>,
    ) -> Self {
        let groups = entities
            .into_iter()
            .map(|entity| {
                let group = DescriptorGroup::build(schema, namespace, &entity);
                (entity.identifier, group)
            })
            .collect();
        Self { schema, groups }
    }

    pub fn schema(&self) -> &'static GroupSchema {
        self.schema
    }

    pub fn get(&self, identifier: &str) -> Option<&DescriptorGroup> {
        self.groups.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.groups.contains_key(identifier)
    }

    /// 등록된 엔티티 수
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn groups(&self) -> impl Iterator<Item = &DescriptorGroup> {
        self.groups.values()
    }

    /// 등록된 모든 디스크립터 (식별자 순)
    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<MetricDesc>> {
        self.groups.values().flat_map(|group| group.descs.iter())
    }
}

/// 등록된 모든 엔티티의 모든 디스크립터를 값 0으로 내보냅니다.
///
/// 업스트림이 완전히 응답하지 않을 때 알려진 엔티티가 사라지는 대신 0으로 보이게 합니다.
pub fn emit_defaults(registry: &DescriptorRegistry) -> Vec<MetricSample> {
    registry
        .groups()
        .flat_map(DescriptorGroup::zero_samples)
        .collect()
}

/// 원자적으로 교체 가능한 공유 레지스트리
#[derive(Debug)]
pub struct SharedRegistry {
    inner: ArcSwap<DescriptorRegistry>,
}

impl SharedRegistry {
    pub fn new(registry: DescriptorRegistry) -> Self {
        Self {
            inner: ArcSwap::from_pointee(registry),
        }
    }

    /// 현재 레지스트리 스냅샷
    pub fn snapshot(&self) -> Arc<DescriptorRegistry> {
        self.inner.load_full()
    }

    /// 레지스트리를 통째로 교체하고 이전 값을 반환합니다.
    pub fn replace(&self, registry: DescriptorRegistry) -> Arc<DescriptorRegistry> {
        self.inner.swap(Arc::new(registry))
    }
}
