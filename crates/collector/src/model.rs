//! DPVS agent 응답 모델
//!
//! agent의 JSON 응답을 그대로 옮긴 타입입니다. 모든 필드가 생략될 수 있으므로
//! 전부 `Option`이며, 알 수 없는 필드는 무시합니다.
//!
//! - `GET /v2/vs` → [`VsResponse`]
//! - `GET /v2/device/name/nic?verbose=false&stats=true` → [`NicStatsResponse`]

use serde::{Deserialize, Serialize};

// ─── 가상 서비스 ────────────────────────────────────────────────────

/// 가상 서비스 목록
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VsResponse {
    #[serde(rename = "Items", default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<VirtualServerSpecExpand>>,
}

/// 가상 서비스 (통계와 실서버 목록 포함)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VirtualServerSpecExpand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub af: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    /// IP 프로토콜 번호 (6: TCP, 17: UDP)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proto: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sched_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conn_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fwmark: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_proportion: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_proto: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_check: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ServerStats>,
    #[serde(rename = "RSs", skip_serializing_if = "Option::is_none")]
    pub rss: Option<RealServerExpandList>,
}

/// 실서버 목록
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealServerExpandList {
    #[serde(rename = "Items", default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<RealServerSpecExpand>>,
}

/// 실서버 (스펙 + 통계)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RealServerSpecExpand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<RealServerSpecTiny>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ServerStats>,
}

/// 실서버 스펙
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealServerSpecTiny {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inhibited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overloaded: Option<bool>,
    /// 포워딩 모드 (DR, FNAT, NAT, SNAT, TUNNEL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// 가상 서비스/실서버 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_pkts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_pkts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_bps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_bps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_pps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_pps: Option<i64>,
}

// ─── 네트워크 인터페이스 ─────────────────────────────────────────────

/// 인터페이스 목록
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NicStatsResponse {
    #[serde(rename = "Items", default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NicDeviceSpec>>,
}

/// 인터페이스 (상세 + 통계)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NicDeviceSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<NicDeviceDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<NicDeviceStats>,
}

/// 인터페이스 상세
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NicDeviceDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<String>,
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "MTU", skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i64>,
    #[serde(rename = "Flags", skip_serializing_if = "Option::is_none")]
    pub flags: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<i64>,
    /// `UP` / `DOWN`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// `full-duplex` / `half-duplex`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplex: Option<String>,
    /// `auto-nego` / `fixed-nego`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoneg: Option<String>,
    #[serde(rename = "nRxQ", skip_serializing_if = "Option::is_none")]
    pub n_rx_q: Option<i64>,
    #[serde(rename = "nTxQ", skip_serializing_if = "Option::is_none")]
    pub n_tx_q: Option<i64>,
    #[serde(rename = "socketID", skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<i64>,
}

/// 인터페이스 통계
///
/// `name`은 응답 JSON에 없고, [`NicStatsResponse::into_labeled_stats`]가
/// 같은 항목의 `detail.name`을 채워 넣습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicDeviceStats {
    #[serde(skip)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buf_avail: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buf_inuse: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_pkts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_pkts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_errors: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_errors: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_missed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_no_mbuf: Option<i64>,
}

impl NicStatsResponse {
    /// 각 항목의 통계에 `detail.name`을 붙여 반환합니다.
    ///
    /// `stats`가 없는 항목은 빈 통계로, `detail`이 없는 항목은 이름 없이 포함됩니다.
    pub fn into_labeled_stats(self) -> Vec<NicDeviceStats> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                let mut stats = item.stats.unwrap_or_default();
                stats.name = item.detail.and_then(|detail| detail.name);
                stats
            })
            .collect()
    }

    /// 인터페이스 이름 목록. 이름이 없는 항목은 빈 문자열입니다.
    pub fn into_names(self) -> Vec<String> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .map(|item| item.detail.and_then(|d| d.name).unwrap_or_default())
            .collect()
    }
}
