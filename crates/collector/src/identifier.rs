//! 엔티티 식별자 생성
//!
//! 가상 서비스와 실서버는 `<address>:<port>:<PROTO>` 형식의 문자열로 식별됩니다.
//! 이 식별자는 디스크립터 레지스트리와 실시간 통계를 잇는 유일한 조인 키이므로
//! 같은 입력에 대해 항상 같은 값을 돌려줘야 합니다.
//!
//! 네트워크 인터페이스는 이름을 그대로 식별자로 사용합니다.

use std::fmt;

/// 주소가 없을 때 사용하는 기본값
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// 포트가 없을 때 사용하는 기본값 (와일드카드 포트)
pub const DEFAULT_PORT: i64 = 0;

/// IP 프로토콜 번호: TCP
pub const IPPROTO_TCP: i64 = 6;

/// IP 프로토콜 번호: UDP
pub const IPPROTO_UDP: i64 = 17;

/// 식별자에 들어가는 전송 프로토콜
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// TCP (17 이외의 모든 코드)
    Tcp,
    /// UDP (코드 17)
    Udp,
}

impl Protocol {
    /// IP 프로토콜 번호를 변환합니다. 17만 UDP이고 나머지는 모두 TCP입니다.
    pub fn from_code(code: i64) -> Self {
        if code == IPPROTO_UDP {
            Self::Udp
        } else {
            Self::Tcp
        }
    }

    /// 식별자에 쓰이는 대문자 표기
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 서버 식별자를 생성합니다.
///
/// 없는 필드는 기본값으로 대체됩니다: 주소 `0.0.0.0`, 포트 `0`, 프로토콜 TCP.
/// 대소문자 변환이나 IPv6 대괄호 처리 같은 정규화는 하지 않습니다.
///
/// ```
/// use dpvs_exporter_collector::identifier::server_identifier;
///
/// assert_eq!(server_identifier(Some("10.0.0.1"), Some(80), Some(6)), "10.0.0.1:80:TCP");
/// assert_eq!(server_identifier(None, None, Some(17)), "0.0.0.0:0:UDP");
/// ```
pub fn server_identifier(address: Option<&str>, port: Option<i64>, protocol: Option<i64>) -> String {
    let address = address.unwrap_or(DEFAULT_ADDRESS);
    let port = port.unwrap_or(DEFAULT_PORT);
    let protocol = Protocol::from_code(protocol.unwrap_or(IPPROTO_TCP));
    format!("{address}:{port}:{protocol}")
}
