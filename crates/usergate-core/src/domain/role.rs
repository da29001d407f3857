//! 사용자 역할.
//!
//! 역할은 닫힌 문자열 태그 집합(`user`, `admin`, `root`)이며 계층 구조가 없습니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 일반 사용자 - 가입 시 항상 부여되는 역할
    #[default]
    User,
    /// 관리자 - 로그인 엔드포인트로 토큰을 발급받을 수 없음
    Admin,
    /// 루트 - 다른 사용자 레코드를 수정/삭제할 수 있음
    Root,
}

impl Role {
    /// 역할의 와이어 표현을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Root => "root",
        }
    }

    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            "root" => Some(Role::Root),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
