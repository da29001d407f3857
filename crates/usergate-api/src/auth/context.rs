//! 요청 범위 컨텍스트.
//!
//! 인증 미들웨어가 검증된 Claims를 키 단위로 기록하고, 핸들러가 읽어 갑니다.
//! 한 번 기록된 키는 같은 요청 안에서 덮어쓸 수 없습니다.

use std::collections::HashMap;

use serde_json::Value;
use usergate_core::Role;

use super::jwt::Claims;

/// 컨텍스트 에러.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("이미 설정된 컨텍스트 키: {0}")]
    AlreadySet(String),
    #[error("컨텍스트 키가 없습니다: {0}")]
    Missing(String),
    #[error("컨텍스트 값의 타입이 다릅니다: {0}")]
    TypeMismatch(String),
    #[error("Claims 직렬화 실패: {0}")]
    Serialization(String),
}

/// 쓰기 한 번만 허용되는 요청 컨텍스트.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    values: HashMap<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 키에 값을 기록합니다. 이미 있는 키면 기존 값을 유지하고 에러를 반환합니다.
    pub fn set_immutable(&mut self, key: impl Into<String>, value: Value) -> Result<(), ContextError> {
        let key = key.into();
        if self.values.contains_key(&key) {
            return Err(ContextError::AlreadySet(key));
        }
        self.values.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_i64(&self, key: &str) -> Result<i64, ContextError> {
        self.get(key)
            .ok_or_else(|| ContextError::Missing(key.to_string()))?
            .as_i64()
            .ok_or_else(|| ContextError::TypeMismatch(key.to_string()))
    }

    pub fn get_str(&self, key: &str) -> Result<&str, ContextError> {
        self.get(key)
            .ok_or_else(|| ContextError::Missing(key.to_string()))?
            .as_str()
            .ok_or_else(|| ContextError::TypeMismatch(key.to_string()))
    }

    /// Claims의 각 필드를 claim 이름을 키로 기록합니다.
    pub fn insert_claims(&mut self, claims: &Claims) -> Result<(), ContextError> {
        let value =
            serde_json::to_value(claims).map_err(|e| ContextError::Serialization(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(ContextError::Serialization("claims is not an object".to_string()));
        };

        for (key, value) in fields {
            self.set_immutable(key, value)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 인증된 호출자.
///
/// 보호된 라우트의 핸들러에서 추출기로 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    /// 컨텍스트의 `id`, `email`, `role` 키에서 호출자를 구성합니다.
    pub fn from_context(ctx: &RequestContext) -> Result<Self, ContextError> {
        let id = ctx.get_i64("id")?;
        let email = ctx.get_str("email")?.to_string();
        let role = Role::parse(ctx.get_str("role")?)
            .ok_or_else(|| ContextError::TypeMismatch("role".to_string()))?;

        Ok(Self { id, email, role })
    }

    pub fn is_root(&self) -> bool {
        self.role == Role::Root
    }

    /// 대상 사용자 레코드를 수정/삭제할 수 있는지 확인합니다.
    pub fn can_manage(&self, user_id: i64) -> bool {
        self.id == user_id || self.is_root()
    }
}
