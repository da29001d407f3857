//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.
//! 요청 사이에 변하는 값은 없으며, 가변 상태는 저장소 내부에만 있습니다.

use std::sync::Arc;

use usergate_core::{AuthConfig, UserStore};

use crate::auth::{CredentialHasher, JwtError, PasswordError, TokenIssuer, TokenVerifier};
use crate::services::AccountService;

/// 상태 초기화 에러.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("토큰 설정 오류: {0}")]
    Token(#[from] JwtError),
    #[error("비밀번호 해싱 설정 오류: {0}")]
    Password(#[from] PasswordError),
}

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 사용자 저장소 (PostgreSQL 또는 인메모리)
    pub store: Arc<dyn UserStore>,

    /// 계정 서비스 - 가입, 로그인, 사용자/프로필 CRUD
    pub accounts: AccountService,

    /// 토큰 검증기 - 보호된 라우트의 미들웨어에서 사용
    pub verifier: TokenVerifier,

    /// 저장소 종류 ("postgres" / "memory")
    pub store_backend: &'static str,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// 서명 키가 없으면 `StateError::Token(JwtError::MissingSecret)`을 반환합니다.
    pub fn new(store: Arc<dyn UserStore>, auth: &AuthConfig) -> Result<Self, StateError> {
        let hasher = CredentialHasher::new(&auth.password)?;
        let issuer = TokenIssuer::new(auth)?;
        let verifier = TokenVerifier::new(auth)?;

        Ok(Self {
            accounts: AccountService::new(store.clone(), hasher, issuer),
            store,
            verifier,
            store_backend: "memory",
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// 저장소 종류 이름 설정.
    pub fn with_store_backend(mut self, name: &'static str) -> Self {
        self.store_backend = name;
        self
    }

    /// 서버 업타임 (초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 저장소 연결 상태 확인.
    pub async fn is_store_healthy(&self) -> bool {
        self.store.is_healthy().await
    }
}

/// 테스트용 서명 키.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_SECRET: &str = "usergate-test-secret-key-minimum-32-chars";

/// 인메모리 저장소와 낮은 해싱 비용을 사용하는 테스트용 상태.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use usergate_core::{MemoryUserStore, PasswordConfig};

    let auth = AuthConfig::new(TEST_SECRET).with_password(PasswordConfig::new(1024, 1, 1));
    match AppState::new(Arc::new(MemoryUserStore::new()), &auth) {
        Ok(state) => state,
        Err(e) => panic!("test state must build: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usergate_core::MemoryUserStore;

    #[test]
    fn test_missing_secret_fails() {
        let result = AppState::new(Arc::new(MemoryUserStore::new()), &AuthConfig::default());
        assert!(matches!(
            result,
            Err(StateError::Token(JwtError::MissingSecret))
        ));
    }

    #[tokio::test]
    async fn test_create_test_state() {
        let state = create_test_state().with_store_backend("memory");
        assert!(state.is_store_healthy().await);
        assert!(state.uptime_secs() >= 0);
        assert_eq!(state.store_backend, "memory");
    }
}
