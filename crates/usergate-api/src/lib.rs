//! 사용자 관리 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (가입, 로그인, 사용자/프로필 CRUD)
//! - Argon2id 비밀번호 해싱과 HS256 세션 토큰
//! - `token` 헤더 인증 미들웨어
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 해싱, 토큰 발급/검증, 인증 미들웨어
//! - [`services`]: 계정 서비스
//! - [`repository`]: PostgreSQL 저장소
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{
    Claims, CredentialHasher, CurrentUser, RequestContext, TokenIssuer, TokenVerifier,
    TOKEN_HEADER,
};
pub use error::{ApiError, ApiResult, ErrorEnvelope};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use routes::create_api_router;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::{create_test_state, TEST_SECRET};
