//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/users` - 가입, 로그인, 사용자 관리
//! - `/api/v1/profiles` - 프로필 생성
//!
//! 가입과 로그인을 제외한 `/api/v1` 라우트는 `token` 헤더가 필요합니다.

pub mod health;
pub mod profiles;
pub mod users;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use profiles::ProfileResponse;
pub use users::{LoginResponse, MessageResponse, UserListResponse, UserResponse};

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::auth::require_token;
use crate::error::ErrorEnvelope;
use crate::state::AppState;

/// 사용자 라우터 생성.
///
/// 공개 라우트(가입, 로그인)와 보호 라우트를 합칩니다.
/// `route_layer`이므로 토큰 검증은 매칭된 보호 라우트에만 적용됩니다.
pub fn users_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public = Router::new()
        .route("/", post(users::register))
        .route("/login", post(users::login));

    let protected = Router::new()
        .route("/", get(users::list_users))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state, require_token));

    public.merge(protected)
}

/// 프로필 라우터 생성.
pub fn profiles_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(profiles::create_profile))
        .route_layer(middleware::from_fn_with_state(state, require_token))
}

/// 매칭되는 라우트가 없을 때의 응답.
async fn fallback() -> (StatusCode, Json<ErrorEnvelope>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorEnvelope::new(StatusCode::NOT_FOUND, "route not found")),
    )
}

/// 전체 API 라우터 생성.
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/users", users_router(state.clone()))
        .nest("/api/v1/profiles", profiles_router(state))
        .fallback(fallback)
}
