//! 사용자 API 엔드포인트.
//!
//! 가입/로그인은 공개 라우트이고, 나머지는 `token` 헤더가 필요한 보호 라우트입니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/v1/users` - 가입
//! - `POST /api/v1/users/login` - 로그인
//! - `GET /api/v1/users` - 사용자 목록 (프로필 포함)
//! - `GET /api/v1/users/{id}` - 사용자 조회
//! - `PUT /api/v1/users/{id}` - 이메일/비밀번호 수정
//! - `DELETE /api/v1/users/{id}` - 사용자 삭제

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use usergate_core::{Role, User, UserWithProfile};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ApiJson, ApiPath, ApiResult, ErrorEnvelope};
use crate::services::{LoginRequest, RegisterRequest, UpdateUserRequest};
use crate::state::AppState;

/// 성공 응답의 `error` 필드 값.
pub(crate) const SUCCESS_FLAG: &str = "false";

// ==================== 응답 타입 ====================

/// 단일 사용자 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "false")]
    pub error: String,
    #[schema(example = 200)]
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub result: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl UserResponse {
    fn new(user: User) -> Self {
        Self {
            error: SUCCESS_FLAG.to_string(),
            status: 200,
            message: None,
            result: user,
            count: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// 사용자 목록 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    #[schema(example = "false")]
    pub error: String,
    #[schema(example = 200)]
    pub status: u16,
    pub result: Vec<UserWithProfile>,
    pub count: usize,
}

/// 로그인 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "false")]
    pub error: String,
    #[schema(example = 200)]
    pub status: u16,
    #[schema(example = "success login")]
    pub message: String,
    /// 세션 토큰 (이후 요청의 `token` 헤더에 사용)
    pub token: String,
    pub role: Role,
}

/// 메시지만 담는 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "false")]
    pub error: String,
    #[schema(example = 200)]
    pub status: u16,
    pub message: String,
}

// ==================== 핸들러 ====================

/// 가입.
///
/// 요청 본문의 `role`은 무시되고 항상 `user`로 저장됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "가입 성공", body = UserResponse),
        (status = 400, description = "잘못된 입력", body = ErrorEnvelope),
        (status = 409, description = "이미 등록된 이메일", body = ErrorEnvelope)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.accounts.register(req).await?;
    Ok(Json(UserResponse::new(user)))
}

/// 로그인.
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 400, description = "자격증명 불일치", body = ErrorEnvelope)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let result = state.accounts.login(req).await?;
    Ok(Json(LoginResponse {
        error: SUCCESS_FLAG.to_string(),
        status: 200,
        message: "success login".to_string(),
        token: result.token,
        role: result.role,
    }))
}

/// 사용자 목록.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    security(("token" = [])),
    responses(
        (status = 200, description = "사용자 목록", body = UserListResponse),
        (status = 400, description = "토큰 없음 또는 무효", body = ErrorEnvelope)
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
) -> ApiResult<Json<UserListResponse>> {
    let users = state.accounts.list_users().await?;
    Ok(Json(UserListResponse {
        error: SUCCESS_FLAG.to_string(),
        status: 200,
        count: users.len(),
        result: users,
    }))
}

/// 사용자 조회.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    security(("token" = [])),
    params(
        ("id" = i64, Path, description = "사용자 ID")
    ),
    responses(
        (status = 200, description = "사용자", body = UserResponse),
        (status = 404, description = "사용자 없음", body = ErrorEnvelope)
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.accounts.get_user(id).await?;
    Ok(Json(UserResponse::new(user).with_count(1)))
}

/// 사용자 수정.
///
/// 본인 또는 `root`만 수정할 수 있습니다.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "users",
    security(("token" = [])),
    params(
        ("id" = i64, Path, description = "사용자 ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "수정 성공", body = UserResponse),
        (status = 403, description = "다른 사용자의 레코드", body = ErrorEnvelope),
        (status = 404, description = "사용자 없음", body = ErrorEnvelope),
        (status = 409, description = "이미 등록된 이메일", body = ErrorEnvelope)
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let updated = state.accounts.update_user(&user, id, req).await?;
    Ok(Json(
        UserResponse::new(updated).with_message("success update user"),
    ))
}

/// 사용자 삭제 (소프트 삭제).
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "users",
    security(("token" = [])),
    params(
        ("id" = i64, Path, description = "사용자 ID")
    ),
    responses(
        (status = 200, description = "삭제 성공", body = MessageResponse),
        (status = 403, description = "다른 사용자의 레코드", body = ErrorEnvelope),
        (status = 404, description = "사용자 없음", body = ErrorEnvelope)
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.accounts.delete_user(&user, id).await?;
    Ok(Json(MessageResponse {
        error: SUCCESS_FLAG.to_string(),
        status: 200,
        message: "success delete user".to_string(),
    }))
}
