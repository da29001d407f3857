//! 프로필 API 엔드포인트.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use usergate_core::Profile;
use utoipa::ToSchema;

use super::users::SUCCESS_FLAG;
use crate::auth::CurrentUser;
use crate::error::{ApiJson, ApiResult, ErrorEnvelope};
use crate::services::ProfileRequest;
use crate::state::AppState;

/// 프로필 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(example = "false")]
    pub error: String,
    #[schema(example = 200)]
    pub status: u16,
    pub result: Profile,
}

/// 호출자 본인의 프로필 생성.
///
/// `user_id`는 요청 본문이 아니라 토큰의 `id`에서 가져옵니다.
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    tag = "profiles",
    security(("token" = [])),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "프로필 생성 성공", body = ProfileResponse),
        (status = 400, description = "토큰 없음/무효 또는 잘못된 입력", body = ErrorEnvelope),
        (status = 409, description = "이미 프로필이 있음", body = ErrorEnvelope)
    )
)]
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiJson(req): ApiJson<ProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state.accounts.create_profile(&user, req).await?;
    Ok(Json(ProfileResponse {
        error: SUCCESS_FLAG.to_string(),
        status: 200,
        result: profile,
    }))
}
