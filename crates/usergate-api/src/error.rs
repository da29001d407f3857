//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트의 실패는 `ApiError`로 모여 같은 봉투 형식으로 직렬화됩니다.
//!
//! ```json
//! { "error": "true", "status": 400, "message": "token not found" }
//! ```

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use usergate_core::StoreError;
use utoipa::ToSchema;

use crate::auth::{AuthRejection, ContextError, JwtError, PasswordError};

/// 로그인 실패 메시지. 실패 원인과 무관하게 항상 같습니다.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login credentials. Please try again";

/// API 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 잘못된 입력
    #[error("{0}")]
    Validation(String),
    /// 로그인 실패 (원인 비공개)
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,
    /// 토큰 없음/무효/만료
    #[error("{0}")]
    Unauthorized(#[from] AuthRejection),
    /// 다른 사용자의 레코드 접근
    #[error("permission denied")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// 토큰 서명 실패 (서버 설정 문제)
    #[error("failed to issue token")]
    Signing(#[source] JwtError),
    /// 해싱 실패 (서버 문제)
    #[error("failed to process credentials")]
    Hashing(#[source] PasswordError),
    /// 저장소 실패. 상세 내용은 로그에만 남습니다.
    #[error("database error")]
    Store(String),
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    /// HTTP 상태 코드.
    ///
    /// 인증 실패는 응답 본문의 `status`와 맞추어 400을 사용합니다.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidCredentials | ApiError::Unauthorized(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Signing(_)
            | ApiError::Hashing(_)
            | ApiError::Store(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 봉투 형식의 응답 본문.
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.status(), self.to_string())
    }
}

/// 에러 응답 봉투.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// 항상 "true"
    #[schema(example = "true")]
    pub error: String,
    /// HTTP 상태 코드
    #[schema(example = 400)]
    pub status: u16,
    /// 사람이 읽을 수 있는 에러 메시지
    #[schema(example = "token not found")]
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: "true".to_string(),
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Signing(e) => tracing::error!(error = %e, "Token signing failed"),
            ApiError::Hashing(e) => tracing::error!(error = %e, "Credential hashing failed"),
            ApiError::Store(detail) => tracing::error!(error = %detail, "Store operation failed"),
            ApiError::Internal(detail) => tracing::error!(error = %detail, "Internal error"),
            _ => {}
        }

        (status, Json(self.envelope())).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound("record not found".to_string()),
            StoreError::Conflict(what) => ApiError::Conflict(format!("{} already exists", what)),
            StoreError::Backend(detail) => ApiError::Store(detail),
        }
    }
}

impl From<ContextError> for ApiError {
    fn from(err: ContextError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

/// JSON 본문 추출기. 거부 시 봉투 형식으로 응답합니다.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// 경로 파라미터 추출기. 거부 시 봉투 형식으로 응답합니다.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unauthorized_envelope() {
        let (status, body) = body_json(ApiError::from(AuthRejection::MissingToken)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({"error": "true", "status": 400, "message": "token not found"})
        );
    }

    #[tokio::test]
    async fn test_invalid_credentials_message() {
        let (status, body) = body_json(ApiError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], INVALID_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_store_error_is_opaque() {
        let err = ApiError::from(StoreError::Backend(
            "connection refused: 10.0.0.5:5432".to_string(),
        ));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
        assert_eq!(body["message"], "database error");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::from(StoreError::NotFound("user 1".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(StoreError::Conflict("email".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Signing(JwtError::MissingSecret).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Hashing(PasswordError::TooLong).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
