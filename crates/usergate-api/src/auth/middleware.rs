//! 토큰 인증 미들웨어.
//!
//! 보호된 라우트 앞에서 `token` 헤더를 검증하고, 성공하면 Claims를
//! 요청 컨텍스트에 기록한 뒤 다음 핸들러로 넘깁니다.
//! 실패하면 핸들러에 도달하기 전에 400 응답으로 끝납니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/users", get(list_users))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_token));
//!
//! async fn list_users(user: CurrentUser) -> impl IntoResponse { ... }
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::context::{CurrentUser, RequestContext};
use super::jwt::{Claims, TokenVerifier};
use crate::error::ApiError;
use crate::metrics::record_auth_rejection;
use crate::state::AppState;

/// 토큰을 담는 요청 헤더 이름.
pub const TOKEN_HEADER: &str = "token";

/// 인증 거부 사유. 메시지는 응답 본문에 그대로 노출됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("token not found")]
    MissingToken,
    #[error("token invalid")]
    InvalidToken,
}

impl AuthRejection {
    /// 메트릭 라벨용 사유.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthRejection::MissingToken => "missing",
            AuthRejection::InvalidToken => "invalid",
        }
    }
}

/// 헤더에서 토큰을 꺼내 검증합니다.
pub fn authorize(verifier: &TokenVerifier, headers: &HeaderMap) -> Result<Claims, AuthRejection> {
    let raw = headers
        .get(TOKEN_HEADER)
        .ok_or(AuthRejection::MissingToken)?;
    let token = raw.to_str().map_err(|_| AuthRejection::InvalidToken)?.trim();
    if token.is_empty() {
        return Err(AuthRejection::MissingToken);
    }

    verifier.decode(token).map_err(|e| {
        tracing::debug!(error = %e, "Token rejected");
        AuthRejection::InvalidToken
    })
}

/// 토큰 검증 미들웨어.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authorize(&state.verifier, request.headers()).inspect_err(|rejection| {
        record_auth_rejection(rejection.reason());
    })?;

    let mut ctx = request
        .extensions_mut()
        .remove::<RequestContext>()
        .unwrap_or_default();
    ctx.insert_claims(&claims)?;
    request.extensions_mut().insert(ctx);

    tracing::debug!(user_id = claims.id, role = %claims.role, "Request authorized");
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<RequestContext>()
            .ok_or(ApiError::Unauthorized(AuthRejection::MissingToken))?;

        CurrentUser::from_context(ctx).map_err(|e| {
            tracing::warn!(error = %e, "Request context is incomplete");
            ApiError::Unauthorized(AuthRejection::InvalidToken)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{Identity, TokenIssuer};
    use axum::http::HeaderValue;
    use usergate_core::{AuthConfig, Role};

    const TEST_SECRET: &str = "middleware-test-secret";

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(&AuthConfig::new(TEST_SECRET)).unwrap()
    }

    fn token() -> String {
        TokenIssuer::new(&AuthConfig::new(TEST_SECRET))
            .unwrap()
            .issue(&Identity {
                id: 1,
                email: "a@example.com".to_string(),
                role: Role::User,
            })
            .unwrap()
    }

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(
            authorize(&verifier(), &headers),
            Err(AuthRejection::MissingToken)
        );
    }

    #[test]
    fn test_empty_header() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static(""));
        assert_eq!(
            authorize(&verifier(), &headers),
            Err(AuthRejection::MissingToken)
        );
    }

    #[test]
    fn test_non_utf8_header_is_invalid() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_bytes(&[0xfa, 0xfb]).unwrap());
        assert_eq!(
            authorize(&verifier(), &headers),
            Err(AuthRejection::InvalidToken)
        );
    }

    #[test]
    fn test_valid_token() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_str(&token()).unwrap());
        let claims = authorize(&verifier(), &headers).unwrap();
        assert_eq!(claims.id, 1);
    }

    #[test]
    fn test_authorization_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token())).unwrap(),
        );
        assert_eq!(
            authorize(&verifier(), &headers),
            Err(AuthRejection::MissingToken)
        );
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(AuthRejection::MissingToken.to_string(), "token not found");
        assert_eq!(AuthRejection::InvalidToken.to_string(), "token invalid");
    }
}
