//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;
use usergate_core::{Profile, Role, User, UserWithProfile};

use crate::auth::TOKEN_HEADER;
use crate::error::ErrorEnvelope;
use crate::routes::{
    ComponentHealth, ComponentStatus, HealthResponse, LoginResponse, MessageResponse,
    ProfileResponse, UserListResponse, UserResponse,
};
use crate::services::{LoginRequest, ProfileRequest, RegisterRequest, UpdateUserRequest};

// ==================== OpenAPI 문서 정의 ====================

/// Usergate API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Usergate API",
        version = "0.1.0",
        description = r#"
# Usergate 사용자 관리 REST API

가입, 로그인, 사용자/프로필 관리를 위한 REST API입니다.

## 인증

가입과 로그인을 제외한 `/api/v1` 엔드포인트는 로그인 응답의 토큰이 필요합니다.
`token: <token>` 헤더를 포함하세요. 토큰은 5시간 동안 유효합니다.

## 에러 형식

모든 에러는 `{"error": "true", "status": <code>, "message": <reason>}` 형식입니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    modifiers(&TokenSecurity),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "users", description = "사용자 - 가입, 로그인, 사용자 CRUD"),
        (name = "profiles", description = "프로필 - 호출자 프로필 생성")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ErrorEnvelope,
            Role,
            User,
            Profile,
            UserWithProfile,

            // ===== Users =====
            RegisterRequest,
            LoginRequest,
            UpdateUserRequest,
            UserResponse,
            UserListResponse,
            LoginResponse,
            MessageResponse,

            // ===== Profiles =====
            ProfileRequest,
            ProfileResponse,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Users =====
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,

        // ===== Profiles =====
        crate::routes::profiles::create_profile,
    )
)]
pub struct ApiDoc;

/// `token` 헤더 인증 스킴 등록.
struct TokenSecurity;

impl Modify for TokenSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(TOKEN_HEADER))),
            );
        }
    }
}

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Usergate API"));

        // 태그 확인
        assert!(json.contains("health"));
        assert!(json.contains("users"));
        assert!(json.contains("profiles"));

        // 경로 확인
        assert!(json.contains("/health/ready"));
        assert!(json.contains("/api/v1/users/login"));
        assert!(json.contains("/api/v1/users/{id}"));
        assert!(json.contains("/api/v1/profiles"));
    }

    #[test]
    fn test_token_security_scheme() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_value(&spec).unwrap();

        let scheme = &json["components"]["securitySchemes"]["token"];
        assert_eq!(scheme["type"], "apiKey");
        assert_eq!(scheme["in"], "header");
        assert_eq!(scheme["name"], "token");
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("ErrorEnvelope"));
        assert!(json.contains("RegisterRequest"));
        assert!(json.contains("LoginResponse"));
        assert!(json.contains("UserWithProfile"));
    }
}
