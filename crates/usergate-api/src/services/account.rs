//! 계정 서비스.
//!
//! 가입/로그인과 사용자·프로필 CRUD를 조율합니다.
//! 해싱은 [`CredentialHasher`], 토큰 발급은 [`TokenIssuer`], 저장은 [`UserStore`]에 위임합니다.
//!
//! # 로그인 실패 정책
//!
//! 사용자 없음, `admin` 역할, 잘못된 저장 해시, 비밀번호 불일치는 모두
//! 같은 `InvalidCredentials`로 응답하여 어떤 검사가 실패했는지 드러내지 않습니다.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use usergate_core::{
    NewProfile, NewUser, Profile, Role, StoreError, User, UserChanges, UserStore, UserWithProfile,
};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{CredentialHasher, CurrentUser, Identity, JwtError, PasswordError, TokenIssuer};
use crate::error::{ApiError, INVALID_CREDENTIALS_MESSAGE};
use crate::metrics::record_login;

// ==================== 요청 타입 ====================

/// 가입 요청.
///
/// `role`은 받아들이지만 무시되며, 가입한 계정은 항상 `user` 역할입니다.
#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// 이메일
    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// 비밀번호
    #[validate(length(min = 1, max = 1024, message = "password must be 1-1024 characters"))]
    pub password: String,
    /// 요청 역할 (무시됨, 어떤 JSON 값이든 허용)
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub role: Option<serde_json::Value>,
}

/// 로그인 요청.
#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// 사용자 수정 요청. 역할은 변경할 수 없습니다.
#[derive(Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 1024, message = "password must be 1-1024 characters"))]
    pub password: Option<String>,
}

/// 프로필 생성 요청.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "fullName must be at most 255 characters"))]
    pub full_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 32, message = "phone must be at most 32 characters"))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1024, message = "address must be at most 1024 characters"))]
    pub address: Option<String>,
}

// 평문 비밀번호가 로그에 남지 않도록 Debug를 직접 구현
impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// 로그인 결과.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub role: Role,
}

// ==================== 에러 ====================

/// 계정 서비스 에러.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,
    #[error("permission denied")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("email already registered")]
    EmailTaken,
    #[error("profile already exists")]
    ProfileExists,
    #[error("비밀번호 처리 실패: {0}")]
    Hashing(#[source] PasswordError),
    #[error("토큰 발급 실패: {0}")]
    Signing(#[source] JwtError),
    #[error("저장소 에러: {0}")]
    Store(#[source] StoreError),
    #[error("블로킹 작업 실패: {0}")]
    Join(String),
}

impl From<validator::ValidationErrors> for AccountError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{}: invalid value", field))
                })
            })
            .collect();
        messages.sort();
        AccountError::Validation(messages.join("; "))
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => ApiError::Validation(msg),
            AccountError::InvalidCredentials => ApiError::InvalidCredentials,
            AccountError::Forbidden => ApiError::Forbidden,
            AccountError::UserNotFound => ApiError::NotFound("user not found".to_string()),
            AccountError::EmailTaken => ApiError::Conflict("email already registered".to_string()),
            AccountError::ProfileExists => {
                ApiError::Conflict("profile already exists".to_string())
            }
            AccountError::Hashing(e) => ApiError::Hashing(e),
            AccountError::Signing(e) => ApiError::Signing(e),
            AccountError::Store(e) => ApiError::from(e),
            AccountError::Join(detail) => ApiError::Internal(detail),
        }
    }
}

/// 사용자 조회/수정에서 저장소 에러 변환.
fn user_store_error(err: StoreError) -> AccountError {
    match err {
        StoreError::NotFound(_) => AccountError::UserNotFound,
        StoreError::Conflict(_) => AccountError::EmailTaken,
        other => AccountError::Store(other),
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ==================== 서비스 ====================

/// 계정 서비스.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    issuer: TokenIssuer,
    /// 같은 비용 파라미터로 만든 더미 해시
    dummy_hash: Option<Arc<str>>,
}

/// 더미 해시의 원문. 어떤 계정에도 저장되지 않습니다.
const DUMMY_PASSWORD: &str = "usergate-timing-equalizer";

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, hasher: CredentialHasher, issuer: TokenIssuer) -> Self {
        let dummy_hash = match hasher.hash(DUMMY_PASSWORD) {
            Ok(hash) => Some(Arc::from(hash)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to prepare dummy password hash");
                None
            }
        };

        Self {
            store,
            hasher,
            issuer,
            dummy_hash,
        }
    }

    /// Argon2 해싱은 CPU 작업이므로 블로킹 스레드에서 실행합니다.
    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::Join(e.to_string()))?
            .map_err(AccountError::Hashing)
    }

    /// 실제 해시 없이 거부되는 로그인도 검증 비용을 치르게 합니다.
    ///
    /// 사용자 없음/`admin` 응답이 비밀번호 불일치보다 빨라지지 않아야 합니다.
    async fn burn_verify(&self, password: String) {
        if let Some(hash) = self.dummy_hash.as_deref() {
            let _ = self.verify_password(hash.to_string(), password).await;
        }
    }

    async fn verify_password(&self, hash: String, password: String) -> Result<bool, AccountError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| AccountError::Join(e.to_string()))?
            .map_err(AccountError::Hashing)
    }

    /// 가입.
    ///
    /// 요청의 역할과 무관하게 `user` 역할로 저장합니다.
    pub async fn register(&self, mut req: RegisterRequest) -> Result<User, AccountError> {
        req.email = normalize_email(&req.email);
        req.validate()?;

        if let Some(requested) = req.role.as_ref() {
            if requested.as_str().and_then(Role::parse) != Some(Role::User) {
                tracing::warn!(email = %req.email, requested_role = %requested, "Ignoring requested role on register");
            }
        }

        let password_hash = self.hash_password(req.password).await?;
        let user = self
            .store
            .create_user(NewUser {
                email: req.email,
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(user_store_error)?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// 로그인.
    pub async fn login(&self, mut req: LoginRequest) -> Result<LoginResult, AccountError> {
        req.email = normalize_email(&req.email);
        req.validate()?;

        let result = self.authenticate(req).await;
        record_login(result.is_ok());
        result
    }

    async fn authenticate(&self, req: LoginRequest) -> Result<LoginResult, AccountError> {
        let mut user = match self.store.find_by_email(&req.email).await {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => {
                tracing::debug!("Login rejected: unknown email");
                self.burn_verify(req.password).await;
                return Err(AccountError::InvalidCredentials);
            }
            Err(e) => return Err(AccountError::Store(e)),
        };

        if user.role == Role::Admin {
            tracing::debug!(user_id = user.id, "Login rejected: admin role");
            self.burn_verify(req.password).await;
            return Err(AccountError::InvalidCredentials);
        }

        match self
            .verify_password(user.password_hash.clone(), req.password)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(user_id = user.id, "Login rejected: password mismatch");
                return Err(AccountError::InvalidCredentials);
            }
            Err(AccountError::Hashing(e)) => {
                tracing::error!(user_id = user.id, error = %e, "Stored password hash is malformed");
                return Err(AccountError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        }
        user.strip_credentials();

        let token = self
            .issuer
            .issue(&Identity::from(&user))
            .map_err(AccountError::Signing)?;

        tracing::info!(user_id = user.id, role = %user.role, "User logged in");
        Ok(LoginResult {
            token,
            role: user.role,
        })
    }

    /// 전체 사용자 목록 (프로필 포함).
    pub async fn list_users(&self) -> Result<Vec<UserWithProfile>, AccountError> {
        self.store.list_users().await.map_err(AccountError::Store)
    }

    /// 단일 사용자 조회.
    pub async fn get_user(&self, id: i64) -> Result<User, AccountError> {
        self.store.find_by_id(id).await.map_err(user_store_error)
    }

    /// 사용자 수정.
    ///
    /// 본인 또는 `root`만 수정할 수 있습니다. 새 비밀번호는 다시 해싱됩니다.
    pub async fn update_user(
        &self,
        actor: &CurrentUser,
        id: i64,
        mut req: UpdateUserRequest,
    ) -> Result<User, AccountError> {
        if !actor.can_manage(id) {
            tracing::warn!(actor_id = actor.id, target_id = id, "Update forbidden");
            return Err(AccountError::Forbidden);
        }

        req.email = req.email.as_deref().map(normalize_email);
        req.validate()?;

        let password_hash = match req.password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };
        let changes = UserChanges {
            email: req.email,
            password_hash,
        };
        if changes.is_empty() {
            return Err(AccountError::Validation(
                "nothing to update: provide email or password".to_string(),
            ));
        }

        let user = self
            .store
            .update_user(id, changes)
            .await
            .map_err(user_store_error)?;

        tracing::info!(actor_id = actor.id, user_id = id, "User updated");
        Ok(user)
    }

    /// 사용자 삭제 (소프트 삭제).
    pub async fn delete_user(&self, actor: &CurrentUser, id: i64) -> Result<(), AccountError> {
        if !actor.can_manage(id) {
            tracing::warn!(actor_id = actor.id, target_id = id, "Delete forbidden");
            return Err(AccountError::Forbidden);
        }

        self.store.delete_user(id).await.map_err(user_store_error)?;

        tracing::info!(actor_id = actor.id, user_id = id, "User deleted");
        Ok(())
    }

    /// 호출자 본인의 프로필 생성.
    pub async fn create_profile(
        &self,
        actor: &CurrentUser,
        req: ProfileRequest,
    ) -> Result<Profile, AccountError> {
        req.validate()?;

        let profile = self
            .store
            .create_profile(NewProfile {
                user_id: actor.id,
                full_name: req.full_name,
                phone: req.phone,
                address: req.address,
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => AccountError::UserNotFound,
                StoreError::Conflict(_) => AccountError::ProfileExists,
                other => AccountError::Store(other),
            })?;

        tracing::info!(user_id = actor.id, profile_id = profile.id, "Profile created");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenVerifier;
    use usergate_core::{AuthConfig, MemoryUserStore, PasswordConfig};

    const TEST_SECRET: &str = "account-service-test-secret";

    fn auth_config() -> AuthConfig {
        AuthConfig::new(TEST_SECRET).with_password(PasswordConfig::new(1024, 1, 1))
    }

    fn service_with(store: Arc<dyn UserStore>) -> AccountService {
        let config = auth_config();
        AccountService::new(
            store,
            CredentialHasher::new(&config.password).unwrap(),
            TokenIssuer::new(&config).unwrap(),
        )
    }

    fn service() -> (AccountService, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        (service_with(store.clone()), store)
    }

    fn register_req(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn actor(user: &User) -> CurrentUser {
        CurrentUser {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let (svc, _) = service();
        let user = svc.register(register_req("alice@example.com", "pw123456")).await.unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.password_hash.starts_with("$argon2id$"));

        let result = svc.login(login_req("alice@example.com", "pw123456")).await.unwrap();
        assert_eq!(result.role, Role::User);

        let claims = TokenVerifier::new(&auth_config())
            .unwrap()
            .decode(&result.token)
            .unwrap();
        assert_eq!(claims.id, user.id);
        assert_eq!(claims.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_register_forces_user_role() {
        let (svc, store) = service();
        let requested = [
            serde_json::json!("admin"),
            serde_json::json!("root"),
            serde_json::json!(1),
            serde_json::json!({"x": "admin"}),
        ];

        for (i, role) in requested.into_iter().enumerate() {
            let mut req = register_req(&format!("mallory{}@example.com", i), "pw");
            req.role = Some(role);

            let user = svc.register(req).await.unwrap();
            assert_eq!(user.role, Role::User);
            assert_eq!(
                store.find_by_id(user.id).await.unwrap().role,
                Role::User
            );
        }
    }

    #[test]
    fn test_register_request_accepts_any_role_value() {
        for body in [
            r#"{"email": "a@example.com", "password": "pw", "role": 1}"#,
            r#"{"email": "a@example.com", "password": "pw", "role": {"x": "admin"}}"#,
            r#"{"email": "a@example.com", "password": "pw", "role": null}"#,
        ] {
            let req: RegisterRequest = serde_json::from_str(body).unwrap();
            assert_eq!(req.email, "a@example.com");
        }
    }

    #[test]
    fn test_invalid_credentials_message_is_shared() {
        assert_eq!(
            AccountError::InvalidCredentials.to_string(),
            INVALID_CREDENTIALS_MESSAGE
        );
        assert_eq!(
            ApiError::from(AccountError::InvalidCredentials).to_string(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let (svc, _) = service();
        let user = svc.register(register_req("  Alice@Example.COM ", "pw")).await.unwrap();
        assert_eq!(user.email, "alice@example.com");

        assert!(svc.login(login_req("ALICE@example.com", "pw")).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_validation() {
        let (svc, _) = service();
        let err = svc.register(register_req("not-an-email", "pw")).await.unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));

        let err = svc.register(register_req("a@example.com", "")).await.unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (svc, _) = service();
        svc.register(register_req("a@example.com", "pw")).await.unwrap();
        let err = svc.register(register_req("a@example.com", "pw")).await.unwrap_err();
        assert!(matches!(err, AccountError::EmailTaken));
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let (svc, store) = service();
        svc.register(register_req("alice@example.com", "right")).await.unwrap();

        // admin 계정은 올바른 비밀번호여도 거부
        let admin_hash = CredentialHasher::new(&PasswordConfig::new(1024, 1, 1))
            .unwrap()
            .hash("adminpw")
            .unwrap();
        store
            .create_user(NewUser {
                email: "admin@example.com".to_string(),
                password_hash: admin_hash,
                role: Role::Admin,
            })
            .await
            .unwrap();

        let unknown = svc.login(login_req("nobody@example.com", "x")).await.unwrap_err();
        let wrong = svc.login(login_req("alice@example.com", "wrong")).await.unwrap_err();
        let admin = svc.login(login_req("admin@example.com", "adminpw")).await.unwrap_err();

        for err in [&unknown, &wrong, &admin] {
            assert!(matches!(err, AccountError::InvalidCredentials));
        }
        assert_eq!(unknown.to_string(), admin.to_string());
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_rejected_logins_pay_verify_cost() {
        let (svc, store) = service();
        let dummy = svc.dummy_hash.clone().unwrap();
        assert!(dummy.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));

        // 더미 원문으로는 어떤 계정에도 로그인할 수 없음
        let err = svc
            .login(login_req("nobody@example.com", DUMMY_PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));

        store
            .create_user(NewUser {
                email: "admin@example.com".to_string(),
                password_hash: dummy.to_string(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        let err = svc
            .login(login_req("admin@example.com", DUMMY_PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_with_malformed_stored_hash() {
        let (svc, store) = service();
        store
            .create_user(NewUser {
                email: "legacy@example.com".to_string(),
                password_hash: "not-a-phc-string".to_string(),
                role: Role::User,
            })
            .await
            .unwrap();

        let err = svc.login(login_req("legacy@example.com", "pw")).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_root_can_log_in() {
        let (svc, store) = service();
        let hash = CredentialHasher::new(&PasswordConfig::new(1024, 1, 1))
            .unwrap()
            .hash("rootpw")
            .unwrap();
        store
            .create_user(NewUser {
                email: "root@example.com".to_string(),
                password_hash: hash,
                role: Role::Root,
            })
            .await
            .unwrap();

        let result = svc.login(login_req("root@example.com", "rootpw")).await.unwrap();
        assert_eq!(result.role, Role::Root);
    }

    #[tokio::test]
    async fn test_update_own_user_rehashes_password() {
        let (svc, _) = service();
        let user = svc.register(register_req("a@example.com", "old")).await.unwrap();

        let updated = svc
            .update_user(
                &actor(&user),
                user.id,
                UpdateUserRequest {
                    email: None,
                    password: Some("new".to_string()),
                },
            )
            .await
            .unwrap();
        assert_ne!(updated.password_hash, user.password_hash);
        assert_eq!(updated.role, Role::User);

        assert!(svc.login(login_req("a@example.com", "old")).await.is_err());
        assert!(svc.login(login_req("a@example.com", "new")).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_requires_changes() {
        let (svc, _) = service();
        let user = svc.register(register_req("a@example.com", "pw")).await.unwrap();

        let err = svc
            .update_user(&actor(&user), user.id, UpdateUserRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_other_user_forbidden() {
        let (svc, _) = service();
        let a = svc.register(register_req("a@example.com", "pw")).await.unwrap();
        let b = svc.register(register_req("b@example.com", "pw")).await.unwrap();

        let err = svc
            .update_user(
                &actor(&a),
                b.id,
                UpdateUserRequest {
                    email: Some("c@example.com".to_string()),
                    password: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Forbidden));

        let err = svc.delete_user(&actor(&a), b.id).await.unwrap_err();
        assert!(matches!(err, AccountError::Forbidden));
    }

    #[tokio::test]
    async fn test_root_manages_any_user() {
        let (svc, _) = service();
        let target = svc.register(register_req("a@example.com", "pw")).await.unwrap();
        let root = CurrentUser {
            id: 999,
            email: "root@example.com".to_string(),
            role: Role::Root,
        };

        svc.delete_user(&root, target.id).await.unwrap();
        assert!(matches!(
            svc.get_user(target.id).await.unwrap_err(),
            AccountError::UserNotFound
        ));
        assert!(matches!(
            svc.delete_user(&root, target.id).await.unwrap_err(),
            AccountError::UserNotFound
        ));
    }

    #[tokio::test]
    async fn test_deleted_user_cannot_log_in() {
        let (svc, _) = service();
        let user = svc.register(register_req("a@example.com", "pw")).await.unwrap();
        svc.delete_user(&actor(&user), user.id).await.unwrap();

        let err = svc.login(login_req("a@example.com", "pw")).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_create_profile_for_caller() {
        let (svc, _) = service();
        let user = svc.register(register_req("a@example.com", "pw")).await.unwrap();

        let profile = svc
            .create_profile(
                &actor(&user),
                ProfileRequest {
                    full_name: Some("Alice".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.user_id, user.id);

        let err = svc
            .create_profile(&actor(&user), ProfileRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::ProfileExists));

        let users = svc.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].profile.is_some());
    }

    #[test]
    fn test_request_debug_redacts_password() {
        let debug = format!("{:?}", register_req("a@example.com", "hunter2"));
        assert!(!debug.contains("hunter2"));

        let debug = format!("{:?}", login_req("a@example.com", "hunter2"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_account_error_mapping() {
        use axum::http::StatusCode;

        assert_eq!(
            ApiError::from(AccountError::InvalidCredentials).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AccountError::UserNotFound).to_string(),
            "user not found"
        );
        assert_eq!(
            ApiError::from(AccountError::EmailTaken).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(AccountError::Store(StoreError::Backend("boom".to_string()))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
