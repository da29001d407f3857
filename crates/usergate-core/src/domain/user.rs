//! 사용자 및 프로필 레코드.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// 저장된 사용자 레코드.
///
/// `password_hash`는 응답에 직렬화되지 않으며 `Debug` 출력에서도 가려집니다.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub role: Role,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// 메모리 상의 복사본에서 비밀번호 해시를 제거합니다.
    pub fn strip_credentials(&mut self) {
        self.password_hash.clear();
    }

    /// 소프트 삭제된 레코드인지 확인합니다.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("deleted_at", &self.deleted_at)
            .finish()
    }
}

/// 사용자 프로필 레코드.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 목록 조회용 사용자 + 프로필.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UserWithProfile {
    #[serde(flatten)]
    pub user: User,
    pub profile: Option<Profile>,
}

/// 새 사용자 입력.
///
/// 평문 비밀번호가 아닌 해시만 담습니다.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// 사용자 수정 입력. `None` 필드는 변경하지 않습니다.
#[derive(Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    /// 변경할 필드가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_hash.is_none()
    }
}

impl std::fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChanges")
            .field("email", &self.email)
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// 새 프로필 입력.
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub user_id: i64,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: 7,
            role: Role::User,
            email: "kim@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains(r#""email":"kim@example.com""#));
        assert!(json.contains(r#""role":"user""#));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let debug = format!("{:?}", sample_user());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("argon2"));
    }

    #[test]
    fn test_strip_credentials() {
        let mut user = sample_user();
        user.strip_credentials();
        assert!(user.password_hash.is_empty());
    }

    #[test]
    fn test_user_with_profile_flattens() {
        let user = sample_user();
        let with_profile = UserWithProfile {
            profile: Some(Profile {
                id: 1,
                user_id: user.id,
                full_name: Some("Kim".to_string()),
                phone: None,
                address: None,
                created_at: user.created_at,
                updated_at: user.updated_at,
            }),
            user,
        };

        let value = serde_json::to_value(&with_profile).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["profile"]["userId"], 7);
        assert_eq!(value["profile"]["fullName"], "Kim");
    }

    #[test]
    fn test_user_changes_is_empty() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
