//! Users Repository
//!
//! 사용자/프로필 테이블에 대한 PostgreSQL 연산을 담당합니다.
//! 소프트 삭제된 행(`deleted_at IS NOT NULL`)은 모든 조회에서 제외됩니다.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    FromRow,
};
use tracing::info;
use usergate_core::{
    DatabaseConfig, NewProfile, NewUser, Profile, Role, StoreError, StoreResult, User,
    UserChanges, UserStore, UserWithProfile,
};

// ================================================================================================
// Rows
// ================================================================================================

const USER_COLUMNS: &str = "id, role, email, password, created_at, updated_at, deleted_at";
const PROFILE_COLUMNS: &str = "id, user_id, full_name, phone, address, created_at, updated_at";

/// users 테이블 행
#[derive(Debug, Clone, FromRow)]
struct UserRow {
    id: i64,
    role: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[sqlx(default)]
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role).ok_or_else(|| {
            StoreError::Backend(format!("unknown role '{}' for user {}", row.role, row.id))
        })?;

        Ok(User {
            id: row.id,
            role,
            email: row.email,
            password_hash: row.password,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

/// profiles 테이블 행
#[derive(Debug, Clone, FromRow)]
struct ProfileRow {
    id: i64,
    user_id: i64,
    #[sqlx(default)]
    full_name: Option<String>,
    #[sqlx(default)]
    phone: Option<String>,
    #[sqlx(default)]
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            user_id: row.user_id,
            full_name: row.full_name,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn map_db_error(err: sqlx::Error, what: impl Into<String>) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound(what.into()),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(what.into())
        }
        other => StoreError::Backend(other.to_string()),
    }
}

// ================================================================================================
// Repository
// ================================================================================================

/// PostgreSQL 사용자 저장소.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// 설정으로 연결 풀을 만들고 저장소를 생성합니다.
    pub async fn connect(config: &DatabaseConfig, url: &str) -> Result<Self, sqlx::Error> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(url)
            .await?;

        info!("Database connection established");
        Ok(Self { pool })
    }

    /// 데이터베이스 마이그레이션을 실행합니다.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Migrations completed successfully");
        Ok(())
    }

    async fn user_exists(&self, id: i64) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, format!("user {}", id)))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, format!("user with email {}", email)))?
        .ok_or_else(|| StoreError::NotFound(format!("user with email {}", email)))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, format!("user {}", id)))?
        .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;

        row.try_into()
    }

    async fn list_users(&self) -> StoreResult<Vec<UserWithProfile>> {
        let users = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE deleted_at IS NULL ORDER BY id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "users"))?;

        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        let profiles = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {} FROM profiles WHERE user_id = ANY($1)",
            PROFILE_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "profiles"))?;

        let mut profiles: std::collections::HashMap<i64, Profile> = profiles
            .into_iter()
            .map(|p| (p.user_id, Profile::from(p)))
            .collect();

        users
            .into_iter()
            .map(|row| {
                let profile = profiles.remove(&row.id);
                Ok(UserWithProfile {
                    user: row.try_into()?,
                    profile,
                })
            })
            .collect()
    }

    async fn create_user(&self, input: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (role, email, password) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(input.role.as_str())
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, format!("email {}", input.email)))?;

        row.try_into()
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let what = match &changes.email {
            Some(email) => format!("email {}", email),
            None => format!("user {}", id),
        };

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                password = COALESCE($3, password),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, what))?
        .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;

        row.try_into()
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, format!("user {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    async fn create_profile(&self, input: NewProfile) -> StoreResult<Profile> {
        if !self.user_exists(input.user_id).await? {
            return Err(StoreError::NotFound(format!("user {}", input.user_id)));
        }

        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            INSERT INTO profiles (user_id, full_name, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(input.user_id)
        .bind(&input.full_name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, format!("profile for user {}", input.user_id)))?;

        Ok(row.into())
    }

    async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
