//! 인메모리 사용자 저장소.
//!
//! 데이터베이스가 설정되지 않은 개발 환경과 테스트에서 사용됩니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::UserStore;
use crate::domain::{NewProfile, NewUser, Profile, User, UserChanges, UserWithProfile};
use crate::error::{StoreError, StoreResult};

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    profiles: BTreeMap<i64, Profile>,
    last_user_id: i64,
    last_profile_id: i64,
}

impl MemoryState {
    fn live_user(&self, id: i64) -> StoreResult<&User> {
        self.users
            .get(&id)
            .filter(|u| !u.is_deleted())
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))
    }

    fn email_taken(&self, email: &str, except_id: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| !u.is_deleted() && u.email == email && Some(u.id) != except_id)
    }
}

/// `tokio::sync::RwLock`으로 보호되는 인메모리 저장소.
#[derive(Default)]
pub struct MemoryUserStore {
    state: RwLock<MemoryState>,
}

impl MemoryUserStore {
    /// 빈 저장소 생성.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<User> {
        let state = self.state.read().await;
        state
            .users
            .values()
            .find(|u| !u.is_deleted() && u.email == email)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user with email {}", email)))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<User> {
        let state = self.state.read().await;
        state.live_user(id).cloned()
    }

    async fn list_users(&self) -> StoreResult<Vec<UserWithProfile>> {
        let state = self.state.read().await;
        let users = state
            .users
            .values()
            .filter(|u| !u.is_deleted())
            .map(|u| UserWithProfile {
                user: u.clone(),
                profile: state.profiles.values().find(|p| p.user_id == u.id).cloned(),
            })
            .collect();
        Ok(users)
    }

    async fn create_user(&self, input: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.email_taken(&input.email, None) {
            return Err(StoreError::Conflict(format!("email {}", input.email)));
        }

        state.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.last_user_id,
            role: input.role,
            email: input.email,
            password_hash: input.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let mut state = self.state.write().await;
        state.live_user(id)?;

        if let Some(email) = &changes.email {
            if state.email_taken(email, Some(id)) {
                return Err(StoreError::Conflict(format!("email {}", email)));
            }
        }

        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.live_user(id)?;

        if let Some(user) = state.users.get_mut(&id) {
            let now = Utc::now();
            user.deleted_at = Some(now);
            user.updated_at = now;
        }
        Ok(())
    }

    async fn create_profile(&self, input: NewProfile) -> StoreResult<Profile> {
        let mut state = self.state.write().await;
        state.live_user(input.user_id)?;

        if state.profiles.values().any(|p| p.user_id == input.user_id) {
            return Err(StoreError::Conflict(format!(
                "profile for user {}",
                input.user_id
            )));
        }

        state.last_profile_id += 1;
        let now = Utc::now();
        let profile = Profile {
            id: state.last_profile_id,
            user_id: input.user_id,
            full_name: input.full_name,
            phone: input.phone,
            address: input.address,
            created_at: now,
            updated_at: now,
        };
        state.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }
}
