//! 사용자 저장소 계약.
//!
//! 계정 작업은 이 트레이트를 통해서만 영속성에 접근합니다.
//! API 크레이트의 PostgreSQL 구현과 이 모듈의 인메모리 구현이 있습니다.

mod memory;

use async_trait::async_trait;

use crate::domain::{NewProfile, NewUser, Profile, User, UserChanges, UserWithProfile};
use crate::error::StoreResult;

pub use memory::MemoryUserStore;

/// 사용자/프로필 영속성 협력자.
///
/// 소프트 삭제된 사용자는 모든 조회에서 보이지 않습니다.
/// 존재하지 않는 레코드는 `StoreError::NotFound`로 보고됩니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 이메일로 사용자 조회.
    async fn find_by_email(&self, email: &str) -> StoreResult<User>;

    /// ID로 사용자 조회.
    async fn find_by_id(&self, id: i64) -> StoreResult<User>;

    /// 모든 사용자를 프로필과 함께 조회 (ID 오름차순).
    async fn list_users(&self) -> StoreResult<Vec<UserWithProfile>>;

    /// 사용자 생성. 이메일이 중복이면 `StoreError::Conflict`.
    async fn create_user(&self, input: NewUser) -> StoreResult<User>;

    /// 사용자 수정.
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User>;

    /// 사용자 소프트 삭제.
    async fn delete_user(&self, id: i64) -> StoreResult<()>;

    /// 프로필 생성. 대상 사용자가 없으면 `StoreError::NotFound`.
    async fn create_profile(&self, input: NewProfile) -> StoreResult<Profile>;

    /// 저장소 연결 상태 확인.
    async fn is_healthy(&self) -> bool {
        true
    }
}
