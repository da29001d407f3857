//! 저장소 계층의 에러 타입.
//!
//! 영속성 협력자(`UserStore`)가 반환하는 에러를 정의합니다.
//! "레코드 없음"은 다른 실패와 구별되는 별도 variant로 표현됩니다.

use thiserror::Error;

/// 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 레코드를 찾을 수 없음
    #[error("레코드를 찾을 수 없음: {0}")]
    NotFound(String),

    /// 유일성 제약 위반 (예: 중복 이메일)
    #[error("중복 레코드: {0}")]
    Conflict(String),

    /// 백엔드(데이터베이스 등) 실패
    #[error("저장소 에러: {0}")]
    Backend(String),
}

/// 저장소 작업을 위한 Result 타입.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// 레코드 없음 에러인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguishable() {
        assert!(StoreError::NotFound("user 1".to_string()).is_not_found());
        assert!(!StoreError::Backend("connection reset".to_string()).is_not_found());
        assert!(!StoreError::Conflict("email".to_string()).is_not_found());
    }
}
