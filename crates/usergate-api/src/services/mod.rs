//! 도메인 서비스 모듈.
//!
//! 라우트 핸들러는 HTTP 처리만 담당하고, 계정 관련 규칙은 이 모듈에서 처리합니다.

pub mod account;

pub use account::{
    AccountError, AccountService, LoginRequest, LoginResult, ProfileRequest, RegisterRequest,
    UpdateUserRequest,
};
