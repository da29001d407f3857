//! # Usergate Core
//!
//! 사용자 관리 API의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 API 서버 전반에서 사용되는 기본 타입을 제공합니다:
//! - 사용자 및 프로필 레코드
//! - 사용자 역할 정의
//! - 저장소 계약 (`UserStore`) 및 인메모리 구현
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod store;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use store::{MemoryUserStore, UserStore};
