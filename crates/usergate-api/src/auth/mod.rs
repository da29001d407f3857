//! 인증 및 요청 인가.
//!
//! # 구성 요소
//!
//! - [`CredentialHasher`]: Argon2id 비밀번호 해싱/검증
//! - [`TokenIssuer`] / [`TokenVerifier`]: HS256 세션 토큰 발급/검증
//! - [`require_token`]: `token` 헤더를 검증하는 미들웨어
//! - [`RequestContext`] / [`CurrentUser`]: 요청 범위 Claims 저장소와 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(user: CurrentUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.email)
//! }
//! ```

mod context;
mod jwt;
mod middleware;
mod password;

pub use context::{ContextError, CurrentUser, RequestContext};
pub use jwt::{Claims, Identity, JwtError, TokenIssuer, TokenVerifier, TOKEN_ALGORITHM};
pub use middleware::{authorize, require_token, AuthRejection, TOKEN_HEADER};
pub use password::{CredentialHasher, PasswordError, MAX_PASSWORD_BYTES};
