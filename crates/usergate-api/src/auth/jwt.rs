//! 세션 토큰 발급 및 검증.
//!
//! HS256 서명 토큰을 발급하고, 요청마다 서명/알고리즘/만료를 검증합니다.
//! 서명 키는 `AuthConfig`로 생성 시점에 한 번 전달되며 이후 환경 변수를 읽지 않습니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use serde::{Deserialize, Serialize};
use usergate_core::{AuthConfig, Role, User};

/// 발급 및 검증에 사용하는 유일한 서명 알고리즘.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// 토큰 페이로드.
///
/// `id`는 JSON 정수로 인코딩되고 `i64`로 바로 디코딩됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    pub id: i64,
    /// 이메일
    pub email: String,
    /// 사용자 역할
    pub role: Role,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 발급 시각과 유효 시간으로 Claims 생성.
    pub fn new(
        id: i64,
        email: impl Into<String>,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            role,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

/// 토큰에 담길 사용자 신원.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// 토큰 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("서명 비밀 키가 설정되지 않았습니다")]
    MissingSecret,
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("서명이 일치하지 않습니다")]
    InvalidSignature,
    #[error("허용되지 않은 알고리즘: {0}")]
    AlgorithmMismatch(String),
    #[error("잘못된 토큰 형식")]
    InvalidToken,
}

/// 토큰 발급기.
///
/// `Debug`를 구현하지 않아 서명 키가 로그에 섞이지 않습니다.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// 설정에서 발급기 생성.
    ///
    /// 비밀 키가 없거나 비어 있으면 `JwtError::MissingSecret`.
    pub fn new(config: &AuthConfig) -> Result<Self, JwtError> {
        let secret = config.secret_bytes().ok_or(JwtError::MissingSecret)?;
        Ok(Self {
            key: EncodingKey::from_secret(secret),
            ttl: config.token_ttl(),
        })
    }

    /// 현재 시각 기준으로 토큰 발급.
    pub fn issue(&self, identity: &Identity) -> Result<String, JwtError> {
        self.issue_at(identity, Utc::now())
    }

    /// 지정한 발급 시각으로 토큰 발급.
    ///
    /// HMAC 서명은 결정적이므로 같은 신원과 시각이면 같은 토큰이 나옵니다.
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims::new(
            identity.id,
            identity.email.clone(),
            identity.role,
            now,
            self.ttl,
        );
        encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.key).map_err(JwtError::from)
    }
}

/// 토큰 검증기.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// 설정에서 검증기 생성.
    pub fn new(config: &AuthConfig) -> Result<Self, JwtError> {
        let secret = config.secret_bytes().ok_or(JwtError::MissingSecret)?;

        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// 토큰 디코딩 및 검증.
    ///
    /// 헤더의 알고리즘이 HS256이 아니면 서명 확인 전에 거부합니다.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let header = decode_header(token).map_err(|_| JwtError::InvalidToken)?;
        if header.alg != TOKEN_ALGORITHM {
            return Err(JwtError::AlgorithmMismatch(format!("{:?}", header.alg)));
        }

        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => JwtError::AlgorithmMismatch("unknown".to_string()),
                _ => JwtError::InvalidToken,
            })
    }
}
