//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 비밀번호 해싱 및 검증.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use usergate_core::PasswordConfig;

/// 해싱 가능한 평문 비밀번호의 최대 길이 (바이트).
pub const MAX_PASSWORD_BYTES: usize = 4096;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호가 최대 길이를 초과합니다")]
    TooLong,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
    #[error("잘못된 해싱 파라미터: {0}")]
    InvalidParams(String),
}

/// 자격증명 해셔.
///
/// 해시마다 새 솔트를 생성하므로 같은 비밀번호라도 저장되는 해시는 매번 다릅니다.
/// 검증은 해시에 포함된 솔트와 비용 파라미터로 다시 계산하여 상수 시간에 비교합니다.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// 비용 파라미터로 해셔 생성.
    pub fn new(config: &PasswordConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// 비밀번호 해싱.
    ///
    /// # Returns
    ///
    /// PHC 형식의 해시 문자열 (솔트 및 비용 파라미터 포함)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let hash = hasher.hash("my_secure_password")?;
    /// // "$argon2id$v=19$m=19456,t=2,p=1$..."
    /// ```
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| PasswordError::HashingFailed)?;

        Ok(hash.to_string())
    }

    /// 비밀번호 검증.
    ///
    /// 불일치는 에러가 아니라 `Ok(false)`입니다.
    /// 해시 문자열 자체가 잘못된 경우에만 `InvalidHashFormat`을 반환합니다.
    pub fn verify(&self, hash: &str, password: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(_) => Err(PasswordError::InvalidHashFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(&PasswordConfig::new(1024, 1, 1)).unwrap()
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hasher = hasher();
        let hash = hasher.hash("TestPassword123!").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "TestPassword123!").unwrap());
        assert!(!hasher.verify(&hash, "WrongPassword123!").unwrap());
    }

    #[test]
    fn test_same_password_different_hashes() {
        let hasher = hasher();
        let hash1 = hasher.hash("Password1").unwrap();
        let hash2 = hasher.hash("Password1").unwrap();

        // 솔트가 다르므로 해시가 다름
        assert_ne!(hash1, hash2);

        assert!(hasher.verify(&hash1, "Password1").unwrap());
        assert!(hasher.verify(&hash2, "Password1").unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = hasher().verify("not-a-valid-hash", "password");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_too_long_password() {
        let long = "a".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(matches!(hasher().hash(&long), Err(PasswordError::TooLong)));

        let max = "a".repeat(MAX_PASSWORD_BYTES);
        assert!(hasher().hash(&max).is_ok());
    }

    #[test]
    fn test_verify_uses_embedded_params() {
        let strong = CredentialHasher::new(&PasswordConfig::new(2048, 2, 1)).unwrap();
        let hash = strong.hash("embedded").unwrap();

        // 다른 파라미터의 해셔로도 검증 가능
        assert!(hasher().verify(&hash, "embedded").unwrap());
    }

    #[test]
    fn test_invalid_params() {
        let result = CredentialHasher::new(&PasswordConfig::new(1, 0, 0));
        assert!(matches!(result, Err(PasswordError::InvalidParams(_))));
    }

    #[test]
    fn test_unicode_password() {
        let hasher = hasher();
        let hash = hasher.hash("한글패스워드123").unwrap();
        assert!(hasher.verify(&hash, "한글패스워드123").unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_hash_verifies_only_own_password(p1 in ".{0,32}", p2 in ".{0,32}") {
            let hasher = hasher();
            let hash = hasher.hash(&p1).unwrap();
            prop_assert!(hasher.verify(&hash, &p1).unwrap());
            if p1 != p2 {
                prop_assert!(!hasher.verify(&hash, &p2).unwrap());
            }
        }
    }
}
