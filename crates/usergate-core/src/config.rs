//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 서명 비밀 키는 `AuthConfig`에 담겨 토큰 발급기/검증기에 명시적으로 전달됩니다.

use std::net::SocketAddr;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// 기본 토큰 유효 시간 (5시간).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 5 * 60 * 60;

/// 애플리케이션 설정.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL (없으면 인메모리 저장소 사용)
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

/// Argon2 비용 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// 메모리 비용 (KiB)
    pub memory_kib: u32,
    /// 반복 횟수
    pub iterations: u32,
    /// 병렬도
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        // argon2 크레이트의 Params::DEFAULT와 동일
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordConfig {
    /// 명시적 비용 파라미터로 생성.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }
}

/// 인증 설정.
///
/// 비밀 키는 `SecretString`으로 보관되어 `Debug` 출력에 노출되지 않습니다.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 서명 비밀 키
    #[serde(deserialize_with = "deserialize_secret")]
    secret: Option<SecretString>,
    /// 토큰 유효 시간 (초)
    pub token_ttl_secs: i64,
    /// 비밀번호 해싱 비용
    pub password: PasswordConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            password: PasswordConfig::default(),
        }
    }
}

impl AuthConfig {
    /// 비밀 키로 설정 생성 (나머지는 기본값).
    pub fn new(secret: impl Into<String>) -> Self {
        let secret: String = secret.into();
        Self {
            secret: Some(SecretString::new(secret.into_boxed_str())),
            ..Default::default()
        }
    }

    /// 토큰 유효 시간을 설정합니다.
    pub fn with_token_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.token_ttl_secs = ttl.num_seconds();
        self
    }

    /// 비밀번호 해싱 비용을 설정합니다.
    pub fn with_password(mut self, password: PasswordConfig) -> Self {
        self.password = password;
        self
    }

    /// 서명 키 바이트를 반환합니다. 키가 없거나 비어 있으면 `None`.
    pub fn secret_bytes(&self) -> Option<&[u8]> {
        self.secret
            .as_ref()
            .map(|s| s.expose_secret().as_bytes())
            .filter(|b| !b.is_empty())
    }

    /// 토큰 유효 시간.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs)
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|s| SecretString::new(s.into_boxed_str())))
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "usergate_api=info,usergate_core=info,tower_http=info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 환경 변수의 서명 키 원문. `SECRET`이 `USERGATE__AUTH__SECRET`보다 우선합니다.
fn secret_from_env<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("SECRET").or_else(|| lookup("USERGATE__AUTH__SECRET"))
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 우선순위: 기본값 < 설정 파일 < `USERGATE__SECTION__KEY` 환경 변수
    /// < `SECRET` / `DATABASE_URL` 환경 변수.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드 (없어도 됨)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("USERGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            // 숫자처럼 보이는 비밀 키가 파싱되지 않도록 원문 그대로 덮어씀
            .set_override_option("auth.secret", secret_from_env(|key| std::env::var(key).ok()))?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
