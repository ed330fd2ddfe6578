//! 애플리케이션 설정 구조체.
//!
//! 네트워크 타임아웃, 프레즌스 기본값, 저장소 경로, 로그 레벨을 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드하고 CLI 인자로 덮어쓴다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::presence::DEFAULT_INTERVAL_SECS;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 프레즌스 세션 설정
    #[serde(default)]
    pub presence: PresenceDefaults,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 로그 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

/// 프레즌스 기본값
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceDefaults {
    /// 시작 요청에 간격이 없을 때 사용할 하트비트 간격 (초)
    #[serde(default = "default_interval_secs")]
    pub default_interval_secs: u64,
}

impl Default for PresenceDefaults {
    fn default() -> Self {
        Self {
            default_interval_secs: default_interval_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 데이터 디렉토리 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// 로그 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 기본 로그 레벨 (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            presence: PresenceDefaults::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// 요청 타임아웃 Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
