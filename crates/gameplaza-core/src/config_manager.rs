//! 설정 파일 로더.
//!
//! 플랫폼별 설정 디렉토리의 `config.json`을 읽는다. 파일이 없으면 기본 설정으로 만든다.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 파일 이름
const CONFIG_FILE_NAME: &str = "config.json";

/// 로드된 설정과 그 파일 경로
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// 플랫폼 기본 경로에서 로드
    pub fn new() -> Result<Self, CoreError> {
        Self::with_path(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// 지정된 경로에서 로드
    ///
    /// 상위 디렉토리와 파일이 없으면 기본 설정으로 생성한다.
    /// 파일에 빠진 항목은 기본값으로 채운다.
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CoreError::Config(format!(
                        "설정 디렉토리 생성 실패: {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let config = if config_path.exists() {
            load_from_file(&config_path)?
        } else {
            let config = AppConfig::default_config();
            write_default(&config_path, &config)?;
            info!("기본 설정 파일 생성: {}", config_path.display());
            config
        };

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 현재 설정 (복제본)
    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 플랫폼별 설정 디렉토리
    ///
    /// - macOS: `~/Library/Application Support/org.plazanet.gameplaza/`
    /// - Windows: `%APPDATA%\plazanet\gameplaza\config\`
    /// - Linux: `$XDG_CONFIG_HOME/gameplaza/`
    pub fn config_dir() -> Result<PathBuf, CoreError> {
        ProjectDirs::from("org", "plazanet", "gameplaza")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| CoreError::Config("홈 디렉토리를 찾을 수 없습니다".to_string()))
    }
}

fn load_from_file(path: &Path) -> Result<AppConfig, CoreError> {
    let content = fs::read_to_string(path).map_err(|e| {
        CoreError::Config(format!("설정 파일 읽기 실패: {}: {e}", path.display()))
    })?;

    let config = serde_json::from_str(&content).map_err(|e| {
        CoreError::Config(format!("설정 파일 파싱 실패: {}: {e}", path.display()))
    })?;

    debug!("설정 파일 로드 완료: {}", path.display());
    Ok(config)
}

fn write_default(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| CoreError::Config(format!("설정 직렬화 실패: {e}")))?;

    fs::write(path, content).map_err(|e| {
        CoreError::Config(format!("설정 파일 저장 실패: {}: {e}", path.display()))
    })
}
