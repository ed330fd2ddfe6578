//! 프레즌스 세션 모델.
//!
//! 세션 설정, 세션 상태, 화면 전원 이벤트, 하트비트 페이로드를 정의.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 기본 하트비트 간격 (초)
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// 하트비트 `client_type` 고정값
pub const CLIENT_TYPE: &str = "gameplaza";

/// 프레즌스 세션 설정
///
/// Start 시 통째로 생성/교체되고 Stop 시 삭제된다. 필드 단위 패치는 없다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceConfig {
    pub base_url: String,
    pub token: String,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(rename = "intervalSeconds")]
    pub interval_secs: u64,
}

impl PresenceConfig {
    /// 검증된 설정 생성
    pub fn new(
        base_url: &str,
        token: &str,
        game: Option<&str>,
        interval_secs: u64,
    ) -> Result<Self, CoreError> {
        let config = Self {
            base_url: base_url.to_string(),
            token: token.to_string(),
            game: game.map(str::to_string),
            interval_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// 필수 필드 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.trim().is_empty() {
            return Err(CoreError::invalid_argument("baseUrl", "필수 값 누락"));
        }
        if self.token.trim().is_empty() {
            return Err(CoreError::invalid_argument("token", "필수 값 누락"));
        }
        if self.interval_secs == 0 {
            return Err(CoreError::invalid_argument(
                "intervalSeconds",
                "0보다 커야 합니다",
            ));
        }
        Ok(())
    }

    /// 게임 이름 (빈 문자열은 없음으로 취급)
    pub fn game_name(&self) -> Option<&str> {
        self.game.as_deref().filter(|g| !g.is_empty())
    }

    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_secs)
    }
}

/// 제어 경계로 들어오는 시작 요청 (검증 전)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    /// 생략 시 기본값 30초. 0 이하는 거부
    #[serde(default, alias = "interval")]
    pub interval_seconds: Option<i64>,
}

impl StartRequest {
    /// 검증 후 `PresenceConfig`로 변환
    pub fn into_config(self, default_interval_secs: u64) -> Result<PresenceConfig, CoreError> {
        let base_url = self
            .base_url
            .ok_or_else(|| CoreError::invalid_argument("baseUrl", "필수 값 누락"))?;
        let token = self
            .token
            .ok_or_else(|| CoreError::invalid_argument("token", "필수 값 누락"))?;

        let interval_secs = match self.interval_seconds {
            None => default_interval_secs,
            Some(secs) if secs > 0 => secs as u64,
            Some(secs) => {
                return Err(CoreError::invalid_argument(
                    "intervalSeconds",
                    format!("0보다 커야 합니다 (입력: {secs})"),
                ))
            }
        };

        PresenceConfig::new(&base_url, &token, self.game.as_deref(), interval_secs)
    }
}

/// 프레즌스 세션 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceSessionState {
    /// 세션 없음 (초기 상태)
    #[default]
    Stopped,
    /// 하트비트 루프 실행 중
    Active,
    /// 화면 꺼짐으로 일시 정지 (설정은 유지)
    Paused,
}

impl std::fmt::Display for PresenceSessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Active => write!(f, "Active"),
            Self::Paused => write!(f, "Paused"),
        }
    }
}

/// 화면 전원 상태 이벤트
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerEvent {
    ScreenOff,
    ScreenOn,
    /// 잠금 해제
    UserPresent,
}

impl PowerEvent {
    pub const ACTION_SCREEN_OFF: &'static str = "android.intent.action.SCREEN_OFF";
    pub const ACTION_SCREEN_ON: &'static str = "android.intent.action.SCREEN_ON";
    pub const ACTION_USER_PRESENT: &'static str = "android.intent.action.USER_PRESENT";

    /// 브로드캐스트 액션 문자열에서 변환 (짧은 이름도 허용)
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            Self::ACTION_SCREEN_OFF | "screen_off" => Some(Self::ScreenOff),
            Self::ACTION_SCREEN_ON | "screen_on" => Some(Self::ScreenOn),
            Self::ACTION_USER_PRESENT | "user_present" => Some(Self::UserPresent),
            _ => None,
        }
    }
}

/// 하트비트 요청 본문
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatPayload {
    pub client_type: String,
    /// "playing" | "online"
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
}

impl HeartbeatPayload {
    /// 설정에서 페이로드 생성
    pub fn from_config(config: &PresenceConfig) -> Self {
        let game = config.game_name().map(str::to_string);
        Self {
            client_type: CLIENT_TYPE.to_string(),
            status: if game.is_some() { "playing" } else { "online" }.to_string(),
            game,
        }
    }
}
