//! OS 인텐트 모델.
//!
//! 호스트가 받은 인텐트를 그대로 담는다. 어떤 바로가기 신호인지 판별하는 것은
//! `gameplaza-shortcut`의 캡처 단계 몫이다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::shortcut::{EmbeddedIntent, ShortcutInfo};

/// 인텐트 액션 문자열
pub mod actions {
    pub const CREATE_SHORTCUT: &str = "android.intent.action.CREATE_SHORTCUT";
    pub const CONFIRM_PIN_SHORTCUT: &str = "android.content.pm.action.CONFIRM_PIN_SHORTCUT";
    pub const VIEW: &str = "android.intent.action.VIEW";
    pub const INSTALL_SHORTCUT: &str = "com.android.launcher.action.INSTALL_SHORTCUT";
    pub const MAIN: &str = "android.intent.action.MAIN";
}

/// extra 키
pub mod extras {
    /// `Intent.EXTRA_SHORTCUT_NAME`
    pub const EXTRA_SHORTCUT_NAME: &str = "android.intent.extra.shortcut.NAME";
    pub const SHORTCUT_NAME: &str = "shortcut_name";
    pub const SHORTCUT_URI: &str = "shortcut_uri";
    pub const SHORTCUT_PACKAGE: &str = "shortcut_package";
    pub const SHORTCUT_ICON: &str = "shortcut_icon";
}

/// 호스트가 수신한 인텐트
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingIntent {
    #[serde(default)]
    pub action: Option<String>,
    /// 데이터 URI
    #[serde(default)]
    pub data: Option<String>,
    /// 문자열 extra
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
    /// `EXTRA_SHORTCUT_INTENT`로 전달된 하위 인텐트
    #[serde(default)]
    pub shortcut_intent: Option<EmbeddedIntent>,
    /// 핀 고정 요청에 포함된 바로가기 정보
    #[serde(default)]
    pub pin_request: Option<ShortcutInfo>,
}

impl IncomingIntent {
    /// 액션만 지정된 인텐트 생성
    pub fn with_action(action: &str) -> Self {
        Self {
            action: Some(action.to_string()),
            ..Default::default()
        }
    }

    /// extra 추가 (빌더)
    pub fn extra(mut self, key: &str, value: &str) -> Self {
        self.extras.insert(key.to_string(), value.to_string());
        self
    }

    /// 데이터 URI 설정 (빌더)
    pub fn data(mut self, data: &str) -> Self {
        self.data = Some(data.to_string());
        self
    }

    /// 문자열 extra 조회
    pub fn get_extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    pub fn has_extra(&self, key: &str) -> bool {
        self.extras.contains_key(key)
    }
}
