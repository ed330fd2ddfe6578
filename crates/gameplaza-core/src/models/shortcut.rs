//! 바로가기 모델.
//!
//! 여섯 가지 OS 신호 형태(`RawShortcutSignal`)와 이를 정규화한
//! 단일 이벤트 스키마(`ShortcutEvent`), 디렉토리 조회 결과(`ShortcutRecord`)를 정의.

use serde::{Deserialize, Serialize};

/// 정규화된 바로가기 이벤트 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutEventType {
    /// 레거시 CREATE_SHORTCUT 요청
    CreateShortcut,
    /// 핀 고정 확인 요청 (Android 8.0+)
    PinShortcut,
    /// `gameplaza:` 링크로 실행
    LaunchShortcut,
    /// 런처 INSTALL_SHORTCUT 브로드캐스트
    InstallShortcut,
    /// MAIN 인텐트 + 바로가기 extra
    MainShortcut,
    /// LauncherApps 콜백에서 감지된 고정 바로가기
    LauncherAppsShortcut,
}

impl ShortcutEventType {
    /// 호스트 경계에서 사용하는 문자열 표현
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateShortcut => "create_shortcut",
            Self::PinShortcut => "pin_shortcut",
            Self::LaunchShortcut => "launch_shortcut",
            Self::InstallShortcut => "install_shortcut",
            Self::MainShortcut => "main_shortcut",
            Self::LauncherAppsShortcut => "launcher_apps_shortcut",
        }
    }
}

impl std::fmt::Display for ShortcutEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 정규화된 바로가기 이벤트 (불변)
///
/// 생성 후 수정하지 않으며, 소유권은 릴레이를 거쳐 호스트로 이동한다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutEvent {
    #[serde(rename = "type")]
    pub event_type: ShortcutEventType,
    /// 표시 이름 (없으면 빈 문자열)
    pub name: String,
    pub uri: String,
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// 바로가기에 포함된 하위 인텐트
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedIntent {
    #[serde(default)]
    pub action: Option<String>,
    /// 데이터 URI 문자열
    #[serde(default)]
    pub data: Option<String>,
    /// 명시적 대상 패키지
    #[serde(default)]
    pub package: Option<String>,
    /// 컴포넌트 패키지 (`package/.Activity`의 앞부분)
    #[serde(default)]
    pub component_package: Option<String>,
    /// 컴포넌트 클래스
    #[serde(default)]
    pub component_class: Option<String>,
}

impl EmbeddedIntent {
    /// 인텐트를 `#Intent;...;end` 형식의 URI 문자열로 재직렬화
    ///
    /// 데이터 URI가 있으면 접두사로 붙고, 나머지 필드는 `key=value;` 목록으로 이어진다.
    pub fn to_uri(&self) -> String {
        let mut uri = self.data.clone().unwrap_or_default();
        uri.push_str("#Intent;");
        if let Some(action) = non_empty(&self.action) {
            uri.push_str(&format!("action={action};"));
        }
        if let Some(package) = non_empty(&self.package) {
            uri.push_str(&format!("package={package};"));
        }
        if let Some(component_package) = non_empty(&self.component_package) {
            let class = self.component_class.as_deref().unwrap_or_default();
            uri.push_str(&format!("component={component_package}/{class};"));
        }
        uri.push_str("end");
        uri
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// OS 바로가기 정보 (`ShortcutInfo`에 대응)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutInfo {
    pub id: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub short_label: Option<String>,
    #[serde(default)]
    pub long_label: Option<String>,
    #[serde(default)]
    pub intent: Option<EmbeddedIntent>,
    #[serde(default)]
    pub pinned: bool,
}

/// 정규화 이전의 원시 OS 신호 (닫힌 집합)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RawShortcutSignal {
    /// ACTION_CREATE_SHORTCUT
    CreateShortcut {
        shortcut_name: Option<String>,
        shortcut_uri: Option<String>,
        /// 인텐트 데이터 URI
        data: Option<String>,
        icon: Option<String>,
    },
    /// CONFIRM_PIN_SHORTCUT 핀 요청
    PinRequest { shortcut: ShortcutInfo },
    /// `gameplaza:` 스킴 VIEW 링크 (원문 그대로)
    ViewLink { link: String },
    /// INSTALL_SHORTCUT 브로드캐스트
    InstallShortcut {
        shortcut_name: Option<String>,
        shortcut_intent: Option<EmbeddedIntent>,
    },
    /// ACTION_MAIN + `shortcut_*` extra
    MainLaunch {
        shortcut_name: Option<String>,
        shortcut_uri: Option<String>,
        shortcut_package: Option<String>,
    },
    /// LauncherApps `onShortcutsChanged` 콜백
    LauncherApps {
        package: String,
        shortcut: ShortcutInfo,
        /// 디렉토리에서 다시 조회한 전체 정보
        resolved: Option<ShortcutInfo>,
    },
}

/// 디렉토리 조회 결과 레코드 (저장하지 않음)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutRecord {
    pub id: String,
    pub pinned: bool,
    pub short_label: String,
    pub long_label: String,
    pub intent_uri: String,
}

impl From<&ShortcutInfo> for ShortcutRecord {
    fn from(info: &ShortcutInfo) -> Self {
        Self {
            id: info.id.clone(),
            pinned: info.pinned,
            short_label: info.short_label.clone().unwrap_or_default(),
            long_label: info.long_label.clone().unwrap_or_default(),
            intent_uri: info
                .intent
                .as_ref()
                .map(EmbeddedIntent::to_uri)
                .unwrap_or_default(),
        }
    }
}

/// 디렉토리 조회 플래그 (비트 집합)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortcutQueryFlags(u8);

impl ShortcutQueryFlags {
    pub const DYNAMIC: Self = Self(1);
    pub const MANIFEST: Self = Self(1 << 1);
    pub const PINNED: Self = Self(1 << 2);
    pub const ALL: Self = Self(0b111);

    /// 모든 비트가 포함되어 있는지
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for ShortcutQueryFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// 디렉토리 조회 조건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutQuery {
    pub package: String,
    /// 지정 시 해당 ID만 조회
    pub ids: Option<Vec<String>>,
    pub flags: ShortcutQueryFlags,
}

impl ShortcutQuery {
    /// 패키지의 고정 바로가기 조회
    pub fn pinned(package: &str) -> Self {
        Self {
            package: package.to_string(),
            ids: None,
            flags: ShortcutQueryFlags::PINNED,
        }
    }
}
