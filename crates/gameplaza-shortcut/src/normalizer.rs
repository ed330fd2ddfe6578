//! 바로가기 신호 정규화.
//!
//! 여섯 가지 원시 신호를 하나의 `ShortcutEvent`로 변환하는 순수 함수.
//! 누락 필드는 고정된 대체 순서를 따라 최종적으로 빈 문자열이 된다.

use gameplaza_core::models::shortcut::{
    EmbeddedIntent, RawShortcutSignal, ShortcutEvent, ShortcutEventType, ShortcutInfo,
};

/// 원시 신호 정규화 (실패하지 않음)
pub fn normalize(signal: &RawShortcutSignal) -> ShortcutEvent {
    match signal {
        RawShortcutSignal::CreateShortcut {
            shortcut_name,
            shortcut_uri,
            data,
            icon,
        } => ShortcutEvent {
            event_type: ShortcutEventType::CreateShortcut,
            name: first_non_empty([shortcut_name.as_deref()]),
            uri: first_non_empty([shortcut_uri.as_deref(), data.as_deref()]),
            package: String::new(),
            id: None,
            icon_uri: Some(first_non_empty([icon.as_deref()])),
            action: None,
        },

        RawShortcutSignal::PinRequest { shortcut } => ShortcutEvent {
            event_type: ShortcutEventType::PinShortcut,
            name: label_of(shortcut, None),
            uri: intent_uri(shortcut.intent.as_ref()),
            package: package_of(shortcut.package.as_deref(), shortcut.intent.as_ref()),
            id: Some(shortcut.id.clone()),
            icon_uri: None,
            action: None,
        },

        RawShortcutSignal::ViewLink { link } => normalize_link(link),

        RawShortcutSignal::InstallShortcut {
            shortcut_name,
            shortcut_intent,
        } => ShortcutEvent {
            event_type: ShortcutEventType::InstallShortcut,
            name: first_non_empty([shortcut_name.as_deref()]),
            uri: intent_uri(shortcut_intent.as_ref()),
            package: package_of(None, shortcut_intent.as_ref()),
            id: None,
            icon_uri: None,
            action: Some(first_non_empty([shortcut_intent
                .as_ref()
                .and_then(|i| i.action.as_deref())])),
        },

        RawShortcutSignal::MainLaunch {
            shortcut_name,
            shortcut_uri,
            shortcut_package,
        } => ShortcutEvent {
            event_type: ShortcutEventType::MainShortcut,
            name: first_non_empty([shortcut_name.as_deref()]),
            uri: first_non_empty([shortcut_uri.as_deref()]),
            package: first_non_empty([shortcut_package.as_deref()]),
            id: None,
            icon_uri: None,
            action: None,
        },

        RawShortcutSignal::LauncherApps {
            package,
            shortcut,
            resolved,
        } => ShortcutEvent {
            event_type: ShortcutEventType::LauncherAppsShortcut,
            name: label_of(shortcut, resolved.as_ref()),
            uri: intent_uri(shortcut.intent.as_ref()),
            package: first_non_empty([Some(package.as_str()), shortcut.package.as_deref()]),
            id: Some(shortcut.id.clone()),
            icon_uri: None,
            action: None,
        },
    }
}

/// `gameplaza:` 링크의 쿼리 파라미터에서 필드 추출
fn normalize_link(link: &str) -> ShortcutEvent {
    let mut name = None;
    let mut uri = None;
    let mut package = None;

    if let Ok(parsed) = url::Url::parse(link) {
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "name" => name = Some(value.into_owned()),
                "uri" => uri = Some(value.into_owned()),
                "package" => package = Some(value.into_owned()),
                _ => {}
            }
        }
    }

    ShortcutEvent {
        event_type: ShortcutEventType::LaunchShortcut,
        name: first_non_empty([name.as_deref()]),
        uri: first_non_empty([uri.as_deref(), Some(link)]),
        package: first_non_empty([package.as_deref()]),
        id: None,
        icon_uri: None,
        action: None,
    }
}

/// 이름: 전체 조회 결과 라벨 → 콜백 라벨 → ID
fn label_of(shortcut: &ShortcutInfo, resolved: Option<&ShortcutInfo>) -> String {
    first_non_empty([
        resolved.and_then(|r| r.short_label.as_deref()),
        resolved.and_then(|r| r.long_label.as_deref()),
        shortcut.short_label.as_deref(),
        shortcut.long_label.as_deref(),
        Some(shortcut.id.as_str()),
    ])
}

/// URI: 하위 인텐트 데이터 → 재직렬화된 하위 인텐트
///
/// 핀 요청과 런처 콜백 모두 데이터 URI를 먼저 쓰고, 없을 때만 `#Intent;...` 형태로 내린다.
/// 핀 요청을 항상 직렬화 형태로 내보내던 동작과 일부러 다르게 맞춘 규칙이다.
fn intent_uri(intent: Option<&EmbeddedIntent>) -> String {
    let serialized = intent.map(EmbeddedIntent::to_uri);
    first_non_empty([
        intent.and_then(|i| i.data.as_deref()),
        serialized.as_deref(),
    ])
}

/// 패키지: 명시 값 → 하위 인텐트 패키지 → 컴포넌트 패키지
fn package_of(explicit: Option<&str>, intent: Option<&EmbeddedIntent>) -> String {
    first_non_empty([
        explicit,
        intent.and_then(|i| i.package.as_deref()),
        intent.and_then(|i| i.component_package.as_deref()),
    ])
}

fn first_non_empty<'a, I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|c| !c.is_empty())
        .unwrap_or_default()
        .to_string()
}
