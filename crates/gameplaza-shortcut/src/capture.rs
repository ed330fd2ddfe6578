//! 바로가기 캡처 파이프라인.
//!
//! 인텐트 판별 → 정규화 → 릴레이 전달.

use std::sync::Arc;

use gameplaza_core::models::intent::{actions, extras, IncomingIntent};
use gameplaza_core::models::shortcut::{RawShortcutSignal, ShortcutInfo};
use tracing::{debug, info};

use crate::directory::ShortcutDirectory;
use crate::normalizer::normalize;
use crate::relay::ShortcutRelay;

/// 딥링크 스킴
pub const LINK_SCHEME: &str = "gameplaza";

/// 인텐트를 원시 바로가기 신호로 판별
///
/// 바로가기와 무관한 인텐트는 `None`.
pub fn classify(intent: &IncomingIntent) -> Option<RawShortcutSignal> {
    let action = intent.action.as_deref()?;
    let extra = |key: &str| intent.get_extra(key).map(str::to_string);

    match action {
        actions::CREATE_SHORTCUT => Some(RawShortcutSignal::CreateShortcut {
            shortcut_name: extra(extras::EXTRA_SHORTCUT_NAME),
            shortcut_uri: extra(extras::SHORTCUT_URI),
            data: intent.data.clone(),
            icon: extra(extras::SHORTCUT_ICON),
        }),

        actions::CONFIRM_PIN_SHORTCUT => match &intent.pin_request {
            Some(shortcut) => Some(RawShortcutSignal::PinRequest {
                shortcut: shortcut.clone(),
            }),
            None => {
                debug!("핀 고정 요청 정보 없음, 무시");
                None
            }
        },

        actions::VIEW => {
            let link = intent.data.as_deref()?;
            if is_app_link(link) {
                Some(RawShortcutSignal::ViewLink {
                    link: link.to_string(),
                })
            } else {
                debug!("앱 링크가 아닌 VIEW 인텐트 무시: {link}");
                None
            }
        }

        actions::INSTALL_SHORTCUT => Some(RawShortcutSignal::InstallShortcut {
            shortcut_name: extra(extras::EXTRA_SHORTCUT_NAME),
            shortcut_intent: intent.shortcut_intent.clone(),
        }),

        actions::MAIN if intent.has_extra(extras::SHORTCUT_NAME) => {
            Some(RawShortcutSignal::MainLaunch {
                shortcut_name: extra(extras::SHORTCUT_NAME),
                shortcut_uri: extra(extras::SHORTCUT_URI),
                shortcut_package: extra(extras::SHORTCUT_PACKAGE),
            })
        }

        other => {
            debug!("바로가기와 무관한 인텐트: {other}");
            None
        }
    }
}

fn is_app_link(link: &str) -> bool {
    url::Url::parse(link)
        .map(|url| url.scheme() == LINK_SCHEME)
        .unwrap_or(false)
}

/// 캡처 파이프라인
///
/// OS 콜백 진입점. 정규화된 이벤트는 공유 릴레이로 보낸다.
pub struct ShortcutCapture {
    relay: Arc<ShortcutRelay>,
    directory: ShortcutDirectory,
}

impl ShortcutCapture {
    pub fn new(relay: Arc<ShortcutRelay>, directory: ShortcutDirectory) -> Self {
        Self { relay, directory }
    }

    /// 수신 인텐트 처리 (전달했으면 true)
    ///
    /// 핀 고정 요청은 이벤트를 전달한 뒤 런처에 수락을 알린다.
    pub fn on_intent(&self, intent: &IncomingIntent) -> bool {
        let Some(signal) = classify(intent) else {
            return false;
        };

        self.emit(&signal);
        if let RawShortcutSignal::PinRequest { shortcut } = &signal {
            let accepted = self.directory.accept_pin_request(shortcut);
            info!("핀 고정 요청 처리: {} (수락 {accepted})", shortcut.id);
        }
        true
    }

    /// 런처 바로가기 변경 콜백
    ///
    /// 고정된 바로가기마다 전체 정보를 조회해 이벤트 하나씩 전달한다.
    /// 전달한 이벤트 수 반환.
    pub fn on_shortcuts_changed(&self, package: &str, shortcuts: &[ShortcutInfo]) -> usize {
        debug!("바로가기 변경: {package}, {}개", shortcuts.len());

        let mut emitted = 0;
        for shortcut in shortcuts.iter().filter(|s| s.pinned) {
            let resolved = self.directory.resolve(package, &shortcut.id);
            self.emit(&RawShortcutSignal::LauncherApps {
                package: package.to_string(),
                shortcut: shortcut.clone(),
                resolved,
            });
            emitted += 1;
        }
        emitted
    }

    fn emit(&self, signal: &RawShortcutSignal) {
        let event = normalize(signal);
        info!("바로가기 이벤트: {} {:?}", event.event_type, event.name);
        self.relay.deliver(event);
    }
}
