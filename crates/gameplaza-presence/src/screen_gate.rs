//! 화면 상태 게이트.
//!
//! 전원 브로드캐스트를 받아 세션 관리자의 일시 정지/재개로 넘긴다.

use std::sync::Arc;

use gameplaza_core::models::presence::PowerEvent;
use tracing::debug;

use crate::session::PresenceSessionManager;

/// 화면 상태 게이트
#[derive(Clone)]
pub struct ScreenStateGate {
    manager: Arc<PresenceSessionManager>,
}

impl ScreenStateGate {
    pub fn new(manager: Arc<PresenceSessionManager>) -> Self {
        Self { manager }
    }

    /// 브로드캐스트 액션 문자열 처리
    ///
    /// 알 수 없는 액션이면 false.
    pub async fn on_broadcast(&self, action: &str) -> bool {
        match PowerEvent::from_action(action) {
            Some(event) => {
                self.manager.handle_power_event(event).await;
                true
            }
            None => {
                debug!("전원 이벤트가 아닌 브로드캐스트 무시: {action}");
                false
            }
        }
    }
}
