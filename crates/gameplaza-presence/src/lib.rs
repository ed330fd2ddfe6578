//! # gameplaza-presence
//!
//! 프레즌스 세션 관리.
//!
//! ## 구조
//!
//! - [`session`]: Stopped / Active / Paused 상태 머신, 설정 영속화, 재시작 복원
//! - [`heartbeat_loop`]: 즉시 첫 틱 후 주기 전송, `watch` 기반 취소
//! - [`screen_gate`]: 화면 전원 이벤트 → 일시 정지/재개

pub mod heartbeat_loop;
pub mod screen_gate;
pub mod session;

#[cfg(test)]
mod test_support;

pub use screen_gate::ScreenStateGate;
pub use session::{PresenceSessionManager, RestoreOutcome};
