//! 하트비트 전송 포트.
//!
//! 구현: `gameplaza-network` crate (reqwest)

use async_trait::async_trait;

use crate::models::presence::PresenceConfig;

/// 하트비트 1회 전송
///
/// 실패는 구현체 내부에서 로그로 흡수한다. 스케줄러는 결과를 받지 않으며,
/// 다음 틱이 곧 재시도다.
#[async_trait]
pub trait HeartbeatSender: Send + Sync {
    async fn send(&self, config: &PresenceConfig);
}
