//! 프레즌스 설정 영속 저장소 포트.
//!
//! 구현: `gameplaza-storage` crate (rusqlite)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::presence::PresenceConfig;

/// 세션 설정 저장소
///
/// 레코드가 있으면 세션이 Active 의도, 없으면 Stopped.
/// 쓰기는 항상 레코드 전체 교체 또는 삭제다.
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// 저장된 설정 로드 (없으면 None)
    async fn load(&self) -> Result<Option<PresenceConfig>, CoreError>;

    /// 설정 전체 교체
    async fn save(&self, config: &PresenceConfig) -> Result<(), CoreError>;

    /// 설정 삭제
    async fn clear(&self) -> Result<(), CoreError>;
}
