//! 테스트용 포트 구현.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gameplaza_core::error::CoreError;
use gameplaza_core::models::presence::PresenceConfig;
use gameplaza_core::ports::heartbeat::HeartbeatSender;
use gameplaza_core::ports::presence_store::PresenceStore;
use parking_lot::Mutex;

/// 전송된 설정을 기록하는 하트비트 전송기
#[derive(Default)]
pub(crate) struct RecordingSender {
    sent: Mutex<Vec<PresenceConfig>>,
    completed: AtomicUsize,
    delay: Option<Duration>,
}

impl RecordingSender {
    pub(crate) fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    /// 시작된 전송 수
    pub(crate) fn count(&self) -> usize {
        self.sent.lock().len()
    }

    /// 끝까지 완료된 전송 수
    pub(crate) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub(crate) fn games(&self) -> Vec<Option<String>> {
        self.sent.lock().iter().map(|c| c.game.clone()).collect()
    }

    pub(crate) fn last(&self) -> Option<PresenceConfig> {
        self.sent.lock().last().cloned()
    }
}

#[async_trait]
impl HeartbeatSender for RecordingSender {
    async fn send(&self, config: &PresenceConfig) {
        self.sent.lock().push(config.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// 인메모리 세션 저장소
#[derive(Default)]
pub(crate) struct MemoryStore {
    record: Mutex<Option<PresenceConfig>>,
    fail_writes: AtomicBool,
    next_load_error: Mutex<Option<CoreError>>,
}

impl MemoryStore {
    pub(crate) fn with_record(config: PresenceConfig) -> Self {
        Self {
            record: Mutex::new(Some(config)),
            ..Default::default()
        }
    }

    pub(crate) fn record(&self) -> Option<PresenceConfig> {
        self.record.lock().clone()
    }

    /// 다음 `load` 한 번만 주어진 에러로 실패
    pub(crate) fn fail_next_load(&self, err: CoreError) {
        *self.next_load_error.lock() = Some(err);
    }

    pub(crate) fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("디스크 가득 참".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PresenceStore for MemoryStore {
    async fn load(&self) -> Result<Option<PresenceConfig>, CoreError> {
        if let Some(err) = self.next_load_error.lock().take() {
            return Err(err);
        }
        Ok(self.record.lock().clone())
    }

    async fn save(&self, config: &PresenceConfig) -> Result<(), CoreError> {
        self.check()?;
        *self.record.lock() = Some(config.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CoreError> {
        self.check()?;
        *self.record.lock() = None;
        Ok(())
    }
}
