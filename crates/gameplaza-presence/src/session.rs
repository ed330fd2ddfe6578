//! 프레즌스 세션 관리자.
//!
//! Stopped / Active / Paused 상태 머신. 설정 영속화와 하트비트 루프 수명을 함께 관리한다.
//!
//! 모든 전이는 하나의 비동기 잠금 아래에서 실행되므로 저장소 쓰기와 루프 교체가 섞이지 않는다.
//! 제어 경계로 올라가는 에러는 `InvalidArgument`뿐이다. 저장소 실패는 로그만 남긴다.

use std::sync::Arc;

use gameplaza_core::error::CoreError;
use gameplaza_core::models::presence::{
    PowerEvent, PresenceConfig, PresenceSessionState, StartRequest,
};
use gameplaza_core::ports::heartbeat::HeartbeatSender;
use gameplaza_core::ports::presence_store::PresenceStore;
use parking_lot::RwLock;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::heartbeat_loop::{HeartbeatLoop, SharedConfig};

/// 프로세스 재시작 복원 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// 저장된 세션으로 하트비트 재개
    Resumed,
    /// 재개할 세션 없음 (호스트 서비스는 스스로 종료해도 된다)
    NothingToResume,
}

#[derive(Default)]
struct SessionInner {
    config: Option<SharedConfig>,
    heartbeat: Option<HeartbeatLoop>,
}

impl SessionInner {
    fn cancel_loop(&mut self) {
        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.cancel();
        }
    }
}

/// 프레즌스 세션 관리자
pub struct PresenceSessionManager {
    store: Arc<dyn PresenceStore>,
    sender: Arc<dyn HeartbeatSender>,
    inner: Mutex<SessionInner>,
    state_tx: watch::Sender<PresenceSessionState>,
}

impl PresenceSessionManager {
    pub fn new(store: Arc<dyn PresenceStore>, sender: Arc<dyn HeartbeatSender>) -> Self {
        let (state_tx, _) = watch::channel(PresenceSessionState::Stopped);
        Self {
            store,
            sender,
            inner: Mutex::new(SessionInner::default()),
            state_tx,
        }
    }

    /// 현재 상태
    pub fn state(&self) -> PresenceSessionState {
        *self.state_tx.borrow()
    }

    /// 상태 변경 구독
    pub fn subscribe_state(&self) -> watch::Receiver<PresenceSessionState> {
        self.state_tx.subscribe()
    }

    /// 현재 세션 설정 (Stopped면 None)
    pub async fn current_config(&self) -> Option<PresenceConfig> {
        let inner = self.inner.lock().await;
        inner.config.as_ref().map(|shared| shared.read().clone())
    }

    /// 세션 시작 요청 (검증 포함)
    pub async fn start_request(
        &self,
        request: StartRequest,
        default_interval_secs: u64,
    ) -> Result<(), CoreError> {
        let config = request.into_config(default_interval_secs)?;
        self.start(config).await
    }

    /// 세션 시작
    ///
    /// 설정을 통째로 저장하고 Active로 전이한다. 이미 Active면 루프를 새로 만들지 않고
    /// 설정만 교체한다 (다음 틱부터 적용).
    pub async fn start(&self, config: PresenceConfig) -> Result<(), CoreError> {
        config.validate()?;

        let mut inner = self.inner.lock().await;

        if let Err(e) = self.store.save(&config).await {
            warn!("세션 설정 저장 실패 (메모리 세션은 계속): {e}");
        }

        let game = config.game_name().unwrap_or("-").to_string();
        let interval = config.interval_secs;

        let running = inner.heartbeat.as_ref().and(inner.config.clone());
        match running {
            Some(shared) => {
                *shared.write() = config;
                info!("세션 설정 교체: game={game}, interval={interval}s");
            }
            None => {
                let shared = Arc::new(RwLock::new(config));
                inner.heartbeat = Some(HeartbeatLoop::spawn(self.sender.clone(), shared.clone()));
                inner.config = Some(shared);
                info!("세션 시작: game={game}, interval={interval}s");
            }
        }

        self.set_state(PresenceSessionState::Active);
        Ok(())
    }

    /// 세션 종료 (어느 상태에서든)
    ///
    /// 루프를 취소하고 저장된 설정을 삭제한다.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;

        inner.cancel_loop();
        inner.config = None;

        if let Err(e) = self.store.clear().await {
            warn!("세션 설정 삭제 실패: {e}");
        }

        if self.state() != PresenceSessionState::Stopped {
            info!("세션 종료");
        }
        self.set_state(PresenceSessionState::Stopped);
    }

    /// 화면 전원 이벤트 처리
    ///
    /// 저장된 설정은 건드리지 않는다.
    pub async fn handle_power_event(&self, event: PowerEvent) {
        let mut inner = self.inner.lock().await;
        let state = self.state();

        match (event, state) {
            (PowerEvent::ScreenOff, PresenceSessionState::Active) => {
                inner.cancel_loop();
                self.set_state(PresenceSessionState::Paused);
                info!("화면 꺼짐: 하트비트 일시 정지");
            }
            (PowerEvent::ScreenOn | PowerEvent::UserPresent, PresenceSessionState::Paused) => {
                match inner.config.clone() {
                    Some(shared) => {
                        inner.heartbeat =
                            Some(HeartbeatLoop::spawn(self.sender.clone(), shared));
                        self.set_state(PresenceSessionState::Active);
                        info!("화면 켜짐: 하트비트 재개");
                    }
                    None => {
                        warn!("일시 정지 상태인데 세션 설정 없음, 종료 상태로 전환");
                        self.set_state(PresenceSessionState::Stopped);
                    }
                }
            }
            (event, state) => {
                debug!("전원 이벤트 무시: {event:?} ({state})");
            }
        }
    }

    /// 프로세스 재시작 후 저장된 세션 복원
    pub async fn restore(&self) -> RestoreOutcome {
        let mut inner = self.inner.lock().await;

        if inner.config.is_some() {
            debug!("세션이 이미 진행 중, 복원 생략");
            return RestoreOutcome::Resumed;
        }

        let loaded = match self.store.load().await {
            Ok(loaded) => loaded,
            Err(e) if e.is_corrupt_record() => {
                warn!("세션 레코드 손상, 삭제: {e}");
                self.discard_record().await;
                return RestoreOutcome::NothingToResume;
            }
            Err(e) => {
                // 레코드는 남겨 다음 재시작에서 다시 시도한다
                warn!("세션 레코드 읽기 실패: {e}");
                return RestoreOutcome::NothingToResume;
            }
        };

        let Some(config) = loaded else {
            info!("복원할 세션 없음");
            return RestoreOutcome::NothingToResume;
        };

        if let Err(e) = config.validate() {
            warn!("저장된 세션 설정이 유효하지 않음, 삭제: {e}");
            self.discard_record().await;
            return RestoreOutcome::NothingToResume;
        }

        info!(
            "세션 복원: game={}, interval={}s",
            config.game_name().unwrap_or("-"),
            config.interval_secs
        );
        let shared = Arc::new(RwLock::new(config));
        inner.heartbeat = Some(HeartbeatLoop::spawn(self.sender.clone(), shared.clone()));
        inner.config = Some(shared);
        self.set_state(PresenceSessionState::Active);

        RestoreOutcome::Resumed
    }

    /// 프로세스 종료 시 정리
    ///
    /// 루프만 내리고 저장된 설정은 남겨 다음 실행에서 복원할 수 있게 한다.
    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        inner.cancel_loop();
        inner.config = None;
        self.set_state(PresenceSessionState::Stopped);
        debug!("세션 관리자 종료");
    }

    async fn discard_record(&self) {
        if let Err(e) = self.store.clear().await {
            warn!("세션 레코드 삭제 실패: {e}");
        }
    }

    fn set_state(&self, state: PresenceSessionState) {
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            debug!("세션 상태: {current} → {state}");
            *current = state;
            true
        });
    }
}
