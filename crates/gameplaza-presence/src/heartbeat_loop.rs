//! 하트비트 루프.
//!
//! 첫 틱은 즉시, 이후 `interval_secs` 간격. 틱은 순차 실행된다.
//!
//! 취소는 `watch` 채널로 전달된다. 루프는 틱을 띄우기 직전에 채널 읽기 잠금을 잡은
//! 상태로 취소 플래그를 확인하고, `cancel()`은 쓰기 잠금으로 플래그를 세운다.
//! 따라서 `cancel()`이 반환된 뒤에는 새 틱이 시작되지 않는다.
//! 이미 전송 중인 요청은 별도 태스크에서 끝까지 실행된다.

use std::sync::Arc;

use gameplaza_core::models::presence::PresenceConfig;
use gameplaza_core::ports::heartbeat::HeartbeatSender;
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// 루프와 공유하는 세션 설정 (Start 시 제자리 교체)
pub type SharedConfig = Arc<RwLock<PresenceConfig>>;

/// 실행 중인 하트비트 루프 핸들
pub struct HeartbeatLoop {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl HeartbeatLoop {
    /// 루프 시작
    pub fn spawn(sender: Arc<dyn HeartbeatSender>, config: SharedConfig) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(run(sender, config, cancel_rx));
        info!("하트비트 루프 시작");
        Self { cancel_tx, handle }
    }

    /// 루프 취소
    ///
    /// 반환 시점 이후로 새 틱은 시작되지 않는다.
    pub fn cancel(self) {
        let _ = self.cancel_tx.send(true);
        info!("하트비트 루프 취소");
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn run(
    sender: Arc<dyn HeartbeatSender>,
    config: SharedConfig,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let mut ticks: u64 = 0;

    loop {
        let tick = {
            let cancelled = cancel_rx.borrow_and_update();
            if *cancelled {
                break;
            }

            let snapshot = config.read().clone();
            let sender = sender.clone();
            tokio::spawn(async move { sender.send(&snapshot).await })
        };
        ticks += 1;
        debug!("하트비트 틱 #{ticks}");

        // 전송 완료 또는 취소까지 대기 (취소 시 전송 태스크는 분리)
        tokio::select! {
            biased;
            _ = cancel_rx.changed() => break,
            _ = tick => {}
        }

        let interval = config.read().interval();
        tokio::select! {
            biased;
            _ = cancel_rx.changed() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    debug!("하트비트 루프 종료 (틱 {ticks}회)");
}
