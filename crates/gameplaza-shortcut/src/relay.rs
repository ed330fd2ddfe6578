//! 단일 슬롯 이벤트 릴레이.
//!
//! 전달되지 않은 이벤트를 최대 1개 보관하고, 최대 1개의 소비자에게 전달한다.
//! 새 이벤트는 소비되지 않은 이전 이벤트를 덮어쓴다 (큐 없음).
//!
//! 모든 연산은 하나의 임계 구역(`parking_lot::Mutex`) 안에서 실행된다.
//! `pull_once`와 `attach`가 경쟁하면 락을 먼저 잡은 쪽이 이벤트를 가져가고,
//! 다른 쪽은 빈 결과를 본다.

use gameplaza_core::models::shortcut::ShortcutEvent;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

/// 소비자 핸들
pub type ShortcutConsumer = mpsc::UnboundedSender<ShortcutEvent>;

#[derive(Default)]
struct RelayState {
    pending: Option<ShortcutEvent>,
    consumer: Option<ShortcutConsumer>,
}

/// 단일 슬롯 릴레이
///
/// 호스트 프로세스가 `Arc<ShortcutRelay>`로 소유하고 캡처 경로와 호스트 API가 공유한다.
#[derive(Default)]
pub struct ShortcutRelay {
    state: Mutex<RelayState>,
}

impl ShortcutRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이벤트 전달
    ///
    /// 소비자가 있으면 즉시 넘기고 보관하지 않는다. 없으면 슬롯에 덮어쓴다.
    /// 소비자의 수신 측이 이미 닫혔다면 소비자를 해제하고 이벤트를 보관한다.
    pub fn deliver(&self, event: ShortcutEvent) {
        let mut state = self.state.lock();

        let event = match state.consumer.as_ref() {
            Some(consumer) => match consumer.send(event) {
                Ok(()) => {
                    debug!("바로가기 이벤트 즉시 전달");
                    return;
                }
                Err(mpsc::error::SendError(event)) => {
                    debug!("소비자 수신 측 종료, 해제 후 보관");
                    state.consumer = None;
                    event
                }
            },
            None => event,
        };

        if state.pending.is_some() {
            debug!("소비되지 않은 바로가기 이벤트 덮어씀");
        }
        state.pending = Some(event);
    }

    /// 소비자 연결 (기존 소비자는 교체)
    ///
    /// 보관 중인 이벤트가 있으면 새 소비자에게 즉시 전달하고 슬롯을 비운다.
    pub fn attach(&self, consumer: ShortcutConsumer) {
        let mut state = self.state.lock();

        if let Some(event) = state.pending.take() {
            if let Err(mpsc::error::SendError(event)) = consumer.send(event) {
                // 이미 닫힌 소비자는 연결하지 않는다
                state.pending = Some(event);
                return;
            }
            debug!("보관 중이던 바로가기 이벤트 전달");
        }

        state.consumer = Some(consumer);
    }

    /// 채널을 만들어 연결하고 수신 측 반환
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ShortcutEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.attach(tx);
        rx
    }

    /// 소비자 해제 (이후 이벤트는 다시 보관)
    pub fn detach(&self) {
        self.state.lock().consumer = None;
    }

    /// 보관 중인 이벤트를 꺼냄 (소비자 연결 여부와 무관)
    pub fn pull_once(&self) -> Option<ShortcutEvent> {
        self.state.lock().pending.take()
    }

    pub fn has_consumer(&self) -> bool {
        self.state.lock().consumer.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gameplaza_core::models::shortcut::ShortcutEventType;
    use std::sync::Arc;

    fn event(name: &str) -> ShortcutEvent {
        ShortcutEvent {
            event_type: ShortcutEventType::MainShortcut,
            name: name.to_string(),
            uri: format!("app://{name}"),
            package: String::new(),
            id: None,
            icon_uri: None,
            action: None,
        }
    }

    #[test]
    fn pull_returns_last_delivered_then_empty() {
        let relay = ShortcutRelay::new();
        for name in ["a", "b", "c"] {
            relay.deliver(event(name));
        }

        assert_eq!(relay.pull_once().map(|e| e.name), Some("c".to_string()));
        assert!(relay.pull_once().is_none());
    }

    #[test]
    fn pull_on_empty_relay() {
        let relay = ShortcutRelay::new();
        assert!(relay.pull_once().is_none());
    }

    #[test]
    fn attach_first_receives_every_event() {
        let relay = ShortcutRelay::new();
        let mut rx = relay.subscribe();

        for name in ["a", "b", "c"] {
            relay.deliver(event(name));
        }

        let received: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.name)
            .collect();
        assert_eq!(received, vec!["a", "b", "c"]);
        assert!(!relay.has_pending());
        assert!(relay.pull_once().is_none());
    }

    #[test]
    fn attach_flushes_pending_once() {
        let relay = ShortcutRelay::new();
        relay.deliver(event("old"));
        relay.deliver(event("new"));

        let mut rx = relay.subscribe();
        assert_eq!(rx.try_recv().unwrap().name, "new");
        assert!(rx.try_recv().is_err());
        assert!(relay.pull_once().is_none());
    }

    #[test]
    fn detach_resumes_buffering() {
        let relay = ShortcutRelay::new();
        let mut rx = relay.subscribe();
        relay.detach();
        assert!(!relay.has_consumer());

        relay.deliver(event("late"));
        assert!(rx.try_recv().is_err());
        assert_eq!(relay.pull_once().unwrap().name, "late");
    }

    #[test]
    fn attach_replaces_previous_consumer() {
        let relay = ShortcutRelay::new();
        let mut first = relay.subscribe();
        let mut second = relay.subscribe();

        relay.deliver(event("x"));
        assert!(first.try_recv().is_err());
        assert_eq!(second.try_recv().unwrap().name, "x");
    }

    #[test]
    fn dropped_consumer_falls_back_to_buffer() {
        let relay = ShortcutRelay::new();
        let rx = relay.subscribe();
        drop(rx);

        relay.deliver(event("kept"));
        assert!(!relay.has_consumer());
        assert_eq!(relay.pull_once().unwrap().name, "kept");
    }

    #[test]
    fn attaching_closed_consumer_keeps_pending() {
        let relay = ShortcutRelay::new();
        relay.deliver(event("kept"));

        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        relay.attach(tx);

        assert!(!relay.has_consumer());
        assert_eq!(relay.pull_once().unwrap().name, "kept");
    }

    #[test]
    fn concurrent_pull_and_attach_observe_event_exactly_once() {
        for _ in 0..200 {
            let relay = Arc::new(ShortcutRelay::new());
            relay.deliver(event("race"));

            let (tx, mut rx) = mpsc::unbounded_channel();
            let puller = {
                let relay = relay.clone();
                std::thread::spawn(move || relay.pull_once())
            };
            let attacher = {
                let relay = relay.clone();
                std::thread::spawn(move || relay.attach(tx))
            };

            let pulled = puller.join().unwrap();
            attacher.join().unwrap();
            let pushed = rx.try_recv().ok();

            assert!(pulled.is_some() ^ pushed.is_some());
        }
    }
}
