//! 호스트 브리지.
//!
//! 표준 입력으로 한 줄에 하나씩 JSON 명령을 받고, 응답과 푸시 이벤트를
//! 표준 출력에 JSON 한 줄로 쓴다. 로그는 stderr로만 나간다.

use std::sync::Arc;

use gameplaza_core::error::CoreError;
use gameplaza_core::models::intent::IncomingIntent;
use gameplaza_core::models::presence::StartRequest;
use gameplaza_core::models::shortcut::{ShortcutInfo, ShortcutQueryFlags};
use gameplaza_presence::{PresenceSessionManager, ScreenStateGate};
use gameplaza_shortcut::{ShortcutCapture, ShortcutDirectory, ShortcutRelay};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 인자 오류 응답 코드
pub const INVALID_ARGS: &str = "INVALID_ARGS";

/// 호스트 명령 (`cmd` 태그)
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum HostCommand {
    Start(StartRequest),
    Stop,
    Screen {
        action: String,
    },
    Intent {
        intent: IncomingIntent,
    },
    ShortcutsChanged {
        package: String,
        #[serde(default)]
        shortcuts: Vec<ShortcutInfo>,
    },
    Pending,
    Subscribe,
    Unsubscribe,
    StartShortcut {
        package: String,
        id: String,
    },
    UnpinShortcut {
        package: String,
        id: String,
    },
    QueryShortcuts {
        package: String,
        #[serde(default)]
        ids: Option<Vec<String>>,
        #[serde(default = "all_flags")]
        flags: ShortcutQueryFlags,
    },
    State,
}

fn all_flags() -> ShortcutQueryFlags {
    ShortcutQueryFlags::ALL
}

/// 명령 응답
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostReply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl HostReply {
    fn ok() -> Self {
        Self {
            ok: true,
            code: None,
            message: None,
            data: None,
        }
    }

    fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::ok()
        }
    }

    fn invalid_args(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            code: Some(INVALID_ARGS),
            message: Some(message.into()),
            data: None,
        }
    }
}

/// 브리지가 사용하는 서비스 묶음
pub struct HostServices {
    pub session: Arc<PresenceSessionManager>,
    pub relay: Arc<ShortcutRelay>,
    pub directory: ShortcutDirectory,
    pub default_interval_secs: u64,
}

/// 호스트 브리지
pub struct HostBridge {
    session: Arc<PresenceSessionManager>,
    gate: ScreenStateGate,
    capture: ShortcutCapture,
    relay: Arc<ShortcutRelay>,
    directory: ShortcutDirectory,
    default_interval_secs: u64,
    out_tx: mpsc::UnboundedSender<String>,
    forwarder: Option<JoinHandle<()>>,
}

impl HostBridge {
    /// 브리지 생성. 출력 줄은 반환된 수신기로 흘러간다.
    pub fn new(services: HostServices) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let bridge = Self {
            gate: ScreenStateGate::new(services.session.clone()),
            capture: ShortcutCapture::new(services.relay.clone(), services.directory.clone()),
            session: services.session,
            relay: services.relay,
            directory: services.directory,
            default_interval_secs: services.default_interval_secs,
            out_tx,
            forwarder: None,
        };
        (bridge, out_rx)
    }

    /// 입력 스트림 처리 루프
    ///
    /// 입력이 끝나거나 종료 신호가 오면 반환한다.
    pub async fn run<R, W>(
        mut self,
        input: R,
        output: W,
        out_rx: mpsc::UnboundedReceiver<String>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(), CoreError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let writer = tokio::spawn(write_lines(output, out_rx));
        let mut lines = input.lines();

        info!("호스트 브리지 시작");
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) if line.trim().is_empty() => continue,
                        Some(line) => {
                            let reply = self.handle_line(&line).await;
                            self.emit(&reply);
                        }
                        None => {
                            debug!("입력 종료");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.changed() => break,
            }
        }

        self.unsubscribe().await;
        drop(self);
        match writer.await {
            Ok(result) => result?,
            Err(e) => warn!("출력 태스크 비정상 종료: {e}"),
        }
        info!("호스트 브리지 종료");
        Ok(())
    }

    /// JSON 한 줄 처리
    pub async fn handle_line(&mut self, line: &str) -> HostReply {
        match serde_json::from_str::<HostCommand>(line) {
            Ok(command) => self.dispatch(command).await,
            Err(e) => {
                warn!("잘못된 명령: {e}");
                HostReply::invalid_args(format!("명령 파싱 실패: {e}"))
            }
        }
    }

    /// 명령 실행
    pub async fn dispatch(&mut self, command: HostCommand) -> HostReply {
        match command {
            HostCommand::Start(request) => {
                match self
                    .session
                    .start_request(request, self.default_interval_secs)
                    .await
                {
                    Ok(()) => HostReply::ok(),
                    Err(e) if e.is_invalid_argument() => HostReply::invalid_args(e.to_string()),
                    Err(e) => {
                        // 세션 관리자는 InvalidArgument 외에는 올리지 않는다
                        warn!("세션 시작 중 예상치 못한 에러: {e}");
                        HostReply::ok()
                    }
                }
            }

            HostCommand::Stop => {
                self.session.stop().await;
                HostReply::ok()
            }

            HostCommand::Screen { action } => {
                if self.gate.on_broadcast(&action).await {
                    HostReply::ok()
                } else {
                    HostReply::invalid_args(format!("알 수 없는 전원 액션: {action}"))
                }
            }

            HostCommand::Intent { intent } => {
                let captured = self.capture.on_intent(&intent);
                HostReply::with_data(serde_json::json!({ "captured": captured }))
            }

            HostCommand::ShortcutsChanged { package, shortcuts } => {
                let emitted = self.capture.on_shortcuts_changed(&package, &shortcuts);
                HostReply::with_data(serde_json::json!({ "emitted": emitted }))
            }

            HostCommand::Pending => match self.relay.pull_once() {
                Some(event) => to_reply(&event),
                None => HostReply::with_data(Value::Null),
            },

            HostCommand::Subscribe => {
                self.subscribe().await;
                HostReply::ok()
            }

            HostCommand::Unsubscribe => {
                self.unsubscribe().await;
                HostReply::ok()
            }

            HostCommand::StartShortcut { package, id } => {
                let started = self.directory.start_pinned(&package, &id);
                HostReply::with_data(Value::Bool(started))
            }

            HostCommand::UnpinShortcut { package, id } => {
                let unpinned = self.directory.unpin(&package, &id);
                HostReply::with_data(Value::Bool(unpinned))
            }

            HostCommand::QueryShortcuts {
                package,
                ids,
                flags,
            } => {
                let records = self.directory.query(&package, ids.as_deref(), flags);
                to_reply(&records)
            }

            HostCommand::State => {
                let config = self.session.current_config().await;
                HostReply::with_data(serde_json::json!({
                    "state": self.session.state(),
                    "game": config.as_ref().and_then(|c| c.game_name().map(str::to_string)),
                    "intervalSeconds": config.as_ref().map(|c| c.interval_secs),
                }))
            }
        }
    }

    /// 릴레이 구독: 이벤트를 출력 줄로 푸시
    ///
    /// 이전 구독이 있으면 먼저 정리해 이벤트 순서를 유지한다.
    async fn subscribe(&mut self) {
        self.unsubscribe().await;

        let mut events = self.relay.subscribe();
        let out_tx = self.out_tx.clone();
        // 릴레이가 송신 측을 놓으면 채널에 남은 이벤트까지 내보낸 뒤 끝난다
        self.forwarder = Some(tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let line = match serde_json::to_string(&serde_json::json!({
                    "event": "shortcut",
                    "data": event,
                })) {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("바로가기 이벤트 직렬화 실패: {e}");
                        continue;
                    }
                };
                if out_tx.send(line).is_err() {
                    break;
                }
            }
        }));
        debug!("바로가기 이벤트 구독 시작");
    }

    /// 구독 해제
    ///
    /// 릴레이에서 소비자를 떼어낸 뒤, 이미 넘겨받은 이벤트가 모두 출력될 때까지 기다린다.
    async fn unsubscribe(&mut self) {
        self.relay.detach();
        if let Some(forwarder) = self.forwarder.take() {
            if let Err(e) = forwarder.await {
                warn!("바로가기 전달 태스크 비정상 종료: {e}");
            }
            debug!("바로가기 이벤트 구독 해제");
        }
    }

    fn emit(&self, reply: &HostReply) {
        match serde_json::to_string(reply) {
            Ok(line) => {
                let _ = self.out_tx.send(line);
            }
            Err(e) => warn!("응답 직렬화 실패: {e}"),
        }
    }
}

fn to_reply<T: Serialize>(value: &T) -> HostReply {
    match serde_json::to_value(value) {
        Ok(data) => HostReply::with_data(data),
        Err(e) => {
            warn!("응답 데이터 직렬화 실패: {e}");
            HostReply::with_data(Value::Null)
        }
    }
}

async fn write_lines<W>(
    mut output: W,
    mut lines: mpsc::UnboundedReceiver<String>,
) -> Result<(), CoreError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = lines.recv().await {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gameplaza_core::models::intent::actions;
    use gameplaza_core::models::presence::{PresenceConfig, PresenceSessionState};
    use gameplaza_core::ports::heartbeat::HeartbeatSender;
    use gameplaza_core::ports::presence_store::PresenceStore;
    use gameplaza_shortcut::UnsupportedShortcutRegistry;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct NullSender;

    #[async_trait]
    impl HeartbeatSender for NullSender {
        async fn send(&self, _config: &PresenceConfig) {}
    }

    #[derive(Default)]
    struct MemoryStore(Mutex<Option<PresenceConfig>>);

    #[async_trait]
    impl PresenceStore for MemoryStore {
        async fn load(&self) -> Result<Option<PresenceConfig>, CoreError> {
            Ok(self.0.lock().clone())
        }
        async fn save(&self, config: &PresenceConfig) -> Result<(), CoreError> {
            *self.0.lock() = Some(config.clone());
            Ok(())
        }
        async fn clear(&self) -> Result<(), CoreError> {
            *self.0.lock() = None;
            Ok(())
        }
    }

    fn bridge() -> (HostBridge, mpsc::UnboundedReceiver<String>) {
        HostBridge::new(HostServices {
            session: Arc::new(PresenceSessionManager::new(
                Arc::new(MemoryStore::default()),
                Arc::new(NullSender),
            )),
            relay: Arc::new(ShortcutRelay::new()),
            directory: ShortcutDirectory::new(Arc::new(UnsupportedShortcutRegistry)),
            default_interval_secs: 30,
        })
    }

    #[tokio::test]
    async fn start_and_state() {
        let (mut bridge, _out) = bridge();

        let reply = bridge
            .handle_line(r#"{"cmd":"start","baseUrl":"https://x.test","token":"tok","game":"Chess"}"#)
            .await;
        assert!(reply.ok);

        let reply = bridge.handle_line(r#"{"cmd":"state"}"#).await;
        let data = reply.data.unwrap();
        assert_eq!(data["state"], "active");
        assert_eq!(data["game"], "Chess");
        assert_eq!(data["intervalSeconds"], 30);

        bridge.handle_line(r#"{"cmd":"stop"}"#).await;
        assert_eq!(bridge.session.state(), PresenceSessionState::Stopped);
    }

    #[tokio::test]
    async fn invalid_start_reports_invalid_args() {
        let (mut bridge, _out) = bridge();

        let reply = bridge
            .handle_line(r#"{"cmd":"start","baseUrl":"https://x.test","token":"tok","interval":-5}"#)
            .await;
        assert!(!reply.ok);
        assert_eq!(reply.code, Some(INVALID_ARGS));

        let reply = bridge.handle_line(r#"{"cmd":"start","token":"tok"}"#).await;
        assert_eq!(reply.code, Some(INVALID_ARGS));
        assert_eq!(bridge.session.state(), PresenceSessionState::Stopped);
    }

    #[tokio::test]
    async fn malformed_line_is_invalid_args() {
        let (mut bridge, _out) = bridge();
        let reply = bridge.handle_line("not json").await;
        assert_eq!(reply.code, Some(INVALID_ARGS));

        let reply = bridge.handle_line(r#"{"cmd":"launch_rockets"}"#).await;
        assert_eq!(reply.code, Some(INVALID_ARGS));
    }

    #[tokio::test]
    async fn screen_command_pauses_session() {
        let (mut bridge, _out) = bridge();
        bridge
            .handle_line(r#"{"cmd":"start","baseUrl":"https://x.test","token":"tok"}"#)
            .await;

        let reply = bridge
            .handle_line(r#"{"cmd":"screen","action":"android.intent.action.SCREEN_OFF"}"#)
            .await;
        assert!(reply.ok);
        assert_eq!(bridge.session.state(), PresenceSessionState::Paused);

        let reply = bridge
            .handle_line(r#"{"cmd":"screen","action":"bogus"}"#)
            .await;
        assert_eq!(reply.code, Some(INVALID_ARGS));
    }

    #[tokio::test]
    async fn pending_returns_buffered_event_once() {
        let (mut bridge, _out) = bridge();

        let intent = serde_json::json!({
            "cmd": "intent",
            "intent": {
                "action": actions::CREATE_SHORTCUT,
                "extras": {
                    "android.intent.extra.shortcut.NAME": "Solitaire",
                    "shortcut_uri": "app://solitaire"
                }
            }
        });
        let reply = bridge.handle_line(&intent.to_string()).await;
        assert_eq!(reply.data.unwrap()["captured"], true);

        let reply = bridge.handle_line(r#"{"cmd":"pending"}"#).await;
        let data = reply.data.unwrap();
        assert_eq!(data["type"], "create_shortcut");
        assert_eq!(data["name"], "Solitaire");
        assert_eq!(data["iconUri"], "");

        let reply = bridge.handle_line(r#"{"cmd":"pending"}"#).await;
        assert_eq!(reply.data, Some(Value::Null));
    }

    #[tokio::test]
    async fn subscribe_pushes_events_to_output() {
        let (mut bridge, mut out) = bridge();

        bridge
            .handle_line(r#"{"cmd":"intent","intent":{"action":"android.intent.action.VIEW","data":"gameplaza://x?name=Go"}}"#)
            .await;
        bridge.handle_line(r#"{"cmd":"subscribe"}"#).await;

        let line = out.recv().await.unwrap();
        let pushed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(pushed["event"], "shortcut");
        assert_eq!(pushed["data"]["type"], "launch_shortcut");
        assert_eq!(pushed["data"]["name"], "Go");

        bridge.handle_line(r#"{"cmd":"unsubscribe"}"#).await;
        assert!(!bridge.relay.has_consumer());
    }

    #[tokio::test]
    async fn unsubscribe_flushes_events_already_handed_off() {
        let (mut bridge, mut out) = bridge();

        bridge.handle_line(r#"{"cmd":"subscribe"}"#).await;
        bridge
            .handle_line(r#"{"cmd":"intent","intent":{"action":"android.intent.action.VIEW","data":"gameplaza://x?name=Go"}}"#)
            .await;
        bridge.handle_line(r#"{"cmd":"unsubscribe"}"#).await;

        let line = out.try_recv().expect("이벤트가 출력되어야 함");
        let pushed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(pushed["data"]["name"], "Go");
        assert!(bridge.relay.pull_once().is_none());

        // 해제 후 이벤트는 다시 보관된다
        bridge
            .handle_line(r#"{"cmd":"intent","intent":{"action":"android.intent.action.VIEW","data":"gameplaza://x?name=Chess"}}"#)
            .await;
        assert!(out.try_recv().is_err());
        assert_eq!(bridge.relay.pull_once().unwrap().name, "Chess");
    }

    #[tokio::test]
    async fn resubscribe_keeps_events_in_order() {
        let (mut bridge, mut out) = bridge();

        bridge.handle_line(r#"{"cmd":"subscribe"}"#).await;
        bridge
            .handle_line(r#"{"cmd":"intent","intent":{"action":"android.intent.action.VIEW","data":"gameplaza://x?name=First"}}"#)
            .await;
        bridge.handle_line(r#"{"cmd":"subscribe"}"#).await;
        bridge
            .handle_line(r#"{"cmd":"intent","intent":{"action":"android.intent.action.VIEW","data":"gameplaza://x?name=Second"}}"#)
            .await;

        let first: Value = serde_json::from_str(&out.recv().await.unwrap()).unwrap();
        let second: Value = serde_json::from_str(&out.recv().await.unwrap()).unwrap();
        assert_eq!(first["data"]["name"], "First");
        assert_eq!(second["data"]["name"], "Second");
    }

    #[tokio::test]
    async fn directory_commands_on_unsupported_platform() {
        let (mut bridge, _out) = bridge();

        let reply = bridge
            .handle_line(r#"{"cmd":"start_shortcut","package":"org.chess","id":"a"}"#)
            .await;
        assert_eq!(reply.data, Some(Value::Bool(false)));

        let reply = bridge
            .handle_line(r#"{"cmd":"unpin_shortcut","package":"org.chess","id":"a"}"#)
            .await;
        assert_eq!(reply.data, Some(Value::Bool(false)));

        let reply = bridge
            .handle_line(r#"{"cmd":"query_shortcuts","package":"org.chess"}"#)
            .await;
        assert_eq!(reply.data, Some(serde_json::json!([])));
    }

    #[tokio::test]
    async fn run_processes_lines_until_eof() {
        let (bridge, out_rx) = bridge();
        let input = b"{\"cmd\":\"state\"}\n\n{\"cmd\":\"pending\"}\n".as_slice();
        let (client, mut server) = tokio::io::duplex(4096);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        bridge
            .run(tokio::io::BufReader::new(input), client, out_rx, shutdown_rx)
            .await
            .unwrap();

        let mut written = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut server, &mut written)
            .await
            .unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.contains("\"ok\":true")));
    }
}
