//! 하트비트 HTTP 클라이언트.
//!
//! `HeartbeatSender` 포트 구현. 재시도 없음: 다음 틱이 재시도 역할을 한다.

use async_trait::async_trait;
use gameplaza_core::error::CoreError;
use gameplaza_core::models::presence::{HeartbeatPayload, PresenceConfig};
use gameplaza_core::ports::heartbeat::HeartbeatSender;
use std::time::Duration;
use tracing::{debug, warn};

/// 하트비트 엔드포인트 경로
pub const HEARTBEAT_PATH: &str = "/api/presence/heartbeat";

/// 하트비트 클라이언트 (`HeartbeatSender` 포트 구현)
///
/// 기본 URL과 토큰은 틱마다 세션 설정에서 읽는다.
pub struct HttpHeartbeatClient {
    client: reqwest::Client,
}

impl HttpHeartbeatClient {
    /// 새 하트비트 클라이언트 생성
    pub fn new(timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self { client })
    }

    /// 하트비트 1회 전송 후 결과 반환
    ///
    /// 정확히 200만 성공. 그 외 상태 코드는 `HeartbeatRejected`.
    pub async fn post_heartbeat(&self, config: &PresenceConfig) -> Result<(), CoreError> {
        let url = heartbeat_url(&config.base_url);
        let payload = HeartbeatPayload::from_config(config);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&config.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("하트비트 요청 실패: {e}")))?;

        let status = resp.status().as_u16();
        if status == 200 {
            debug!("하트비트 전송 완료: {} ({})", url, payload.status);
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });
        Err(CoreError::HeartbeatRejected { status, body })
    }
}

fn heartbeat_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), HEARTBEAT_PATH)
}

#[async_trait]
impl HeartbeatSender for HttpHeartbeatClient {
    async fn send(&self, config: &PresenceConfig) {
        if let Err(e) = self.post_heartbeat(config).await {
            warn!("하트비트 실패 (다음 틱에 재시도): {e}");
        }
    }
}
