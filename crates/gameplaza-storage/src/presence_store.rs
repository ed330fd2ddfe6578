//! 프레즌스 세션 설정 저장소 (PresenceStore 포트 구현).
//!
//! `presence_state` 테이블에 키/값으로 보관한다.
//! 저장은 한 트랜잭션 안에서 기존 키를 모두 지우고 다시 쓴다.

use async_trait::async_trait;
use gameplaza_core::error::CoreError;
use gameplaza_core::models::presence::PresenceConfig;
use gameplaza_core::ports::presence_store::PresenceStore;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::migration;

const KEY_BASE_URL: &str = "base_url";
const KEY_TOKEN: &str = "token";
const KEY_GAME: &str = "game";
const KEY_INTERVAL: &str = "interval";

/// SQLite 세션 저장소 (`PresenceStore` 포트 구현)
pub struct SqlitePresenceStore {
    conn: Mutex<Connection>,
}

impl SqlitePresenceStore {
    /// 파일 기반 저장소 생성
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| CoreError::Storage(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            ",
        )
        .map_err(|e| CoreError::Storage(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        info!("세션 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Storage(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| CoreError::Storage(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Storage(format!("잠금 획득 실패: {e}")))
    }

    fn read_entries(&self) -> Result<HashMap<String, String>, CoreError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM presence_state")
            .map_err(|e| CoreError::Storage(format!("쿼리 준비 실패: {e}")))?;

        let entries = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| CoreError::Storage(format!("쿼리 실행 실패: {e}")))?
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(|e| CoreError::Storage(format!("행 읽기 실패: {e}")))?;

        Ok(entries)
    }
}

/// 키/값 항목에서 설정 복원
///
/// 항목이 없으면 `None`. 필수 키 누락이나 간격 파싱 실패는 `CorruptRecord` 에러.
fn config_from_entries(
    mut entries: HashMap<String, String>,
) -> Result<Option<PresenceConfig>, CoreError> {
    if entries.is_empty() {
        return Ok(None);
    }

    let mut take = |key: &str| {
        entries
            .remove(key)
            .ok_or_else(|| CoreError::CorruptRecord(format!("세션 레코드에 {key} 없음")))
    };

    let base_url = take(KEY_BASE_URL)?;
    let token = take(KEY_TOKEN)?;
    let interval = take(KEY_INTERVAL)?;
    let game = entries.remove(KEY_GAME);

    let interval_secs = interval
        .parse::<u64>()
        .map_err(|e| CoreError::CorruptRecord(format!("세션 간격 파싱 실패: {interval}: {e}")))?;

    Ok(Some(PresenceConfig {
        base_url,
        token,
        game,
        interval_secs,
    }))
}

#[async_trait]
impl PresenceStore for SqlitePresenceStore {
    async fn load(&self) -> Result<Option<PresenceConfig>, CoreError> {
        let config = config_from_entries(self.read_entries()?)?;
        debug!("세션 레코드 로드: {}", config.is_some());
        Ok(config)
    }

    async fn save(&self, config: &PresenceConfig) -> Result<(), CoreError> {
        let now = chrono::Utc::now().to_rfc3339();
        let interval = config.interval_secs.to_string();

        let mut entries = vec![
            (KEY_BASE_URL, config.base_url.as_str()),
            (KEY_TOKEN, config.token.as_str()),
            (KEY_INTERVAL, interval.as_str()),
        ];
        if let Some(game) = config.game.as_deref() {
            entries.push((KEY_GAME, game));
        }

        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| CoreError::Storage(format!("트랜잭션 시작 실패: {e}")))?;

        tx.execute("DELETE FROM presence_state", [])
            .map_err(|e| CoreError::Storage(format!("세션 레코드 삭제 실패: {e}")))?;

        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO presence_state (key, value, updated_at) VALUES (?1, ?2, ?3)",
                )
                .map_err(|e| CoreError::Storage(format!("쿼리 준비 실패: {e}")))?;

            for (key, value) in &entries {
                stmt.execute(rusqlite::params![key, value, now])
                    .map_err(|e| CoreError::Storage(format!("세션 레코드 저장 실패: {e}")))?;
            }
        }

        tx.commit()
            .map_err(|e| CoreError::Storage(format!("트랜잭션 커밋 실패: {e}")))?;

        debug!("세션 레코드 저장: {}개 키", entries.len());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CoreError> {
        let conn = self.lock()?;
        let removed = conn
            .execute("DELETE FROM presence_state", [])
            .map_err(|e| CoreError::Storage(format!("세션 레코드 삭제 실패: {e}")))?;

        debug!("세션 레코드 삭제: {removed}개 키");
        Ok(())
    }
}
