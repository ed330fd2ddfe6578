//! # gameplaza-app
//!
//! GamePlaza 브리지 바이너리 진입점.
//! DI 컨테이너 역할, 호스트 브리지 실행, 라이프사이클 관리.

mod host;
mod lifecycle;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use gameplaza_core::config::AppConfig;
use gameplaza_core::config_manager::ConfigManager;
use gameplaza_core::models::presence::{PresenceConfig, StartRequest};
use gameplaza_core::ports::presence_store::PresenceStore;
use gameplaza_network::HttpHeartbeatClient;
use gameplaza_presence::{PresenceSessionManager, RestoreOutcome};
use gameplaza_shortcut::{ShortcutDirectory, ShortcutRelay, UnsupportedShortcutRegistry};
use gameplaza_storage::SqlitePresenceStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::host::{HostBridge, HostServices};
use crate::lifecycle::LifecycleManager;

/// 데이터베이스 파일 이름
const DB_FILE_NAME: &str = "gameplaza.db";

/// 종료 시 블로킹 작업(표준 입력 읽기) 대기 한도
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// GamePlaza 호스트 브리지
///
/// 런처 바로가기 캡처와 프레즌스 하트비트
#[derive(Parser, Debug)]
#[command(name = "gameplaza")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error). 생략 시 설정 파일 값
    #[arg(long, short = 'l')]
    log_level: Option<String>,

    /// 데이터 저장 경로 (기본: 플랫폼별 데이터 디렉토리)
    #[arg(long)]
    data_dir: Option<String>,

    /// 설정 파일 경로 (기본: 플랫폼별 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 표준 입출력 호스트 브리지 실행 (기본)
    Run,
    /// 세션 설정 저장 (다음 실행 시 복원)
    Start {
        #[arg(long)]
        base_url: String,
        #[arg(long)]
        token: String,
        #[arg(long)]
        game: Option<String>,
        /// 하트비트 간격 (초)
        #[arg(long)]
        interval: Option<i64>,
    },
    /// 저장된 세션 삭제
    Stop,
    /// 저장된 세션 확인
    Status,
}

/// 데이터베이스 경로 결정 (CLI 인자 → 설정 파일 → 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/org.plazanet.gameplaza/gameplaza.db`
/// - Windows: `%APPDATA%\plazanet\gameplaza\data\gameplaza.db`
/// - Linux: `~/.local/share/gameplaza/gameplaza.db`
fn resolve_db_path(data_dir: Option<&str>, config: &AppConfig) -> PathBuf {
    data_dir
        .map(PathBuf::from)
        .or_else(|| config.storage.data_dir.clone())
        .map(|d| d.join(DB_FILE_NAME))
        .or_else(|| {
            ProjectDirs::from("org", "plazanet", "gameplaza")
                .map(|p| p.data_dir().join(DB_FILE_NAME))
        })
        .unwrap_or_else(|| PathBuf::from(".").join(DB_FILE_NAME))
}

/// 설정 로드 (실패 시 기본 설정, 경로 없음)
fn load_config(path: Option<&Path>, data_dir: Option<&str>) -> (AppConfig, Option<PathBuf>) {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path.to_path_buf()),
        None => ConfigManager::new().or_else(|e| {
            eprintln!("설정 관리자 초기화 실패, 데이터 디렉토리 사용: {e}");
            let fallback = data_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("config.json");
            ConfigManager::with_path(fallback)
        }),
    };

    match manager {
        Ok(manager) => (manager.get(), Some(manager.config_path().to_path_buf())),
        Err(e) => {
            eprintln!("설정 로드 실패, 기본 설정 사용: {e}");
            (AppConfig::default_config(), None)
        }
    }
}

/// tracing 초기화 (stdout은 호스트 프로토콜 전용이므로 stderr로 출력)
fn init_tracing(level: &str) {
    let log_filter = format!(
        "gameplaza={level},gameplaza_app={level},gameplaza_core={level},gameplaza_shortcut={level},gameplaza_network={level},gameplaza_storage={level},gameplaza_presence={level}"
    );
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();
}

/// 토큰 마스킹 (앞 4자만 노출)
fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{visible}***")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_path) = load_config(args.config.as_deref(), args.data_dir.as_deref());
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level);
    match config_path {
        Some(path) => info!("설정 파일: {}", path.display()),
        None => info!("기본 설정 사용"),
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(async_main(args, config));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn async_main(args: Args, config: AppConfig) -> Result<()> {
    let db_path = resolve_db_path(args.data_dir.as_deref(), &config);
    let store = Arc::new(SqlitePresenceStore::open(&db_path)?);
    info!("SQLite 저장소: {}", db_path.display());

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run_bridge(&config, store).await,
        Command::Start {
            base_url,
            token,
            game,
            interval,
        } => {
            let request = StartRequest {
                base_url: Some(base_url),
                token: Some(token),
                game,
                interval_seconds: interval,
            };
            let session = request
                .into_config(config.presence.default_interval_secs)
                .map_err(|e| anyhow!("시작 파라미터 오류: {e}"))?;
            store.save(&session).await?;
            println!("세션 저장됨: {}", describe(&session));
            Ok(())
        }
        Command::Stop => {
            store.clear().await?;
            println!("세션 삭제됨");
            Ok(())
        }
        Command::Status => {
            match store.load().await? {
                Some(session) => println!("저장된 세션: {}", describe(&session)),
                None => println!("저장된 세션 없음"),
            }
            Ok(())
        }
    }
}

fn describe(session: &PresenceConfig) -> String {
    format!(
        "{} (token={}, game={}, interval={}s)",
        session.base_url,
        mask_token(&session.token),
        session.game_name().unwrap_or("-"),
        session.interval_secs
    )
}

/// 호스트 브리지 실행
///
/// 저장된 세션을 복원한 뒤 표준 입력이 닫히거나 종료 시그널이 올 때까지 명령을 처리한다.
async fn run_bridge(config: &AppConfig, store: Arc<SqlitePresenceStore>) -> Result<()> {
    info!("GamePlaza 브리지 시작");

    let sender = Arc::new(HttpHeartbeatClient::new(config.request_timeout())?);
    let session = Arc::new(PresenceSessionManager::new(store, sender));

    match session.restore().await {
        RestoreOutcome::Resumed => info!("이전 세션 재개"),
        RestoreOutcome::NothingToResume => info!("대기 상태로 시작"),
    }

    let (bridge, out_rx) = HostBridge::new(HostServices {
        session: session.clone(),
        relay: Arc::new(ShortcutRelay::new()),
        directory: ShortcutDirectory::new(Arc::new(UnsupportedShortcutRegistry)),
        default_interval_secs: config.presence.default_interval_secs,
    });

    let lifecycle = Arc::new(LifecycleManager::new());
    let signal_lifecycle = lifecycle.clone();
    tokio::spawn(async move {
        signal_lifecycle.wait_for_signal().await;
    });

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let result = bridge
        .run(input, tokio::io::stdout(), out_rx, lifecycle.subscribe())
        .await;
    if let Err(e) = &result {
        error!("호스트 브리지 에러: {e}");
    }

    session.shutdown().await;
    info!("GamePlaza 브리지 종료");
    result.map_err(Into::into)
}
