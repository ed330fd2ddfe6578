//! # gameplaza-storage
//!
//! 로컬 저장소 어댑터.
//! SQLite에 프레즌스 세션 설정을 키/값 레코드로 보관해 프로세스 재시작 후 세션을 복원한다.

pub mod migration;
pub mod presence_store;

pub use presence_store::SqlitePresenceStore;
