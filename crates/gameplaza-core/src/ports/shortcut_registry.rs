//! OS 바로가기 레지스트리 포트.
//!
//! 런처의 바로가기 서비스(LauncherApps)에 대한 원시 연산. 에러를 그대로 반환하며,
//! 실패를 불리언/빈 목록으로 바꾸는 정책은 `gameplaza-shortcut`의 디렉토리 클라이언트가 맡는다.

use crate::error::CoreError;
use crate::models::shortcut::{ShortcutInfo, ShortcutQuery};

/// OS 바로가기 레지스트리
///
/// 플랫폼 호출은 동기 바인더 호출이므로 동기 trait으로 둔다.
pub trait ShortcutRegistry: Send + Sync {
    /// 바로가기 API 지원 여부 (Android 7.1+)
    fn is_supported(&self) -> bool;

    /// 고정된 바로가기 실행
    fn start_shortcut(&self, package: &str, id: &str) -> Result<(), CoreError>;

    /// 조건에 맞는 바로가기 조회
    fn get_shortcuts(&self, query: &ShortcutQuery) -> Result<Vec<ShortcutInfo>, CoreError>;

    /// 패키지의 고정 집합을 `ids`로 교체
    fn pin_shortcuts(&self, package: &str, ids: &[String]) -> Result<(), CoreError>;

    /// 핀 고정 요청 수락 (런처가 고정했으면 true)
    fn accept_pin_request(&self, shortcut: &ShortcutInfo) -> Result<bool, CoreError>;
}
