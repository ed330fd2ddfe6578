//! 바로가기 디렉토리 클라이언트.
//!
//! OS 바로가기 레지스트리 호출을 감싸고, 모든 실패를 로그로 남긴 뒤
//! `false`/빈 목록으로 바꾼다. 호출자는 에러 타입을 볼 일이 없다.

use std::sync::Arc;

use gameplaza_core::error::CoreError;
use gameplaza_core::models::shortcut::{
    ShortcutInfo, ShortcutQuery, ShortcutQueryFlags, ShortcutRecord,
};
use gameplaza_core::ports::shortcut_registry::ShortcutRegistry;
use tracing::{debug, warn};

/// 디렉토리 클라이언트
#[derive(Clone)]
pub struct ShortcutDirectory {
    registry: Arc<dyn ShortcutRegistry>,
}

impl ShortcutDirectory {
    pub fn new(registry: Arc<dyn ShortcutRegistry>) -> Self {
        Self { registry }
    }

    /// 바로가기 API 지원 여부
    pub fn is_supported(&self) -> bool {
        self.registry.is_supported()
    }

    /// 고정된 바로가기 실행 요청
    pub fn start_pinned(&self, package: &str, id: &str) -> bool {
        if !self.registry.is_supported() {
            debug!("바로가기 API 미지원, 실행 생략: {package}/{id}");
            return false;
        }

        match self.registry.start_shortcut(package, id) {
            Ok(()) => {
                debug!("바로가기 실행: {package}/{id}");
                true
            }
            Err(e) => {
                warn!("바로가기 실행 실패: {package}/{id}: {e}");
                false
            }
        }
    }

    /// 고정 해제
    ///
    /// 현재 고정 집합에서 `id`를 뺀 나머지를 전체 고정 집합으로 다시 설정한다.
    /// 고정되지 않은 ID는 집합이 그대로 유지되므로 성공으로 본다.
    pub fn unpin(&self, package: &str, id: &str) -> bool {
        if !self.registry.is_supported() {
            debug!("바로가기 API 미지원, 고정 해제 생략: {package}/{id}");
            return false;
        }

        match self.try_unpin(package, id) {
            Ok(remaining) => {
                debug!("바로가기 고정 해제: {package}/{id} (남은 고정 {remaining}개)");
                true
            }
            Err(e) => {
                warn!("바로가기 고정 해제 실패: {package}/{id}: {e}");
                false
            }
        }
    }

    fn try_unpin(&self, package: &str, id: &str) -> Result<usize, CoreError> {
        let remaining: Vec<String> = self
            .registry
            .get_shortcuts(&ShortcutQuery::pinned(package))?
            .into_iter()
            .map(|info| info.id)
            .filter(|pinned_id| pinned_id != id)
            .collect();

        self.registry.pin_shortcuts(package, &remaining)?;
        Ok(remaining.len())
    }

    /// 바로가기 조회 (읽기 전용)
    pub fn query(
        &self,
        package: &str,
        ids: Option<&[String]>,
        flags: ShortcutQueryFlags,
    ) -> Vec<ShortcutRecord> {
        let query = ShortcutQuery {
            package: package.to_string(),
            ids: ids.map(<[String]>::to_vec),
            flags,
        };

        self.fetch(&query)
            .iter()
            .map(ShortcutRecord::from)
            .collect()
    }

    /// 단일 바로가기 전체 정보 조회
    pub fn resolve(&self, package: &str, id: &str) -> Option<ShortcutInfo> {
        let query = ShortcutQuery {
            package: package.to_string(),
            ids: Some(vec![id.to_string()]),
            flags: ShortcutQueryFlags::ALL,
        };

        self.fetch(&query).into_iter().find(|info| info.id == id)
    }

    /// 핀 고정 요청 수락
    ///
    /// 런처가 요청을 받아들였으면 true. 실패는 로그만 남긴다.
    pub fn accept_pin_request(&self, shortcut: &ShortcutInfo) -> bool {
        if !self.registry.is_supported() {
            debug!("바로가기 API 미지원, 핀 수락 생략: {}", shortcut.id);
            return false;
        }

        match self.registry.accept_pin_request(shortcut) {
            Ok(accepted) => {
                debug!("핀 고정 요청 수락: {} (결과 {accepted})", shortcut.id);
                accepted
            }
            Err(e) => {
                warn!("핀 고정 요청 수락 실패: {}: {e}", shortcut.id);
                false
            }
        }
    }

    fn fetch(&self, query: &ShortcutQuery) -> Vec<ShortcutInfo> {
        if !self.registry.is_supported() {
            return Vec::new();
        }

        match self.registry.get_shortcuts(query) {
            Ok(shortcuts) => shortcuts,
            Err(e) => {
                warn!("바로가기 조회 실패: {}: {e}", query.package);
                Vec::new()
            }
        }
    }
}

/// 바로가기 API가 없는 플랫폼용 레지스트리
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedShortcutRegistry;

impl UnsupportedShortcutRegistry {
    fn unsupported<T>(operation: &str) -> Result<T, CoreError> {
        Err(CoreError::UnsupportedPlatform(format!(
            "바로가기 {operation} 미지원 플랫폼"
        )))
    }
}

impl ShortcutRegistry for UnsupportedShortcutRegistry {
    fn is_supported(&self) -> bool {
        false
    }

    fn start_shortcut(&self, _package: &str, _id: &str) -> Result<(), CoreError> {
        Self::unsupported("실행")
    }

    fn get_shortcuts(&self, _query: &ShortcutQuery) -> Result<Vec<ShortcutInfo>, CoreError> {
        Self::unsupported("조회")
    }

    fn pin_shortcuts(&self, _package: &str, _ids: &[String]) -> Result<(), CoreError> {
        Self::unsupported("고정")
    }

    fn accept_pin_request(&self, _shortcut: &ShortcutInfo) -> Result<bool, CoreError> {
        Self::unsupported("핀 수락")
    }
}
