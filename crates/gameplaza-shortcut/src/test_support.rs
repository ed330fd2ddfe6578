//! 테스트용 인메모리 바로가기 레지스트리.

use std::sync::atomic::{AtomicBool, Ordering};

use gameplaza_core::error::CoreError;
use gameplaza_core::models::shortcut::{
    EmbeddedIntent, ShortcutInfo, ShortcutQuery, ShortcutQueryFlags,
};
use gameplaza_core::ports::shortcut_registry::ShortcutRegistry;
use parking_lot::Mutex;

#[derive(Default)]
pub(crate) struct FakeRegistry {
    shortcuts: Mutex<Vec<ShortcutInfo>>,
    started: Mutex<Vec<(String, String)>>,
    accepted: Mutex<Vec<String>>,
    fail_next: AtomicBool,
}

impl FakeRegistry {
    pub(crate) fn with_pinned(package: &str, ids: &[&str]) -> Self {
        let registry = Self::default();
        for id in ids {
            registry.add(package, id, true);
        }
        registry
    }

    pub(crate) fn add(&self, package: &str, id: &str, pinned: bool) {
        self.shortcuts.lock().push(ShortcutInfo {
            id: id.to_string(),
            package: Some(package.to_string()),
            short_label: Some(format!("label-{id}")),
            long_label: None,
            intent: Some(EmbeddedIntent {
                action: Some("android.intent.action.VIEW".to_string()),
                data: Some(format!("app://{id}")),
                ..Default::default()
            }),
            pinned,
        });
    }

    pub(crate) fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub(crate) fn started(&self) -> Vec<(String, String)> {
        self.started.lock().clone()
    }

    pub(crate) fn accepted(&self) -> Vec<String> {
        self.accepted.lock().clone()
    }

    pub(crate) fn pinned(&self, package: &str) -> Vec<String> {
        self.shortcuts
            .lock()
            .iter()
            .filter(|s| s.pinned && s.package.as_deref() == Some(package))
            .map(|s| s.id.clone())
            .collect()
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(CoreError::Platform("레지스트리 호출 실패".to_string()));
        }
        Ok(())
    }
}

impl ShortcutRegistry for FakeRegistry {
    fn is_supported(&self) -> bool {
        true
    }

    fn start_shortcut(&self, package: &str, id: &str) -> Result<(), CoreError> {
        self.check()?;
        self.started
            .lock()
            .push((package.to_string(), id.to_string()));
        Ok(())
    }

    fn get_shortcuts(&self, query: &ShortcutQuery) -> Result<Vec<ShortcutInfo>, CoreError> {
        self.check()?;
        let only_pinned = query.flags == ShortcutQueryFlags::PINNED;
        Ok(self
            .shortcuts
            .lock()
            .iter()
            .filter(|s| s.package.as_deref() == Some(query.package.as_str()))
            .filter(|s| !only_pinned || s.pinned)
            .filter(|s| query.ids.as_ref().map_or(true, |ids| ids.contains(&s.id)))
            .cloned()
            .collect())
    }

    fn pin_shortcuts(&self, package: &str, ids: &[String]) -> Result<(), CoreError> {
        self.check()?;
        for shortcut in self.shortcuts.lock().iter_mut() {
            if shortcut.package.as_deref() == Some(package) {
                shortcut.pinned = ids.contains(&shortcut.id);
            }
        }
        Ok(())
    }

    fn accept_pin_request(&self, shortcut: &ShortcutInfo) -> Result<bool, CoreError> {
        self.check()?;
        self.accepted.lock().push(shortcut.id.clone());
        Ok(true)
    }
}
