//! # gameplaza-shortcut
//!
//! 바로가기 이벤트 캡처와 전달.
//!
//! ## 구조
//!
//! - [`normalizer`]: 여섯 가지 원시 신호를 `ShortcutEvent`로 정규화 (순수 함수)
//! - [`relay`]: 단일 슬롯 릴레이 (pull / push)
//! - [`directory`]: OS 바로가기 레지스트리 클라이언트 (실패는 false/빈 목록)
//! - [`capture`]: 인텐트 판별 + 정규화 + 릴레이 전달

pub mod capture;
pub mod directory;
pub mod normalizer;
pub mod relay;

#[cfg(test)]
mod test_support;

pub use capture::{classify, ShortcutCapture};
pub use directory::{ShortcutDirectory, UnsupportedShortcutRegistry};
pub use normalizer::normalize;
pub use relay::ShortcutRelay;
