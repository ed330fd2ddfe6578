//! GamePlaza 도메인 모델.
//!
//! 호스트 경계를 넘나드는 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod intent;
pub mod presence;
pub mod shortcut;
