//! GamePlaza 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 외부 에러(reqwest, rusqlite 등)를 `CoreError`로 매핑한다.
//! 제어 경계에서 호출자에게 전달되는 것은 `InvalidArgument`뿐이며,
//! 나머지는 발생 지점 가까이에서 로그로 흡수된다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 인자 (필수 시작 파라미터 누락 등)
    #[error("잘못된 인자 ({field}): {message}")]
    InvalidArgument {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// OS 버전/플랫폼이 필요한 기능을 지원하지 않음
    #[error("미지원 플랫폼: {0}")]
    UnsupportedPlatform(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 하트비트 서버가 200 이외의 상태 코드로 응답
    #[error("하트비트 거부 ({status}): {body}")]
    HeartbeatRejected {
        /// HTTP 상태 코드
        status: u16,
        /// 응답 본문 (읽기 실패 시 빈 문자열)
        body: String,
    },

    /// 영속 저장소 에러 (잠금, I/O 등 일시적일 수 있음)
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 저장된 레코드를 읽었으나 구조가 손상됨 (복구 불가)
    #[error("손상된 레코드: {0}")]
    CorruptRecord(String),

    /// OS 연동 중 발생한 예상치 못한 에러
    #[error("플랫폼 에러: {0}")]
    Platform(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// `InvalidArgument` 생성 헬퍼
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 저장된 레코드 자체가 손상되어 폐기해야 하는 에러인지
    pub fn is_corrupt_record(&self) -> bool {
        matches!(self, Self::CorruptRecord(_))
    }

    /// 제어 경계에서 호출자에게 그대로 전달해야 하는 에러인지
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}
