//! # 에러 처리 모듈
//!
//! 클라이언트에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `TokenError`: 토큰 해석 실패
//! - `EditorError`: 리치 텍스트 에디터 위젯 실패
//! - `StorageError`: 키-값 저장소 실패
//! - `AppError`: 위 에러들과 HTTP/IO 에러를 하나로 통합한 열거형
//! - `AppError::status_message()`: 에러를 사용자에게 보여줄 상태 문구로 변환

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// 토큰 해석 에러
///
/// 서명이나 만료는 검사하지 않으므로, 형식 오류와 토큰 부재만 존재합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// 저장소에 토큰이 없음
    #[error("No access token available")]
    Missing,

    /// 세그먼트 수, base64url 문자 집합, JSON 객체 여부 중 하나라도 어긋남
    #[error("Error parsing JWT payload")]
    Malformed,
}

/// 에디터 위젯 에러
#[derive(Debug, Error)]
pub enum EditorError {
    /// 살아있는 에디터 인스턴스가 없음
    #[error("Editor is not initialized")]
    NotInitialized,

    /// 위젯 자체의 save() 실패
    #[error("Editor save failed: {0}")]
    Save(String),

    #[error("Editor IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Editor output is not a valid document: {0}")]
    Document(#[from] serde_json::Error),
}

/// 키-값 저장소 에러
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// 클라이언트에서 발생할 수 있는 모든 에러 종류
#[derive(Debug, Error)]
pub enum AppError {
    /// 네트워크/전송 실패 (연결 거부, 타임아웃, 본문 디코딩 실패 등)
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// 백엔드가 2xx 이외의 상태 코드로 요청을 거절함
    /// message에는 응답 본문에서 해석한 사람이 읽을 수 있는 문구가 들어갑니다.
    #[error("{message} (HTTP {status})")]
    Rejected { status: StatusCode, message: String },

    /// 토큰 검증 엔드포인트가 토큰을 거절함
    #[error("token not valid, please login again")]
    InvalidToken,

    /// 백엔드 응답이 약속된 형태가 아님
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// 저장 작업 실패 시 상태 줄에 표시할 문구를 만듭니다.
    ///
    /// 토큰 거절은 재로그인을 안내하는 고정 문구를 쓰고,
    /// 나머지는 `Saving failed: ...` 형식으로 원인을 그대로 붙입니다.
    pub fn status_message(&self) -> String {
        match self {
            AppError::InvalidToken => self.to_string(),
            AppError::Rejected { status, message } => {
                format!("Saving failed ({}): {}", status.as_u16(), message)
            }
            other => format!("Saving failed: {}", other),
        }
    }
}

/// 백엔드 에러 본문에서 사람이 읽을 수 있는 메시지를 뽑아냅니다.
///
/// 지원하는 형태:
/// - `{"detail": "..."}` 또는 `{"detail": [{"msg": "..."}, ...]}`
/// - `{"error": "..."}` 또는 `{"error": {"message": "..."}}`
/// - 그 외 JSON, 또는 JSON이 아닌 본문은 원문 그대로
pub fn describe_error_body(body: &str) -> String {
    let trimmed = body.trim();
    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return trimmed.to_string();
    };

    let mut parts = Vec::new();
    if let Some(detail) = value.get("detail") {
        parts.push(describe_value(detail));
    }
    if let Some(error) = value.get("error") {
        parts.push(describe_value(error));
    }

    if parts.is_empty() {
        trimmed.to_string()
    } else {
        parts.join("; ")
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(describe_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => ["msg", "message"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_used_verbatim() {
        assert_eq!(
            describe_error_body(r#"{"detail": "owner_id required"}"#),
            "owner_id required"
        );
    }

    #[test]
    fn detail_validation_list_is_joined() {
        let body = r#"{"detail": [{"loc": ["body", "owner_id"], "msg": "field required"}, {"msg": "bad date"}]}"#;
        assert_eq!(describe_error_body(body), "field required, bad date");
    }

    #[test]
    fn nested_error_object_uses_message() {
        let body = r#"{"error": {"code": "bad_request", "message": "Title too long"}}"#;
        assert_eq!(describe_error_body(body), "Title too long");
    }

    #[test]
    fn detail_and_error_are_combined() {
        let body = r#"{"detail": "rejected", "error": "quota"}"#;
        assert_eq!(describe_error_body(body), "rejected; quota");
    }

    #[test]
    fn non_json_body_is_returned_raw() {
        assert_eq!(describe_error_body("  Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn json_without_known_fields_is_returned_raw() {
        assert_eq!(describe_error_body(r#"{"oops":1}"#), r#"{"oops":1}"#);
    }

    #[test]
    fn rejected_status_message_includes_backend_text() {
        let err = AppError::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "owner_id required".to_string(),
        };
        assert_eq!(err.status_message(), "Saving failed (422): owner_id required");
    }

    #[test]
    fn invalid_token_status_message_asks_for_login() {
        assert_eq!(
            AppError::InvalidToken.status_message(),
            "token not valid, please login again"
        );
    }
}
