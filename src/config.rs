//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 클라이언트 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `API_BASE_URL`: 백엔드 REST API 주소 (필수)
//! - `STORAGE_PATH`: 토큰 등을 보관하는 키-값 저장소 파일 경로
//! - `EDITOR_HOLDER`: 에디터 위젯이 붙을 마운트 지점(JSON 파일) 경로
//! - `VERIFY_MODE`: 토큰 검증 방식 (`users_me` 또는 `auth_verify`)
//! - `HTTP_TIMEOUT_SECS`: HTTP 요청 타임아웃 (없으면 무제한)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// 토큰 검증 엔드포인트를 호출하는 방식
///
/// 백엔드 배포마다 둘 중 하나만 제공되므로 설정으로 고릅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyMode {
    /// `GET /users/me` + `Authorization: Bearer <token>`
    #[default]
    UsersMe,
    /// `POST /auth/verify` + 본문 `{"token": "<token>"}`
    AuthVerify,
}

impl FromStr for VerifyMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "users_me" | "users/me" | "me" => Ok(VerifyMode::UsersMe),
            "auth_verify" | "auth/verify" | "verify" => Ok(VerifyMode::AuthVerify),
            other => Err(AppError::Config(format!("unknown VERIFY_MODE: {}", other))),
        }
    }
}

/// 클라이언트 전체 설정을 담는 구조체
///
/// 프로그램 시작 시 환경변수에서 한 번 읽어온 후 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// 백엔드 API 주소 (예: "http://localhost:8000"). 끝의 `/`는 제거됩니다.
    pub api_base_url: String,
    /// 키-값 저장소 파일 경로
    pub storage_path: String,
    /// 에디터 마운트 지점 경로
    pub editor_holder: String,
    pub verify_mode: VerifyMode,
    /// None이면 타임아웃 없음
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `API_BASE_URL`은 필수이며, 없으면 에러가 발생합니다.
    /// `VERIFY_MODE`에 알 수 없는 값이 들어 있어도 에러입니다.
    pub fn from_env() -> Result<Self, AppError> {
        let api_base_url = env::var("API_BASE_URL")
            .map_err(|_| AppError::Config("API_BASE_URL is required".to_string()))?;

        let verify_mode = match env::var("VERIFY_MODE") {
            Ok(value) => value.parse()?,
            Err(_) => VerifyMode::default(),
        };

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            storage_path: env::var("STORAGE_PATH")
                .unwrap_or_else(|_| "data/storage.json".to_string()),
            editor_holder: env::var("EDITOR_HOLDER")
                .unwrap_or_else(|_| "data/editor.json".to_string()),
            verify_mode,
            // 숫자가 아니거나 0이면 타임아웃을 두지 않습니다.
            http_timeout: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        })
    }

    /// 테스트나 라이브러리 사용자가 환경변수 없이 설정을 만들 때 사용합니다.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url: String = api_base_url.into();
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            storage_path: "data/storage.json".to_string(),
            editor_holder: "data/editor.json".to_string(),
            verify_mode: VerifyMode::default(),
            http_timeout: None,
        }
    }
}
