//! # inkwell
//!
//! 글(Article) 에디터 세션 클라이언트입니다.
//!
//! - `auth`: 토큰 해석, 로그인/로그아웃
//! - `storage`: 클라이언트 측 키-값 저장소
//! - `api`: 백엔드 REST API 클라이언트
//! - `editor`: 리치 텍스트 위젯 인터페이스와 생명주기
//! - `sync`: 저장(생성/수정) 왕복과 상태 머신
//! - `page`: 위 요소를 묶은 에디터 페이지 한 번의 마운트

pub mod api;
pub mod auth;
pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod page;
pub mod status;
pub mod storage;
pub mod sync;

pub use api::ApiClient;
pub use config::{Config, VerifyMode};
pub use error::{AppError, EditorError, StorageError, TokenError};
pub use page::{EditorPage, PageOptions};
pub use status::StatusLine;
pub use sync::{ArticleSync, SaveOutcome, SyncState};
