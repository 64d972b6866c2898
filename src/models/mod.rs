//! # 데이터 모델 모듈
//!
//! 클라이언트에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `article`: 글 초안(Draft)과 백엔드 응답 구조체
//! - `document`: 에디터 출력 형식 (StructuredDocument, Block)
//! - `session`: 인증 세션 (owner_id + token)
//! - `user`: 로그인/토큰 검증 요청·응답 구조체
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Session`처럼 짧게 접근합니다.

pub mod article;
pub mod document;
pub mod session;
pub mod user;

pub use article::*;
pub use document::*;
pub use session::*;
pub use user::*;
