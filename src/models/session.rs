//! # 인증 세션 모델 정의
//!
//! 페이지가 마운트될 때 저장소에서 한 번 읽어오는 인증 정보입니다.
//! 이 구조체는 저장소에 아무것도 쓰지 않습니다 (읽기 전용).
//!
//! ## 세션 흐름
//! ```text
//! [마운트] 저장소의 access_token 읽기 → 토큰 payload에서 owner_id 추출 → Session
//! ```

use crate::auth::token::owner_id_from_token;
use crate::error::TokenError;
use crate::storage::{KeyValueStore, ACCESS_TOKEN_KEY, USER_ID_KEY};

/// 인증 세션
///
/// `token`이 None이면 인증이 필요한 어떤 작업도 진행할 수 없습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// 작성자 ID — 토큰의 `sub`/`user_id`/`id`, 없으면 저장소의 `user_id`
    pub owner_id: Option<String>,
    /// Bearer 토큰 원문
    pub token: Option<String>,
}

impl Session {
    /// 토큰과 작성자 ID를 직접 지정해 세션을 만듭니다.
    pub fn new(owner_id: Option<String>, token: Option<String>) -> Self {
        Self { owner_id, token }
    }

    /// 저장소에서 세션을 해석합니다.
    ///
    /// - 토큰이 없으면 빈 세션 (에러 아님)
    /// - 토큰 형식이 깨져 있으면 `TokenError::Malformed`를 그대로 전파
    /// - 토큰에 식별자가 없으면 저장소의 `user_id`로 대체
    ///
    /// 서명과 만료는 검사하지 않습니다. 그것은 백엔드의 책임입니다.
    pub fn resolve<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self, TokenError> {
        let Some(token) = store.get(ACCESS_TOKEN_KEY).filter(|t| !t.trim().is_empty()) else {
            tracing::debug!("No access token in storage");
            return Ok(Self::default());
        };

        let owner_id = match owner_id_from_token(&token)? {
            Some(id) => Some(id),
            None => store.get(USER_ID_KEY).filter(|id| !id.is_empty()),
        };

        tracing::debug!("Resolved session for owner {:?}", owner_id);
        Ok(Self {
            owner_id,
            token: Some(token),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// 토큰을 꺼냅니다. 없으면 `TokenError::Missing`.
    pub fn require_token(&self) -> Result<&str, TokenError> {
        self.token.as_deref().ok_or(TokenError::Missing)
    }
}
