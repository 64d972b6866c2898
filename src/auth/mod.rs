//! # 인증 모듈
//!
//! - `token`: 토큰 payload 해석 (owner_id 추출)
//! - `login()` / `logout()`: 로그인 폼과 로그아웃에 해당하는 저장소 조작

pub mod token;

use crate::{
    api::ApiClient,
    error::{AppError, StorageError},
    models::Session,
    storage::{KeyValueStore, ACCESS_TOKEN_KEY, USER_ID_KEY},
};

/// 로그인하고 받은 토큰을 저장소에 보관한 뒤 세션을 돌려줍니다.
///
/// 토큰을 저장하기 전에 형식을 먼저 확인하므로, 깨진 토큰은 저장되지 않습니다.
pub async fn login<S: KeyValueStore + ?Sized>(
    api: &ApiClient,
    store: &mut S,
    username: &str,
    password: &str,
) -> Result<Session, AppError> {
    let response = api.login(username, password).await?;
    let owner_id = token::owner_id_from_token(&response.access_token)?;

    store.set(ACCESS_TOKEN_KEY, &response.access_token)?;
    match owner_id.as_deref() {
        Some(id) => store.set(USER_ID_KEY, id)?,
        None => store.remove(USER_ID_KEY)?,
    }

    tracing::info!("Logged in as {} (owner {:?})", username, owner_id);
    Ok(Session::new(owner_id, Some(response.access_token)))
}

/// 저장된 인증 정보를 모두 지웁니다.
pub fn logout<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<(), StorageError> {
    store.remove(ACCESS_TOKEN_KEY)?;
    store.remove(USER_ID_KEY)?;
    tracing::info!("Logged out");
    Ok(())
}
