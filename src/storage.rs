//! # 클라이언트 측 키-값 저장소
//!
//! 브라우저의 localStorage에 해당하는 저장소입니다.
//! 로그인 시 받은 `access_token`과 (선택적으로) `user_id`를 보관합니다.
//!
//! - `MemoryStore`: 프로세스 메모리에만 보관 (테스트, 임베딩용)
//! - `FileStore`: JSON 파일 하나에 보관 (CLI용, 실행 간 유지)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// 액세스 토큰 키
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// 사용자 ID 키 (토큰에 식별자가 없을 때의 대체 값)
pub const USER_ID_KEY: &str = "user_id";

/// 문자열 키-값 저장소 인터페이스
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// 메모리 저장소
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 토큰이 이미 들어 있는 저장소를 만듭니다.
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.entries.insert(ACCESS_TOKEN_KEY.to_string(), token.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON 파일 저장소
///
/// 열 때 파일 전체를 읽고, 값이 바뀔 때마다 파일 전체를 다시 씁니다.
/// 파일이 없으면 빈 저장소로 시작합니다.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!("Opened storage at {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
