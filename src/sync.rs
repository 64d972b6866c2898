//! # 글 동기화 컨트롤러
//!
//! 저장 버튼 한 번이 백엔드와 주고받는 왕복 전체를 담당합니다.
//!
//! ## 저장 흐름
//! ```text
//! Idle → Validating (에디터 직렬화, 토큰 검증)
//!      → Submitting (POST create-article / PUT update-article/{id})
//!      → Success | Failed → Idle
//! ```
//!
//! - 토큰이 없으면 아무 요청도 보내지 않고 끝납니다 (`SaveOutcome::Skipped`).
//! - 이미 저장 중이면 두 번째 요청은 바로 거절됩니다 (`SaveOutcome::Busy`).
//! - 실패는 재시도하지 않고 상태 줄에만 기록합니다.

use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::{
    api::ApiClient,
    editor::{EditorLifecycle, WidgetFactory},
    error::AppError,
    models::{ArticleDraft, Session, StructuredDocument},
    status::StatusLine,
};

/// 저장 컨트롤러의 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

/// `save()` 한 번의 결과
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// 세션에 토큰이 없어 아무것도 하지 않음
    Skipped,
    /// 다른 저장이 진행 중이라 거절됨
    Busy,
    /// 생성(`created == true`) 또는 수정 성공. `response`는 백엔드 응답 본문
    Saved { created: bool, response: Value },
    /// 실패. `message`는 상태 줄에 표시된 문구와 같습니다
    Failed { message: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

pub struct ArticleSync {
    api: ApiClient,
    session: Session,
    article_id: Option<String>,
    title: Option<String>,
    published: bool,
    status: StatusLine,
    state: Mutex<SyncState>,
    last_result: Mutex<Option<SyncState>>,
}

/// 진행 중 표시. drop되면(완료든 취소든) 상태를 Idle로 되돌립니다.
struct InFlight<'a> {
    state: &'a Mutex<SyncState>,
}

impl InFlight<'_> {
    fn advance(&self, next: SyncState) {
        *lock(self.state) = next;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *lock(self.state) = SyncState::Idle;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ArticleSync {
    /// `article_id`가 있으면 수정(PUT), 없으면 생성(POST) 모드입니다.
    pub fn new(
        api: ApiClient,
        session: Session,
        article_id: Option<String>,
        status: StatusLine,
    ) -> Self {
        Self {
            api,
            session,
            article_id,
            title: None,
            published: false,
            status,
            state: Mutex::new(SyncState::Idle),
            last_result: Mutex::new(None),
        }
    }

    pub fn set_published(&mut self, published: bool) {
        self.published = published;
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub fn article_id(&self) -> Option<&str> {
        self.article_id.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SyncState {
        *lock(&self.state)
    }

    /// 마지막으로 끝난 저장의 결과 상태 (Success 또는 Failed)
    pub fn last_result(&self) -> Option<SyncState> {
        *lock(&self.last_result)
    }

    pub fn status(&self) -> Option<String> {
        self.status.get()
    }

    /// 에디터 내용을 직렬화해 백엔드에 저장합니다.
    pub async fn save<F: WidgetFactory>(&self, editor: &mut EditorLifecycle<F>) -> SaveOutcome {
        let Ok(token) = self.session.require_token() else {
            tracing::debug!("Save requested without a token, ignoring");
            return SaveOutcome::Skipped;
        };
        let Some(guard) = self.begin() else {
            return SaveOutcome::Busy;
        };

        let document = match editor.save().await {
            Ok(document) => document,
            Err(e) => return self.fail(AppError::from(e)),
        };
        self.submit_with(guard, token, document).await
    }

    /// 이미 직렬화된 문서를 저장합니다. 흐름은 `save()`와 같습니다.
    pub async fn submit(&self, document: StructuredDocument) -> SaveOutcome {
        let Ok(token) = self.session.require_token() else {
            tracing::debug!("Submit requested without a token, ignoring");
            return SaveOutcome::Skipped;
        };
        let Some(guard) = self.begin() else {
            return SaveOutcome::Busy;
        };
        self.submit_with(guard, token, document).await
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        let mut state = lock(&self.state);
        if *state != SyncState::Idle {
            tracing::warn!("Save rejected: another save is {:?}", *state);
            return None;
        }
        *state = SyncState::Validating;
        drop(state);

        self.status.clear();
        Some(InFlight { state: &self.state })
    }

    async fn submit_with(
        &self,
        guard: InFlight<'_>,
        token: &str,
        document: StructuredDocument,
    ) -> SaveOutcome {
        match self.api.verify_token(token).await {
            Ok(true) => {}
            Ok(false) => return self.fail(AppError::InvalidToken),
            Err(e) => return self.fail(e),
        }

        let draft = match ArticleDraft::build(
            self.session.owner_id.clone(),
            self.title.clone(),
            &document,
            self.published,
        ) {
            Ok(draft) => draft,
            Err(e) => return self.fail(e.into()),
        };

        guard.advance(SyncState::Submitting);
        let result = match self.article_id.as_deref() {
            Some(id) => self.api.update_article(token, id, &draft).await,
            None => self.api.create_article(token, &draft).await,
        };

        match result {
            Ok(response) => {
                let created = self.article_id.is_none();
                self.status.set(if created {
                    "Article created successfully"
                } else {
                    "Article updated successfully"
                });
                self.finish(SyncState::Success);
                SaveOutcome::Saved { created, response }
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&self, err: AppError) -> SaveOutcome {
        match &err {
            AppError::InvalidToken | AppError::Rejected { .. } => {
                tracing::warn!("Save failed: {}", err)
            }
            _ => tracing::error!("Save failed: {}", err),
        }
        let message = err.status_message();
        self.status.set(message.clone());
        self.finish(SyncState::Failed);
        SaveOutcome::Failed { message }
    }

    fn finish(&self, terminal: SyncState) {
        *lock(&self.state) = terminal;
        *lock(&self.last_result) = Some(terminal);
    }
}
