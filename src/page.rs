//! # 글 에디터 페이지
//!
//! 페이지 한 번의 마운트를 표현합니다.
//!
//! ```text
//! mount:   저장소 → Session → (쿠키 설정) → [기존 글 조회] → 에디터 생성
//! save:    에디터 직렬화 → 토큰 검증 → 생성/수정 → 상태 줄
//! unmount: 에디터 해제
//! ```

use crate::{
    api::ApiClient,
    editor::{EditorLifecycle, WidgetFactory},
    error::AppError,
    models::{Session, StructuredDocument},
    status::StatusLine,
    storage::KeyValueStore,
    sync::{ArticleSync, SaveOutcome},
};

/// 마운트 옵션
#[derive(Debug, Clone, Default)]
pub struct PageOptions {
    /// 수정할 글의 ID. 있으면 마운트 시 내용을 조회하고, 저장은 PUT이 됩니다.
    pub article_id: Option<String>,
    pub title: Option<String>,
    pub published: bool,
    /// 새 글을 이 내용으로 시작합니다. `article_id`가 있으면 무시됩니다.
    pub seed: Option<StructuredDocument>,
}

pub struct EditorPage<F: WidgetFactory> {
    editor: EditorLifecycle<F>,
    sync: ArticleSync,
    status: StatusLine,
}

impl<F: WidgetFactory> EditorPage<F> {
    /// 페이지를 마운트합니다.
    ///
    /// 저장소의 토큰이 깨져 있으면 상태 줄에 알리고 비로그인 상태로 계속합니다.
    /// 기존 글 조회 실패도 상태 줄에만 남고 마운트 자체는 성공합니다.
    pub async fn mount<S: KeyValueStore + ?Sized>(
        api: ApiClient,
        store: &S,
        factory: F,
        holder: impl Into<String>,
        options: PageOptions,
    ) -> Result<Self, AppError> {
        let status = StatusLine::new();

        let session = match Session::resolve(store) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Stored token is unusable: {}", e);
                status.set(e.to_string());
                Session::default()
            }
        };
        if let Some(token) = session.token.as_deref() {
            api.set_token_cookie(token);
        }

        let mut editor = EditorLifecycle::new(factory, holder, status.clone());
        match options.article_id.as_deref() {
            Some(id) => {
                // 실패 메시지는 이미 상태 줄에 있습니다.
                let _ = editor.load_and_initialize(&api, id).await;
            }
            None => {
                editor.initialize(options.seed)?;
            }
        }

        let mut sync = ArticleSync::new(api, session, options.article_id, status.clone());
        sync.set_title(options.title);
        sync.set_published(options.published);

        Ok(Self {
            editor,
            sync,
            status,
        })
    }

    pub async fn save(&mut self) -> SaveOutcome {
        self.sync.save(&mut self.editor).await
    }

    pub fn status(&self) -> Option<String> {
        self.status.get()
    }

    pub fn session(&self) -> &Session {
        self.sync.session()
    }

    pub fn editor(&self) -> &EditorLifecycle<F> {
        &self.editor
    }

    pub fn sync(&self) -> &ArticleSync {
        &self.sync
    }

    /// 에디터를 해제하고 페이지를 닫습니다.
    pub fn unmount(mut self) {
        self.editor.destroy();
        tracing::info!("Editor page unmounted");
    }
}
