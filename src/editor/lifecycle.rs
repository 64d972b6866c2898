//! # 에디터 생명주기 관리자
//!
//! 페이지가 마운트될 때마다 위젯 인스턴스를 **정확히 하나** 만들고,
//! 언마운트될 때 해제합니다. 인스턴스는 이 구조체가 소유하므로
//! 전역 상태 없이 페이지 수명과 함께 사라집니다.
//!
//! ## 상태 흐름
//! ```text
//! [비어 있음] --initialize()--> [살아있음] --destroy()/drop--> [비어 있음]
//!                  ↑ 이미 살아있으면 no-op
//! ```

use std::sync::Arc;

use super::{EditorConfig, RichTextWidget, ToolRegistry, WidgetFactory};
use crate::{
    api::ApiClient,
    error::{AppError, EditorError},
    models::StructuredDocument,
    status::StatusLine,
};

type ReadyHook = Arc<dyn Fn() + Send + Sync>;

pub struct EditorLifecycle<F: WidgetFactory> {
    factory: F,
    holder: String,
    tools: ToolRegistry,
    instance: Option<F::Widget>,
    status: StatusLine,
    on_ready: Option<ReadyHook>,
}

impl<F: WidgetFactory> EditorLifecycle<F> {
    /// `holder`는 위젯이 붙을 마운트 지점, `status`는 페이지의 상태 줄입니다.
    pub fn new(factory: F, holder: impl Into<String>, status: StatusLine) -> Self {
        Self {
            factory,
            holder: holder.into(),
            tools: ToolRegistry::standard(),
            instance: None,
            status,
            on_ready: None,
        }
    }

    /// 위젯이 준비될 때마다 호출할 훅을 등록합니다.
    pub fn with_on_ready(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_ready = Some(Arc::new(hook));
        self
    }

    pub fn is_live(&self) -> bool {
        self.instance.is_some()
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn widget(&self) -> Option<&F::Widget> {
        self.instance.as_ref()
    }

    /// 위젯을 생성합니다. 이미 살아있는 인스턴스가 있으면 아무것도 하지 않습니다.
    ///
    /// # 반환값
    /// - `Ok(true)`: 새 인스턴스를 만들었음
    /// - `Ok(false)`: 이미 살아있어서 건너뜀
    pub fn initialize(
        &mut self,
        existing_content: Option<StructuredDocument>,
    ) -> Result<bool, EditorError> {
        if self.instance.is_some() {
            tracing::debug!("Editor already live at {}, skipping initialize", self.holder);
            return Ok(false);
        }

        let mut config = EditorConfig::new(self.holder.clone(), self.tools.clone())
            .with_data(existing_content);
        if let Some(hook) = self.on_ready.clone() {
            config = config.with_on_ready(move || hook());
        }

        let widget = self.factory.create(config)?;
        self.instance = Some(widget);
        tracing::info!("Editor is ready at {}", self.holder);
        Ok(true)
    }

    /// 기존 글을 백엔드에서 가져온 뒤 그 내용으로 위젯을 생성합니다.
    ///
    /// 조회가 실패하면(네트워크 오류, 2xx 이외 응답, 빈 응답, 해석 불가능한 내용)
    /// 상태 줄에 메시지를 남기고 위젯은 만들지 않습니다.
    /// 이미 살아있는 인스턴스가 있으면 조회도 하지 않습니다.
    pub async fn load_and_initialize(
        &mut self,
        api: &ApiClient,
        article_id: &str,
    ) -> Result<bool, AppError> {
        if self.instance.is_some() {
            return Ok(false);
        }

        let loaded = match api.fetch_article(article_id).await {
            Ok(record) => record.document().map_err(AppError::from),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(document) => {
                tracing::info!(
                    "Loaded article {} ({} blocks)",
                    article_id,
                    document.blocks.len()
                );
                Ok(self.initialize(Some(document))?)
            }
            Err(e) => {
                tracing::warn!("Failed to load article {}: {}", article_id, e);
                self.status.set(load_failure_message(&e));
                Err(e)
            }
        }
    }

    /// 살아있는 위젯의 현재 내용을 직렬화합니다.
    pub async fn save(&mut self) -> Result<StructuredDocument, EditorError> {
        match self.instance.as_mut() {
            Some(widget) => widget.save().await,
            None => Err(EditorError::NotInitialized),
        }
    }

    /// 위젯을 해제합니다. 이후 `initialize()`로 새 인스턴스를 만들 수 있습니다.
    pub fn destroy(&mut self) {
        if let Some(mut widget) = self.instance.take() {
            widget.destroy();
            tracing::info!("Editor destroyed at {}", self.holder);
        }
    }
}

impl<F: WidgetFactory> Drop for EditorLifecycle<F> {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn load_failure_message(err: &AppError) -> String {
    match err {
        AppError::Rejected { status, message } => {
            format!("Failed to load article ({}): {}", status.as_u16(), message)
        }
        other => format!("Failed to load article: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counters {
        created: AtomicUsize,
        destroyed: AtomicUsize,
        ready: AtomicUsize,
    }

    struct FakeWidget {
        document: StructuredDocument,
        counters: Arc<Counters>,
    }

    impl RichTextWidget for FakeWidget {
        async fn save(&mut self) -> Result<StructuredDocument, EditorError> {
            Ok(self.document.clone())
        }

        fn destroy(&mut self) {
            self.counters.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakeFactory {
        counters: Arc<Counters>,
    }

    impl WidgetFactory for FakeFactory {
        type Widget = FakeWidget;

        fn create(&mut self, mut config: EditorConfig) -> Result<FakeWidget, EditorError> {
            self.counters.created.fetch_add(1, Ordering::SeqCst);
            config.notify_ready();
            Ok(FakeWidget {
                document: config.data.take().unwrap_or_default(),
                counters: self.counters.clone(),
            })
        }
    }

    fn lifecycle(counters: &Arc<Counters>) -> EditorLifecycle<FakeFactory> {
        let ready = counters.clone();
        EditorLifecycle::new(
            FakeFactory {
                counters: counters.clone(),
            },
            "editorjs",
            StatusLine::new(),
        )
        .with_on_ready(move || {
            ready.ready.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn initialize_twice_creates_one_instance() {
        let counters = Arc::new(Counters::default());
        let mut editor = lifecycle(&counters);

        assert!(editor.initialize(None).unwrap());
        assert!(!editor.initialize(None).unwrap());
        assert!(editor.is_live());
        assert_eq!(counters.created.load(Ordering::SeqCst), 1);
        assert_eq!(counters.ready.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn seeded_content_is_what_save_returns() {
        let counters = Arc::new(Counters::default());
        let mut editor = lifecycle(&counters);
        let seed = StructuredDocument::from_json_str(r#"{"blocks":[{"type":"delimiter","data":{}}]}"#)
            .unwrap();

        editor.initialize(Some(seed.clone())).unwrap();
        assert_eq!(editor.save().await.unwrap(), seed);
    }

    #[tokio::test]
    async fn save_without_instance_fails() {
        let counters = Arc::new(Counters::default());
        let mut editor = lifecycle(&counters);
        assert!(matches!(editor.save().await, Err(EditorError::NotInitialized)));
    }

    #[test]
    fn destroy_then_initialize_is_a_new_mount() {
        let counters = Arc::new(Counters::default());
        let mut editor = lifecycle(&counters);

        editor.initialize(None).unwrap();
        editor.destroy();
        editor.destroy();
        assert!(!editor.is_live());
        assert_eq!(counters.destroyed.load(Ordering::SeqCst), 1);

        assert!(editor.initialize(None).unwrap());
        assert_eq!(counters.created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_the_page_destroys_the_widget() {
        let counters = Arc::new(Counters::default());
        {
            let mut editor = lifecycle(&counters);
            editor.initialize(None).unwrap();
        }
        assert_eq!(counters.destroyed.load(Ordering::SeqCst), 1);
    }
}
