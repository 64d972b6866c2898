//! # 리치 텍스트 에디터 모듈
//!
//! 에디터 위젯 자체는 외부 라이브러리로 취급하고, 이 모듈은 그 인터페이스와
//! 생명주기만 다룹니다.
//!
//! - `RichTextWidget`: 위젯이 제공해야 하는 기능 (`save`, `destroy`)
//! - `WidgetFactory`: 마운트 지점·도구 목록·초기 데이터로 위젯을 생성
//! - `tools`: 에디터에 등록되는 도구(capability) 목록
//! - `lifecycle`: 페이지 마운트당 위젯 하나를 소유하는 관리자
//! - `file`: 마운트 지점이 디스크의 JSON 파일인 위젯 구현

pub mod file;
pub mod lifecycle;
pub mod tools;

use std::future::Future;

use crate::error::EditorError;
use crate::models::StructuredDocument;

pub use file::{JsonFileFactory, JsonFileWidget};
pub use lifecycle::EditorLifecycle;
pub use tools::{Tool, ToolRegistry};

/// 살아있는 에디터 위젯 핸들
pub trait RichTextWidget {
    /// 현재 편집 내용을 문서로 직렬화합니다.
    fn save(&mut self) -> impl Future<Output = Result<StructuredDocument, EditorError>> + Send;

    /// 위젯 상태를 해제합니다. 두 번 호출해도 안전해야 합니다.
    fn destroy(&mut self);
}

/// 위젯 생성기 — 위젯 라이브러리의 생성자에 해당합니다.
pub trait WidgetFactory {
    type Widget: RichTextWidget;

    /// 위젯을 만든 뒤 `config.notify_ready()`를 호출해야 합니다.
    fn create(&mut self, config: EditorConfig) -> Result<Self::Widget, EditorError>;
}

/// 위젯 생성 옵션
pub struct EditorConfig {
    /// 마운트 지점 ID
    pub holder: String,
    pub tools: ToolRegistry,
    /// 초기 데이터. None이면 빈 문서로 시작합니다.
    pub data: Option<StructuredDocument>,
    on_ready: Option<Box<dyn FnOnce() + Send>>,
}

impl EditorConfig {
    pub fn new(holder: impl Into<String>, tools: ToolRegistry) -> Self {
        Self {
            holder: holder.into(),
            tools,
            data: None,
            on_ready: None,
        }
    }

    pub fn with_data(mut self, data: Option<StructuredDocument>) -> Self {
        self.data = data;
        self
    }

    pub fn with_on_ready(mut self, on_ready: impl FnOnce() + Send + 'static) -> Self {
        self.on_ready = Some(Box::new(on_ready));
        self
    }

    /// 준비 완료 콜백을 한 번만 실행합니다.
    pub fn notify_ready(&mut self) {
        if let Some(on_ready) = self.on_ready.take() {
            on_ready();
        }
    }
}

impl std::fmt::Debug for EditorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorConfig")
            .field("holder", &self.holder)
            .field("tools", &self.tools)
            .field("data", &self.data)
            .field("on_ready", &self.on_ready.is_some())
            .finish()
    }
}
