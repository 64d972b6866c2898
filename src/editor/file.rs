//! # 파일 기반 에디터 위젯
//!
//! 마운트 지점(holder)을 디스크의 JSON 파일 경로로 해석합니다.
//! 생성 시 초기 문서를 파일에 쓰고, `save()` 때마다 파일을 다시 읽으므로
//! 사용자가 외부 편집기로 고친 내용이 그대로 반영됩니다.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::{EditorConfig, RichTextWidget, ToolRegistry, WidgetFactory};
use crate::error::EditorError;
use crate::models::StructuredDocument;

#[derive(Debug)]
pub struct JsonFileWidget {
    path: PathBuf,
    tools: ToolRegistry,
    destroyed: bool,
}

impl JsonFileWidget {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RichTextWidget for JsonFileWidget {
    async fn save(&mut self) -> Result<StructuredDocument, EditorError> {
        if self.destroyed {
            return Err(EditorError::NotInitialized);
        }

        let raw = tokio::fs::read_to_string(&self.path).await?;
        let mut document: StructuredDocument = serde_json::from_str(&raw)?;

        for block in &document.blocks {
            if self.tools.find(&block.kind).is_none() {
                tracing::debug!("Block type {:?} has no registered tool", block.kind);
            }
        }

        // 위젯의 save()처럼 저장 시각을 기록합니다.
        document.time = Some(Utc::now().timestamp_millis());
        Ok(document)
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            tracing::debug!("Detached editor from {}", self.path.display());
            self.destroyed = true;
        }
    }
}

/// `JsonFileWidget` 생성기
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFileFactory;

impl WidgetFactory for JsonFileFactory {
    type Widget = JsonFileWidget;

    // `WidgetFactory::create`는 동기 함수라서 마운트 시 한 번 쓰는 파일은 std::fs로 처리합니다.
    // 이후의 `save()`는 tokio::fs를 사용합니다.
    fn create(&mut self, mut config: EditorConfig) -> Result<JsonFileWidget, EditorError> {
        let path = PathBuf::from(&config.holder);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let document = config.data.take().unwrap_or_default();
        fs::write(&path, serde_json::to_string_pretty(&document)?)?;
        tracing::info!(
            "Editor mounted at {} with {} blocks",
            path.display(),
            document.blocks.len()
        );
        tracing::debug!(
            "Registered tools: {}",
            config.tools.names().collect::<Vec<_>>().join(", ")
        );

        config.notify_ready();
        Ok(JsonFileWidget {
            path,
            tools: config.tools,
            destroyed: false,
        })
    }
}
