//! # 글(Article) 모델 정의
//!
//! 백엔드 REST API와 주고받는 글 관련 데이터 구조체들입니다.
//!
//! ## 구조체 역할
//! - `ArticleDraft`: 생성/수정 요청 본문 (에디터 출력으로 조립)
//! - `ArticleRecord`: 백엔드가 돌려주는 글 한 건
//! - `ArticleEnvelope`: `GET /api/v1/get-article/{id}` 응답 (`{article: [...]}`)
//! - `ArticleList`: `GET /api/v1/get-articles` 응답 (`{articles: [...]}`)

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::StructuredDocument;

/// `created_date` 형식: 로컬 시간 `YYYY-MM-DD HH:MM:SS`
pub const CREATED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 생성/수정 요청 본문
///
/// `content`는 에디터 출력(StructuredDocument)을 JSON 문자열로 인코딩한 값입니다.
/// 백엔드에 전송한 뒤에는 로컬에서 더 이상 변경하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDraft {
    /// 세션에서 얻은 작성자 ID. 세션에 없으면 null로 전송되고 백엔드가 판단합니다.
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub published: bool,
    pub created_date: String,
}

impl ArticleDraft {
    /// 에디터 출력으로 초안을 만듭니다. `created_date`는 호출 시각입니다.
    pub fn build(
        owner_id: Option<String>,
        title: Option<String>,
        document: &StructuredDocument,
        published: bool,
    ) -> Result<Self, serde_json::Error> {
        Self::build_at(owner_id, title, document, published, Local::now())
    }

    /// 시각을 직접 지정하는 버전
    pub fn build_at<Tz: TimeZone>(
        owner_id: Option<String>,
        title: Option<String>,
        document: &StructuredDocument,
        published: bool,
        now: DateTime<Tz>,
    ) -> Result<Self, serde_json::Error>
    where
        Tz::Offset: std::fmt::Display,
    {
        Ok(Self {
            owner_id,
            title: title.filter(|t| !t.trim().is_empty()),
            content: document.to_json_string()?,
            published,
            created_date: now.format(CREATED_DATE_FORMAT).to_string(),
        })
    }
}

/// 백엔드가 돌려주는 글 한 건
///
/// `content`만 필수이고, 나머지 필드는 백엔드마다 다를 수 있어 `extra`로 보존합니다.
/// 백엔드는 `published`를 문자열 컬럼(`"true"`/`"false"`)으로 저장하므로 둘 다 받습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(
        default,
        deserialize_with = "published_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ArticleRecord {
    /// `content` JSON 문자열을 에디터 문서로 해석합니다.
    pub fn document(&self) -> Result<StructuredDocument, serde_json::Error> {
        StructuredDocument::from_json_str(&self.content)
    }
}

/// bool 또는 `"true"`/`"false"` 문자열(대소문자 무시)을 받습니다.
fn published_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(flag)) => Ok(Some(flag)),
        Some(Flag::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(serde::de::Error::invalid_value(
                serde::de::Unexpected::Str(other),
                &"a boolean or \"true\"/\"false\"",
            )),
        },
    }
}

/// `GET /api/v1/get-article/{id}` 응답
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleEnvelope {
    #[serde(default)]
    pub article: Vec<ArticleRecord>,
}

/// `GET /api/v1/get-articles` 응답
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleList {
    #[serde(default)]
    pub articles: Vec<Value>,
}
