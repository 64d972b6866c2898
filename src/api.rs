//! # 백엔드 REST API 클라이언트
//!
//! 에디터 세션이 사용하는 백엔드 호출을 한곳에 모았습니다.
//!
//! ## 엔드포인트
//! - `GET    /users/me`                    → 토큰 검증 (Bearer)
//! - `POST   /auth/verify`                 → 토큰 검증 (본문 `{token}`)
//! - `POST   /auth/jwt/login`              → 로그인 (form)
//! - `GET    /api/v1/get-article/{id}`     → 글 조회
//! - `GET    /api/v1/get-articles`         → 글 목록
//! - `POST   /api/v1/create-article`       → 글 생성 (Bearer)
//! - `PUT    /api/v1/update-article/{id}`  → 글 수정 (Bearer)
//!
//! 모든 요청은 같은 쿠키 저장소(Jar)를 공유합니다.
//! 브라우저의 `credentials: "include"`와 같은 효과입니다.

use std::sync::Arc;

use reqwest::{cookie::Jar, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::{Config, VerifyMode},
    error::{describe_error_body, AppError},
    models::*,
    storage::ACCESS_TOKEN_KEY,
};

/// 백엔드 API 클라이언트
///
/// 내부의 `reqwest::Client`는 Arc로 커넥션 풀을 공유하므로 clone이 저렴합니다.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    verify_mode: VerifyMode,
    jar: Arc<Jar>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| AppError::Config(format!("invalid API_BASE_URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "API_BASE_URL cannot be used as a base: {}",
                config.api_base_url
            )));
        }

        let jar = Arc::new(Jar::default());
        let mut builder = reqwest::Client::builder().cookie_provider(jar.clone());
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            verify_mode: config.verify_mode,
            jar,
        })
    }

    /// 토큰을 `access_token` 쿠키로 저장해 이후 모든 요청에 실어 보냅니다.
    pub fn set_token_cookie(&self, token: &str) {
        let cookie = format!("{}={}; Path=/", ACCESS_TOKEN_KEY, token);
        self.jar.add_cookie_str(&cookie, &self.base_url);
    }

    /// 기준 URL 뒤에 경로 세그먼트를 붙입니다. 세그먼트는 퍼센트 인코딩됩니다.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config("API base URL has no path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 토큰이 여전히 유효한지 백엔드에 확인합니다.
    ///
    /// - `Ok(true)`: 2xx 응답
    /// - `Ok(false)`: 백엔드가 토큰을 거절 (2xx 이외)
    /// - `Err(_)`: 네트워크 실패
    pub async fn verify_token(&self, token: &str) -> Result<bool, AppError> {
        let request = match self.verify_mode {
            VerifyMode::UsersMe => self
                .http
                .get(self.endpoint(&["users", "me"])?)
                .bearer_auth(token),
            VerifyMode::AuthVerify => self
                .http
                .post(self.endpoint(&["auth", "verify"])?)
                .json(&VerifyRequest { token }),
        };

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Token verification ({:?}) returned {}", self.verify_mode, status);
        Ok(status.is_success())
    }

    /// 기존 글을 조회합니다. 응답의 `article` 배열에서 첫 번째 항목을 돌려줍니다.
    pub async fn fetch_article(&self, id: &str) -> Result<ArticleRecord, AppError> {
        let url = self.endpoint(&["api", "v1", "get-article", id])?;
        tracing::debug!("GET {}", url);
        let envelope: ArticleEnvelope = read_json(self.http.get(url).send().await?).await?;
        envelope
            .article
            .into_iter()
            .next()
            .ok_or_else(|| AppError::UnexpectedResponse(format!("article {} not found", id)))
    }

    pub async fn list_articles(&self) -> Result<Vec<Value>, AppError> {
        let url = self.endpoint(&["api", "v1", "get-articles"])?;
        tracing::debug!("GET {}", url);
        let list: ArticleList = read_json(self.http.get(url).send().await?).await?;
        Ok(list.articles)
    }

    pub async fn create_article(&self, token: &str, draft: &ArticleDraft) -> Result<Value, AppError> {
        let url = self.endpoint(&["api", "v1", "create-article"])?;
        tracing::debug!("POST {}", url);
        let response = self.http.post(url).bearer_auth(token).json(draft).send().await?;
        read_body(response).await
    }

    pub async fn update_article(
        &self,
        token: &str,
        id: &str,
        draft: &ArticleDraft,
    ) -> Result<Value, AppError> {
        let url = self.endpoint(&["api", "v1", "update-article", id])?;
        tracing::debug!("PUT {}", url);
        let response = self.http.put(url).bearer_auth(token).json(draft).send().await?;
        read_body(response).await
    }

    /// 로그인하고 받은 토큰을 쿠키 저장소에도 넣습니다.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AppError> {
        let url = self.endpoint(&["auth", "jwt", "login"])?;
        tracing::debug!("POST {}", url);
        let form = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let login: LoginResponse = read_json(self.http.post(url).form(&form).send().await?).await?;
        self.set_token_cookie(&login.access_token);
        Ok(login)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("verify_mode", &self.verify_mode)
            .finish()
    }
}

/// 2xx가 아니면 본문을 해석해 `AppError::Rejected`로 바꿉니다.
async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // 본문을 읽지 못해도 상태 코드는 보고해야 하므로 에러를 빈 문자열로 대체합니다.
    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        describe_error_body(&body)
    };
    tracing::warn!("Backend rejected request with {}: {}", status, message);
    Err(AppError::Rejected { status, message })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    Ok(check_status(response).await?.json().await?)
}

/// 성공 본문을 JSON으로 읽습니다. 빈 본문은 null, JSON이 아니면 문자열 그대로.
async fn read_body(response: Response) -> Result<Value, AppError> {
    let text = check_status(response).await?.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
