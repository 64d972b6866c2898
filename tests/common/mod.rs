//! In-process fake backend and in-memory editor widget shared by the
//! integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use inkwell::{
    editor::{EditorConfig, RichTextWidget, WidgetFactory},
    models::StructuredDocument,
    Config, EditorError, VerifyMode,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Deserialize;
use serde_json::{json, Value};

pub const SECRET: &[u8] = b"test-secret";

/// Article ids are UUIDs assigned by the backend.
pub const ARTICLE_ID: &str = "5f0c6a7e-3d2b-4c1a-9e8f-0a1b2c3d4e5f";

/// Mints a signed token the way the real issuer does.
pub fn mint_token(claims: Value) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

pub fn token_for(owner: &str) -> String {
    mint_token(json!({ "sub": owner, "exp": 4_102_444_800i64 }))
}

/// One recorded create/update call.
#[derive(Debug, Clone)]
pub struct Submission {
    pub article_id: Option<String>,
    pub body: Value,
    pub authorization: Option<String>,
    pub cookie: Option<String>,
}

#[derive(Default)]
pub struct Recorded {
    pub verify_calls: usize,
    pub fetch_calls: usize,
    pub submissions: Vec<Submission>,
}

#[derive(Clone)]
pub struct Backend {
    pub valid_tokens: Arc<Mutex<Vec<String>>>,
    pub articles: Arc<Mutex<HashMap<String, String>>>,
    /// Status and raw body returned by create/update. None means 200 with the echoed draft.
    pub submit_response: Arc<Mutex<Option<(StatusCode, String)>>>,
    pub submit_delay: Arc<Mutex<Duration>>,
    /// Field name carrying the token in the login response.
    pub login_token_field: Arc<Mutex<&'static str>>,
    pub recorded: Arc<Mutex<Recorded>>,
}

impl Backend {
    pub fn new() -> Self {
        Self {
            valid_tokens: Arc::default(),
            articles: Arc::default(),
            submit_response: Arc::default(),
            submit_delay: Arc::default(),
            login_token_field: Arc::new(Mutex::new("access_token")),
            recorded: Arc::default(),
        }
    }

    pub fn accept_token(&self, token: &str) {
        self.valid_tokens.lock().unwrap().push(token.to_string());
    }

    pub fn put_article(&self, id: &str, content: &str) {
        self.articles
            .lock()
            .unwrap()
            .insert(id.to_string(), content.to_string());
    }

    pub fn respond_to_submit_with(&self, status: StatusCode, body: &str) {
        *self.submit_response.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn delay_submit(&self, delay: Duration) {
        *self.submit_delay.lock().unwrap() = delay;
    }

    pub fn answer_login_with(&self, field: &'static str) {
        *self.login_token_field.lock().unwrap() = field;
    }

    pub fn verify_calls(&self) -> usize {
        self.recorded.lock().unwrap().verify_calls
    }

    pub fn fetch_calls(&self) -> usize {
        self.recorded.lock().unwrap().fetch_calls
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.recorded.lock().unwrap().submissions.clone()
    }

    fn is_valid(&self, token: &str) -> bool {
        self.valid_tokens.lock().unwrap().iter().any(|t| t == token)
    }

    /// Serves the backend on an ephemeral port and returns a config pointing at it.
    pub async fn spawn(&self) -> Config {
        let app = Router::new()
            .route("/users/me", get(users_me))
            .route("/auth/verify", post(auth_verify))
            .route("/auth/jwt/login", post(login))
            .route("/api/v1/get-article/{id}", get(get_article))
            .route("/api/v1/get-articles", get(list_articles))
            .route("/api/v1/create-article", post(create_article))
            .route("/api/v1/update-article/{id}", put(update_article))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Config::new(format!("http://{}", addr))
    }

    pub async fn spawn_with(&self, verify_mode: VerifyMode) -> Config {
        let mut config = self.spawn().await;
        config.verify_mode = verify_mode;
        config
    }
}

/// A config whose port has nothing listening.
pub async fn dead_backend() -> Config {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Config::new(format!("http://{}", addr))
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn users_me(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    backend.recorded.lock().unwrap().verify_calls += 1;
    let token = header_value(&headers, header::AUTHORIZATION)
        .and_then(|v| v.strip_prefix("Bearer ").map(str::to_string));
    match token {
        Some(token) if backend.is_valid(&token) => Json(json!({ "id": 1 })).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Could not validate credentials" })),
        )
            .into_response(),
    }
}

#[derive(Deserialize)]
struct VerifyBody {
    token: String,
}

async fn auth_verify(State(backend): State<Backend>, Json(body): Json<VerifyBody>) -> Response {
    backend.recorded.lock().unwrap().verify_calls += 1;
    if backend.is_valid(&body.token) {
        Json(json!({ "valid": true })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(backend): State<Backend>, Form(form): Form<LoginForm>) -> Response {
    if form.password != "correct horse" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect username or password" })),
        )
            .into_response();
    }
    let token = token_for(&form.username);
    backend.accept_token(&token);
    let field = *backend.login_token_field.lock().unwrap();
    let mut body = json!({ "token_type": "bearer" });
    body[field] = json!(token);
    Json(body).into_response()
}

async fn get_article(State(backend): State<Backend>, Path(id): Path<String>) -> Response {
    backend.recorded.lock().unwrap().fetch_calls += 1;
    let content = backend.articles.lock().unwrap().get(&id).cloned();
    match content {
        // `published` is a string column and `created_date` an ISO datetime on the real backend.
        Some(content) => Json(json!({
            "article": [{
                "id": id,
                "owner_id": "writer-1",
                "content": content,
                "published": "false",
                "created_date": "2024-03-09T07:05:01"
            }]
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Article not found" })),
        )
            .into_response(),
    }
}

async fn list_articles(State(backend): State<Backend>) -> Json<Value> {
    let articles: Vec<Value> = backend
        .articles
        .lock()
        .unwrap()
        .keys()
        .map(|id| json!({ "id": id }))
        .collect();
    Json(json!({ "articles": articles }))
}

async fn create_article(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    submit(backend, None, headers, body).await
}

async fn update_article(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    submit(backend, Some(id), headers, body).await
}

async fn submit(backend: Backend, article_id: Option<String>, headers: HeaderMap, body: Value) -> Response {
    backend.recorded.lock().unwrap().submissions.push(Submission {
        article_id: article_id.clone(),
        body: body.clone(),
        authorization: header_value(&headers, header::AUTHORIZATION),
        cookie: header_value(&headers, header::COOKIE),
    });

    let delay = *backend.submit_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let canned = backend.submit_response.lock().unwrap().clone();
    match canned {
        Some((status, raw)) => (status, raw).into_response(),
        None => {
            let mut echoed = body;
            echoed["id"] = json!(article_id.unwrap_or_else(|| "new-1".to_string()));
            Json(echoed).into_response()
        }
    }
}

/// Widget whose content lives in shared memory so tests can play the user.
#[derive(Clone, Default)]
pub struct MemoryFactory {
    pub content: Arc<Mutex<Option<StructuredDocument>>>,
    pub created: Arc<AtomicUsize>,
    pub fail_save: bool,
}

impl MemoryFactory {
    pub fn failing() -> Self {
        Self {
            fail_save: true,
            ..Self::default()
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn content(&self) -> Option<StructuredDocument> {
        self.content.lock().unwrap().clone()
    }

    /// Replaces the live document, like a user typing.
    pub fn type_document(&self, raw: &str) {
        *self.content.lock().unwrap() = Some(StructuredDocument::from_json_str(raw).unwrap());
    }
}

pub struct MemoryWidget {
    content: Arc<Mutex<Option<StructuredDocument>>>,
    fail_save: bool,
}

impl RichTextWidget for MemoryWidget {
    async fn save(&mut self) -> Result<StructuredDocument, EditorError> {
        if self.fail_save {
            return Err(EditorError::Save("widget crashed".to_string()));
        }
        let content = self.content.lock().unwrap().clone();
        content.ok_or(EditorError::NotInitialized)
    }

    fn destroy(&mut self) {
        *self.content.lock().unwrap() = None;
    }
}

impl WidgetFactory for MemoryFactory {
    type Widget = MemoryWidget;

    fn create(&mut self, mut config: EditorConfig) -> Result<MemoryWidget, EditorError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        *self.content.lock().unwrap() = Some(config.data.take().unwrap_or_default());
        config.notify_ready();
        Ok(MemoryWidget {
            content: self.content.clone(),
            fail_save: self.fail_save,
        })
    }
}
