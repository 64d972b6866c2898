use serde::{Deserialize, Serialize};

/// `POST /auth/jwt/login` form body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Some deployments answer with `token` instead of `access_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `POST /auth/verify` body.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest<'a> {
    pub token: &'a str,
}
