use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{LoginRequest, LoginResponse, OtpRequest, RegisterRequest, RegisterResponse};

// Plain-text error bodies longer than this are not shown to users.
const MAX_TEXT_MESSAGE: usize = 200;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("resource not found")]
    NotFound,
    #[error("backend rejected request with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("unexpected backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Message for the user: whatever the backend said, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { message: Some(message), .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Guide,
    Restaurant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Create,
    Update,
}

impl ProfileKind {
    /// Browser-facing route of the profile page.
    pub fn route(self) -> &'static str {
        match self {
            ProfileKind::Guide => "/guide",
            ProfileKind::Restaurant => "/restaurant",
        }
    }

    pub fn fetch_path(self, user_id: i64) -> String {
        match self {
            ProfileKind::Guide => format!("/api/guides/guide/{}", user_id),
            ProfileKind::Restaurant => format!("/api/restaurants/restaurant/{}", user_id),
        }
    }

    pub fn save_path(self, user_id: i64, mode: SaveMode) -> String {
        match (self, mode) {
            (ProfileKind::Guide, SaveMode::Create) => format!("/api/guides/register/guide/{}", user_id),
            (ProfileKind::Guide, SaveMode::Update) => format!("/api/guides/update/{}", user_id),
            (ProfileKind::Restaurant, SaveMode::Create) => {
                format!("/api/restaurants/register/restaurant/{}", user_id)
            }
            (ProfileKind::Restaurant, SaveMode::Update) => {
                format!("/api/restaurants/update/{}", user_id)
            }
        }
    }
}

impl SaveMode {
    fn method(self) -> Method {
        match self {
            SaveMode::Create => Method::POST,
            SaveMode::Update => Method::PUT,
        }
    }
}

/// The marketplace REST backend.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn send_otp(&self, email: &str) -> Result<(), ApiError>;

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError>;

    /// `Ok(None)` when the user has no profile of this kind yet.
    async fn fetch_profile(&self, kind: ProfileKind, user_id: i64) -> Result<Option<Value>, ApiError>;

    async fn save_profile(
        &self,
        kind: ProfileKind,
        user_id: i64,
        mode: SaveMode,
        profile: &Value,
    ) -> Result<(), ApiError>;
}

pub struct HttpMarketplace {
    client: Client,
    api_url: String,
}

impl HttpMarketplace {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        Ok(HttpMarketplace {
            client: Client::builder().build()?,
            api_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        debug!(%method, path, "backend request");
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|err| {
            warn!(path, error = %err, "backend request failed to send");
            ApiError::Transport(err)
        })?;
        check_status(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let text = self.send(Method::POST, path, Some(body)).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

async fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(path, %status, "backend returned an error status");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message: extract_message(&body),
    })
}

/// Pulls a displayable message out of an error body: a JSON `message` or
/// `error` field, a JSON string, or a short plain-text body.
pub fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        Ok(Value::String(text)) => Some(text),
        Ok(_) => None,
        Err(_) if body.len() <= MAX_TEXT_MESSAGE && !body.starts_with('<') => Some(body.to_string()),
        Err(_) => None,
    }
}

#[async_trait]
impl MarketplaceApi for HttpMarketplace {
    async fn send_otp(&self, email: &str) -> Result<(), ApiError> {
        let body = OtpRequest { email, otp: None };
        self.send(Method::POST, "/api/users/send-otp", Some(&body)).await?;
        Ok(())
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ApiError> {
        let body = OtpRequest { email, otp: Some(otp) };
        self.send(Method::POST, "/api/users/verify-otp", Some(&body)).await?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json("/api/users/login", request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.post_json("/api/users/register", request).await
    }

    async fn fetch_profile(&self, kind: ProfileKind, user_id: i64) -> Result<Option<Value>, ApiError> {
        let path = kind.fetch_path(user_id);
        let response = match self.send::<Value>(Method::GET, &path, None).await {
            Ok(response) => response,
            Err(ApiError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };

        let text = response.text().await?;
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(Value::Null) => Ok(None),
            Ok(profile) => Ok(Some(profile)),
            Err(_) if text.trim().is_empty() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save_profile(
        &self,
        kind: ProfileKind,
        user_id: i64,
        mode: SaveMode,
        profile: &Value,
    ) -> Result<(), ApiError> {
        let path = kind.save_path(user_id, mode);
        self.send(mode.method(), &path, Some(profile)).await?;
        Ok(())
    }
}
