#![cfg(test)]

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::web;
use async_trait::async_trait;
use chrono::Duration;
use mockall::mock;
use rstest::fixture;
use serde_json::{json, Value};

use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Role};
use crate::services::{ApiError, MarketplaceApi, ProfileKind, SaveMode};
use crate::session::{Session, SessionCodec, SessionUser};
use crate::state::{AppState, FlowStore};

mock! {
    pub Marketplace {}
    #[async_trait]
    impl MarketplaceApi for Marketplace {
        async fn send_otp(&self, email: &str) -> Result<(), ApiError>;
        async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), ApiError>;
        async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
        async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, ApiError>;
        async fn fetch_profile(&self, kind: ProfileKind, user_id: i64) -> Result<Option<Value>, ApiError>;
        async fn save_profile(
            &self,
            kind: ProfileKind,
            user_id: i64,
            mode: SaveMode,
            profile: &Value,
        ) -> Result<(), ApiError>;
    }
}

pub const TEST_EMAIL: &str = "sam@journey.example";
pub const TEST_PASSWORD: &str = "Passw0rd!";

pub fn test_state(api: MockMarketplace) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        Arc::new(api),
        SessionCodec::new(b"handler-test-secret", Duration::hours(1), false),
        FlowStore::new(Duration::minutes(30)),
    ))
}

#[fixture]
pub fn guide_user() -> SessionUser {
    SessionUser {
        user_id: 7,
        role: Some(Role::Guide),
        email: TEST_EMAIL.to_string(),
        username: "sam".to_string(),
    }
}

pub fn login_response(role: &str) -> LoginResponse {
    LoginResponse {
        id: 7,
        role: role.to_string(),
        email: TEST_EMAIL.to_string(),
        username: "sam".to_string(),
    }
}

pub fn signed_in(state: &AppState, user: SessionUser) -> Cookie<'static> {
    state
        .sessions
        .cookie(&Session::Authenticated(user))
        .expect("sign session cookie")
}

pub fn guide_profile(approved: bool) -> Value {
    json!({
        "guidename": "Asha Patil",
        "experience": 6,
        "language": "Marathi",
        "bio": "Fort treks and old city walks",
        "latitude": 18.52,
        "longitude": 73.85,
        "licenseNumber": "MH-GD-0042",
        "isAvailable": true,
        "phoneNo": "9876543210",
        "approved": approved
    })
}

pub fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
    res.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub fn response_cookie<B>(res: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.into_owned())
}
