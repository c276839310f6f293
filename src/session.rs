use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use futures_util::future::{ready, Ready};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::models::{LoginResponse, Role};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "jc_session";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub role: Option<Role>,
    pub email: String,
    pub username: String,
}

impl From<LoginResponse> for SessionUser {
    fn from(res: LoginResponse) -> Self {
        SessionUser {
            user_id: res.id,
            role: res.role.parse().ok(),
            email: res.email,
            username: res.username,
        }
    }
}

/// Who is using the app. Immutable; the next value comes from `dispatch`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(SessionUser),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    LoginSuccess(SessionUser),
    Logout,
}

impl Session {
    pub fn dispatch(&self, action: SessionAction) -> Session {
        match action {
            SessionAction::LoginSuccess(user) => Session::Authenticated(user),
            SessionAction::Logout => Session::Anonymous,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Session::Authenticated(user) => Some(user),
            Session::Anonymous => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    user: SessionUser,
    iat: i64,
    exp: i64,
}

/// Persists a `Session` in a signed (HS256) cookie.
#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    secure: bool,
}

impl SessionCodec {
    pub fn new(secret: &[u8], ttl: Duration, secure: bool) -> Self {
        SessionCodec {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
            secure,
        }
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Missing, tampered and expired cookies all read as anonymous.
    pub fn read(&self, req: &HttpRequest) -> Session {
        let Some(cookie) = req.cookie(SESSION_COOKIE) else {
            return Session::Anonymous;
        };
        match decode::<Claims>(cookie.value(), &self.decoding, &Validation::default()) {
            Ok(data) => Session::Authenticated(data.claims.user),
            Err(err) => {
                debug!(error = %err, "discarding session cookie");
                Session::Anonymous
            }
        }
    }

    pub fn cookie(&self, session: &Session) -> Result<Cookie<'static>, AppError> {
        let user = match session {
            Session::Anonymous => return Ok(removal_cookie(SESSION_COOKIE)),
            Session::Authenticated(user) => user,
        };

        let now = Utc::now();
        let claims = Claims {
            user: user.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;

        Ok(Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(self.ttl.num_seconds()))
            .finish())
    }
}

pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path("/").finish();
    cookie.make_removal();
    cookie
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(match req.app_data::<web::Data<AppState>>() {
            Some(state) => Ok(state.sessions.read(req)),
            None => Err(AppError::MissingState),
        })
    }
}
