use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::session::{Session, SessionUser};

pub const ENTRY_ROUTE: &str = "/";

#[derive(Debug, PartialEq, Eq)]
pub enum Navigation<'a> {
    Proceed(&'a SessionUser),
    Redirect(&'static str),
}

pub fn check(session: &Session) -> Navigation<'_> {
    match session.user() {
        Some(user) => Navigation::Proceed(user),
        None => Navigation::Redirect(ENTRY_ROUTE),
    }
}

/// Extractor for authenticated-only routes; anonymous requests are sent
/// back to the entry page.
#[derive(Debug, Clone)]
pub struct Authenticated(pub SessionUser);

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = match Session::from_request(req, payload).into_inner() {
            Ok(session) => session,
            Err(err) => return ready(Err(err)),
        };
        ready(match check(&session) {
            Navigation::Proceed(user) => Ok(Authenticated(user.clone())),
            Navigation::Redirect(_) => Err(AppError::Unauthenticated),
        })
    }
}
