use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::session::removal_cookie;

pub const FLASH_COOKIE: &str = "jc_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        }
    }
}

/// Transient notification shown once at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }
}

/// Cookie carrying `notice` across the next redirect.
pub fn flash_cookie(notice: &Notice, secure: bool) -> Result<Cookie<'static>, AppError> {
    let payload = B64.encode(serde_json::to_vec(notice)?);
    Ok(Cookie::build(FLASH_COOKIE, payload)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .finish())
}

/// Reads the pending notice. The caller clears it with the returned cookie.
pub fn take_flash(req: &HttpRequest) -> (Option<Notice>, Option<Cookie<'static>>) {
    let Some(cookie) = req.cookie(FLASH_COOKIE) else {
        return (None, None);
    };
    let notice = B64
        .decode(cookie.value())
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok());
    (notice, Some(removal_cookie(FLASH_COOKIE)))
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn test_flash_is_consumed() {
        let notice = Notice::success("Login successful! Hello sam!");
        let req = TestRequest::default()
            .cookie(flash_cookie(&notice, false).unwrap())
            .to_http_request();

        let (read, clear) = take_flash(&req);
        assert_eq!(read, Some(notice));
        assert_eq!(clear.map(|c| c.value().to_string()), Some(String::new()));
    }

    #[test]
    fn test_flash_follows_secure_setting() {
        let notice = Notice::error("Failed to send OTP");
        assert_eq!(flash_cookie(&notice, true).unwrap().secure(), Some(true));
        assert_eq!(flash_cookie(&notice, false).unwrap().secure(), Some(false));
    }

    #[test]
    fn test_garbled_flash_is_dropped_and_cleared() {
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, "%%%"))
            .to_http_request();
        let (read, clear) = take_flash(&req);
        assert_eq!(read, None);
        assert!(clear.is_some());
    }
}
