pub mod auth;
pub mod profile;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse, HttpResponseBuilder};
use serde_json::json;

use crate::forms::{GuideSchema, RestaurantSchema};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(auth::entry_page))
        .route("/health", web::get().to(health_check))

        .route("/auth/toggle", web::post().to(auth::toggle))
        .route("/auth/send-otp", web::post().to(auth::send_otp))
        .route("/auth/verify-otp", web::post().to(auth::verify_otp))
        .route("/auth/login", web::post().to(auth::login))
        .route("/auth/register", web::post().to(auth::register))
        .route("/logout", web::post().to(auth::logout))

        .route("/guide", web::get().to(profile::summary::<GuideSchema>))
        .route("/guide", web::post().to(profile::submit::<GuideSchema>))
        .route("/guide/edit", web::get().to(profile::edit::<GuideSchema>))
        .route("/guide/view", web::get().to(profile::view::<GuideSchema>))

        .route("/restaurant", web::get().to(profile::summary::<RestaurantSchema>))
        .route("/restaurant", web::post().to(profile::submit::<RestaurantSchema>))
        .route("/restaurant/edit", web::get().to(profile::edit::<RestaurantSchema>))
        .route("/restaurant/view", web::get().to(profile::view::<RestaurantSchema>));
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn with_cookies(
    mut builder: HttpResponseBuilder,
    cookies: impl IntoIterator<Item = Cookie<'static>>,
) -> HttpResponseBuilder {
    for cookie in cookies {
        builder.cookie(cookie);
    }
    builder
}

pub(crate) fn html(
    status: StatusCode,
    body: String,
    cookies: impl IntoIterator<Item = Cookie<'static>>,
) -> HttpResponse {
    with_cookies(HttpResponse::build(status), cookies)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

pub(crate) fn see_other(
    location: &str,
    cookies: impl IntoIterator<Item = Cookie<'static>>,
) -> HttpResponse {
    with_cookies(HttpResponse::SeeOther(), cookies)
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}
