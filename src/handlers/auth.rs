use std::collections::HashMap;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::error::AppError;
use crate::flash::{flash_cookie, take_flash, Notice};
use crate::forms::auth::{login_request, register_request, AuthMode, OTP_FIELD};
use crate::handlers::{html, see_other};
use crate::models::{landing_route, LoginRequest, LoginResponse};
use crate::session::{removal_cookie, Session, SessionAction, SessionUser};
use crate::state::AppState;
use crate::validation::{validate, FormValues};
use crate::views::auth::{entry_page as render_entry, EntryPage};

pub const FLOW_COOKIE: &str = "jc_flow";

const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Current flow id, plus the cookie to set when the browser had none.
fn flow_id(req: &HttpRequest, state: &AppState) -> (String, Option<Cookie<'static>>) {
    if let Some(cookie) = req.cookie(FLOW_COOKIE) {
        return (cookie.value().to_string(), None);
    }
    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build(FLOW_COOKIE, id.clone())
        .path("/")
        .http_only(true)
        .secure(state.sessions.is_secure())
        .same_site(SameSite::Lax)
        .finish();
    (id, Some(cookie))
}

struct Rendered<'a> {
    mode: &'a AuthMode,
    values: &'a FormValues,
    errors: Option<&'a ValidationErrors>,
    message: Option<&'a str>,
    notice: Option<Notice>,
}

impl<'a> Rendered<'a> {
    fn new(mode: &'a AuthMode, values: &'a FormValues) -> Self {
        Rendered { mode, values, errors: None, message: None, notice: None }
    }

    fn respond(self, status: StatusCode, cookies: Option<Cookie<'static>>) -> HttpResponse {
        let body = render_entry(&EntryPage {
            mode: self.mode,
            values: self.values,
            errors: self.errors,
            message: self.message,
            notice: self.notice.as_ref(),
        });
        html(status, body, cookies)
    }
}

fn posted(form: web::Form<HashMap<String, String>>) -> FormValues {
    FormValues::from(form.into_inner())
}

pub async fn entry_page(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
) -> HttpResponse {
    if let Some(role) = session.user().and_then(|user| user.role) {
        return see_other(role.landing_route(), None);
    }

    let mode = req
        .cookie(FLOW_COOKIE)
        .map(|cookie| state.flows.get(cookie.value()))
        .unwrap_or_default();
    let (notice, clear) = take_flash(&req);
    let values = FormValues::new();
    Rendered { notice, ..Rendered::new(&mode, &values) }.respond(StatusCode::OK, clear)
}

pub async fn toggle(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let (id, cookie) = flow_id(&req, &state);
    let mode = state.flows.get(&id).toggled();
    state.flows.put(&id, mode);
    see_other("/", cookie)
}

pub async fn send_otp(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    let values = posted(form);
    let (id, cookie) = flow_id(&req, &state);
    let mode = state.flows.get(&id);

    let email = match mode.prepare_send(values.get("email")) {
        Ok(email) => email,
        Err(err) => {
            let notice = Some(Notice::error(err.to_string()));
            return Rendered { notice, ..Rendered::new(&mode, &values) }
                .respond(StatusCode::UNPROCESSABLE_ENTITY, cookie);
        }
    };

    match state.api.send_otp(&email).await {
        Ok(()) => {
            let mode = mode.code_sent(email);
            state.flows.put(&id, mode.clone());
            let notice = Some(Notice::info("OTP sent to email."));
            Rendered { notice, ..Rendered::new(&mode, &values) }.respond(StatusCode::OK, cookie)
        }
        Err(err) => {
            warn!(error = %err, "sending verification code failed");
            let notice = Some(Notice::error(err.user_message("Failed to send OTP")));
            Rendered { notice, ..Rendered::new(&mode, &values) }.respond(StatusCode::OK, cookie)
        }
    }
}

pub async fn verify_otp(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    let values = posted(form);
    let (id, cookie) = flow_id(&req, &state);
    let mode = state.flows.get(&id);

    let (email, code) = match mode.prepare_verify(values.get(OTP_FIELD)) {
        Ok(pair) => pair,
        Err(err) => {
            let notice = Some(Notice::error(err.to_string()));
            return Rendered { notice, ..Rendered::new(&mode, &values) }
                .respond(StatusCode::UNPROCESSABLE_ENTITY, cookie);
        }
    };

    let verified = match state.api.verify_otp(&email, &code).await {
        Ok(()) => mode.clone().code_accepted().map_err(|err| err.to_string()),
        Err(err) => {
            warn!(error = %err, "verification code rejected");
            Err(err.user_message("Invalid OTP"))
        }
    };

    match verified {
        Ok(next) => {
            state.flows.put(&id, next.clone());
            let notice = Some(Notice::success("Email verified successfully."));
            Rendered { notice, ..Rendered::new(&next, &values) }.respond(StatusCode::OK, cookie)
        }
        Err(message) => {
            let notice = Some(Notice::error(message));
            Rendered { notice, ..Rendered::new(&mode, &values) }.respond(StatusCode::OK, cookie)
        }
    }
}

/// Stores the session, ends the sign-up flow and heads to the landing page.
fn signed_in(
    req: &HttpRequest,
    state: &AppState,
    session: &Session,
    res: LoginResponse,
    greeting: String,
) -> Result<HttpResponse, AppError> {
    let user = SessionUser::from(res);
    info!(user_id = user.user_id, role = ?user.role, "user signed in");

    let landing = landing_route(user.role);
    let next = session.dispatch(SessionAction::LoginSuccess(user));
    let mut cookies = vec![
        state.sessions.cookie(&next)?,
        flash_cookie(&Notice::success(greeting), state.sessions.is_secure())?,
    ];
    if let Some(flow) = req.cookie(FLOW_COOKIE) {
        state.flows.remove(flow.value());
        cookies.push(removal_cookie(FLOW_COOKIE));
    }
    Ok(see_other(landing, cookies))
}

pub async fn login(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let values = posted(form);
    let mode = AuthMode::Login;
    if let Err(errors) = validate(mode.fields(), &values) {
        return Ok(Rendered { errors: Some(&errors), ..Rendered::new(&mode, &values) }
            .respond(StatusCode::UNPROCESSABLE_ENTITY, None));
    }

    match state.api.login(&login_request(&values)).await {
        Ok(res) => {
            let greeting = format!("Login successful! Hello {}!", res.username);
            signed_in(&req, &state, &session, res, greeting)
        }
        Err(err) => {
            warn!(error = %err, "login failed");
            let message = err.user_message(FALLBACK_MESSAGE);
            Ok(Rendered { message: Some(&message), ..Rendered::new(&mode, &values) }
                .respond(StatusCode::OK, None))
        }
    }
}

pub async fn register(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let values = posted(form);
    let (id, cookie) = flow_id(&req, &state);
    let mode = state.flows.get(&id);

    let request = validate(mode.fields(), &values).and_then(|()| register_request(&values));
    let request = match request {
        Ok(request) => request,
        Err(errors) => {
            return Ok(Rendered { errors: Some(&errors), ..Rendered::new(&mode, &values) }
                .respond(StatusCode::UNPROCESSABLE_ENTITY, cookie));
        }
    };
    if let Err(err) = mode.ensure_verified(&request.email) {
        let notice = Some(Notice::error(err.to_string()));
        return Ok(Rendered { notice, ..Rendered::new(&mode, &values) }
            .respond(StatusCode::UNPROCESSABLE_ENTITY, cookie));
    }

    let registered = match state.api.register(&request).await {
        Ok(registered) => registered,
        Err(err) => {
            warn!(error = %err, "registration failed");
            let message = err.user_message(FALLBACK_MESSAGE);
            return Ok(Rendered { message: Some(&message), ..Rendered::new(&mode, &values) }
                .respond(StatusCode::OK, cookie));
        }
    };
    info!(role = %registered.role, "user registered");

    let credentials = LoginRequest { email: request.email, password: request.password };
    match state.api.login(&credentials).await {
        Ok(res) => signed_in(&req, &state, &session, res, "User Registered Successfully".to_string()),
        Err(err) => {
            // The account exists; let the user sign in by hand.
            warn!(error = %err, "sign-in after registration failed");
            state.flows.put(&id, AuthMode::Login);
            let flash = flash_cookie(
                &Notice::success("User Registered Successfully"),
                state.sessions.is_secure(),
            )?;
            Ok(see_other("/", cookie.into_iter().chain(Some(flash))))
        }
    }
}

pub async fn logout(session: Session, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let next = session.dispatch(SessionAction::Logout);
    let cookies = [
        state.sessions.cookie(&next)?,
        flash_cookie(&Notice::success("Logged out successfully!"), state.sessions.is_secure())?,
    ];
    Ok(see_other("/", cookies))
}
