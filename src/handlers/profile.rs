use std::collections::HashMap;

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::{info, warn};

use crate::error::AppError;
use crate::flash::{take_flash, Notice};
use crate::forms::profile::{ProfileController, ViewState};
use crate::forms::ProfileSchema;
use crate::guard::Authenticated;
use crate::handlers::{html, see_other};
use crate::services::SaveMode;
use crate::session::SessionUser;
use crate::state::AppState;
use crate::validation::FormValues;
use crate::views::profile::{form_page, profile_card, summary_page, EditorState};

async fn load<S: ProfileSchema>(state: &AppState, user: &SessionUser) -> ProfileController<S> {
    ProfileController::mount(state.api.fetch_profile(S::KIND, user.user_id).await)
}

pub async fn summary<S: ProfileSchema>(
    req: HttpRequest,
    Authenticated(user): Authenticated,
    state: web::Data<AppState>,
) -> HttpResponse {
    let controller = load::<S>(&state, &user).await;
    let (notice, clear) = take_flash(&req);
    html(StatusCode::OK, summary_page(&controller, notice.as_ref()), clear)
}

pub async fn edit<S: ProfileSchema>(
    Authenticated(user): Authenticated,
    state: web::Data<AppState>,
) -> HttpResponse {
    let controller = load::<S>(&state, &user).await.open_editor();
    if controller.view() != ViewState::Editing {
        return see_other(S::KIND.route(), None);
    }
    let values = controller.initial_values();
    let editor = EditorState { errors: None, message: None };
    html(StatusCode::OK, form_page(&controller, &values, &editor), None)
}

pub async fn view<S: ProfileSchema>(
    Authenticated(user): Authenticated,
    state: web::Data<AppState>,
) -> HttpResponse {
    let controller = load::<S>(&state, &user).await.open_viewer();
    if controller.view() != ViewState::Viewing {
        return see_other(S::KIND.route(), None);
    }
    html(StatusCode::OK, profile_card(&controller), None)
}

pub async fn submit<S: ProfileSchema>(
    Authenticated(user): Authenticated,
    state: web::Data<AppState>,
    form: web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let values = FormValues::from(form.into_inner());
    let controller = load::<S>(&state, &user).await;
    if !controller.can_edit() {
        return Ok(see_other(S::KIND.route(), None));
    }

    let submission = match controller.submission(&values) {
        Ok(submission) => submission,
        Err(errors) => {
            let editor = EditorState { errors: Some(&errors), message: None };
            return Ok(html(
                StatusCode::UNPROCESSABLE_ENTITY,
                form_page(&controller, &values, &editor),
                None,
            ));
        }
    };

    let payload = serde_json::to_value(&submission.profile)?;
    let saved = state
        .api
        .save_profile(S::KIND, user.user_id, submission.mode, &payload)
        .await;

    match saved {
        Ok(()) => {
            info!(kind = ?S::KIND, user_id = user.user_id, mode = ?submission.mode, "profile saved");
            let outcome = match submission.mode {
                SaveMode::Create => "Created",
                SaveMode::Update => "Updated",
            };
            let notice = Notice::success(format!("{} {}", S::NOUN, outcome));
            let controller = controller.submitted(submission.profile);
            Ok(html(StatusCode::OK, summary_page(&controller, Some(&notice)), None))
        }
        Err(err) => {
            warn!(kind = ?S::KIND, user_id = user.user_id, error = %err, "profile submit failed");
            let message = format!("Failed to submit {} profile", S::NOUN.to_lowercase());
            let editor = EditorState { errors: None, message: Some(&message) };
            Ok(html(
                StatusCode::BAD_GATEWAY,
                form_page(&controller.open_editor(), &values, &editor),
                None,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use rstest::rstest;
    use serde_json::Value;

    use crate::handlers::configure;
    use crate::services::{ApiError, ProfileKind, SaveMode};
    use crate::session::SessionUser;
    use crate::tests::helpers::{guide_profile, guide_user, location, signed_in, test_state, MockMarketplace};

    fn guide_form(bio: &'static str) -> [(&'static str, &'static str); 8] {
        [
            ("guide_name", "Asha Patil"),
            ("experience", "8"),
            ("language", "Marathi"),
            ("bio", bio),
            ("latitude", "18.52"),
            ("license_number", "MH-GD-0042"),
            ("is_available", "on"),
            ("phone_no", "9876543210"),
        ]
    }

    #[rstest]
    #[case("/guide")]
    #[case("/guide/edit")]
    #[case("/restaurant/view")]
    #[actix_web::test]
    async fn test_anonymous_is_sent_to_entry(#[case] uri: &str) {
        let app = test::init_service(
            App::new().app_data(test_state(MockMarketplace::new())).configure(configure),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/"));
    }

    // Tests updating an approved guide profile
    // Verifies:
    // - Existing profile selects the update endpoint
    // - Outgoing payload always carries approved = false
    // - Summary is rendered with the success notice
    #[rstest]
    #[actix_web::test]
    async fn test_update_sends_unapproved_profile(guide_user: SessionUser) {
        let sent: Arc<Mutex<Option<(SaveMode, Value)>>> = Arc::new(Mutex::new(None));
        let captured = sent.clone();

        let mut api = MockMarketplace::new();
        api.expect_fetch_profile()
            .returning(|kind, user_id| {
                assert_eq!((kind, user_id), (ProfileKind::Guide, 7));
                Ok(Some(guide_profile(true)))
            });
        api.expect_save_profile()
            .times(1)
            .returning(move |_, _, mode, profile| {
                *captured.lock().unwrap() = Some((mode, profile.clone()));
                Ok(())
            });
        let state = test_state(api);
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/guide")
            .cookie(signed_in(&state, guide_user))
            .set_form(guide_form("Fort treks and old city walks"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(body.contains("Guide Updated"));
        assert!(body.contains("Pending approval"));

        let (mode, payload) = sent.lock().unwrap().take().expect("profile sent");
        assert_eq!(mode, SaveMode::Update);
        assert_eq!(payload["approved"], Value::Bool(false));
        assert_eq!(payload["experience"], 8);
        assert_eq!(payload["guidename"], "Asha Patil");
    }

    #[rstest]
    #[actix_web::test]
    async fn test_short_bio_blocks_submission(guide_user: SessionUser) {
        let mut api = MockMarketplace::new();
        api.expect_fetch_profile().returning(|_, _| Err(ApiError::NotFound));
        api.expect_save_profile().never();
        let state = test_state(api);
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/guide")
            .cookie(signed_in(&state, guide_user))
            .set_form(guide_form("123456789"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(body.contains("Bio must be at least 10 characters"));
        assert!(body.contains("Add Guide"));
    }

    #[rstest]
    #[actix_web::test]
    async fn test_failed_submit_keeps_form_open(guide_user: SessionUser) {
        let mut api = MockMarketplace::new();
        api.expect_fetch_profile().returning(|_, _| Ok(None));
        api.expect_save_profile()
            .returning(|_, _, mode, _| {
                assert_eq!(mode, SaveMode::Create);
                Err(ApiError::Rejected { status: 500, message: None })
            });
        let state = test_state(api);
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/guide")
            .cookie(signed_in(&state, guide_user))
            .set_form(guide_form("Fort treks and old city walks"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(body.contains("Failed to submit guide profile"));
        assert!(body.contains("value=\"MH-GD-0042\""));
    }

    #[rstest]
    #[actix_web::test]
    async fn test_pending_profile_cannot_be_edited(guide_user: SessionUser) {
        let mut api = MockMarketplace::new();
        api.expect_fetch_profile().returning(|_, _| Ok(Some(guide_profile(false))));
        let state = test_state(api);
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/guide/edit")
            .cookie(signed_in(&state, guide_user))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), Some("/guide"));
    }

    #[rstest]
    #[actix_web::test]
    async fn test_fetch_failure_offers_create(guide_user: SessionUser) {
        let mut api = MockMarketplace::new();
        api.expect_fetch_profile()
            .returning(|_, _| Err(ApiError::Rejected { status: 503, message: None }));
        let state = test_state(api);
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/guide")
            .cookie(signed_in(&state, guide_user))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        assert!(body.contains("Create Profile"));
        assert!(!body.contains("Logout"));
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(
            App::new().app_data(test_state(MockMarketplace::new())).configure(configure),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "OK");
    }
}
