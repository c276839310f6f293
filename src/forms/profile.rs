use std::marker::PhantomData;

use serde_json::Value;
use tracing::warn;
use validator::ValidationErrors;

use crate::forms::ProfileSchema;
use crate::services::{ApiError, SaveMode};
use crate::validation::{validate, FormField, FormValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Summary,
    Editing,
    Viewing,
}

/// Buttons offered on the profile summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryAction {
    Create,
    Update,
    View,
    Logout,
}

impl SummaryAction {
    pub fn label(self) -> &'static str {
        match self {
            SummaryAction::Create => "Create Profile",
            SummaryAction::Update => "Update Profile",
            SummaryAction::View => "View Profile",
            SummaryAction::Logout => "Logout",
        }
    }
}

/// A validated profile ready to be sent, and whether it creates or replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission<P> {
    pub mode: SaveMode,
    pub profile: P,
}

/// Profile page state for one role: what the backend holds and which view
/// is showing.
pub struct ProfileController<S: ProfileSchema> {
    profile: Option<S::Profile>,
    view: ViewState,
    schema: PhantomData<S>,
}

impl<S: ProfileSchema> ProfileController<S> {
    /// Starts on the summary. A failed or unreadable fetch means no profile.
    pub fn mount(fetched: Result<Option<Value>, ApiError>) -> Self {
        let profile = match fetched {
            Ok(Some(body)) => match serde_json::from_value::<S::Profile>(body) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    warn!(kind = ?S::KIND, error = %err, "ignoring unreadable profile");
                    None
                }
            },
            Ok(None) | Err(ApiError::NotFound) => None,
            Err(err) => {
                warn!(kind = ?S::KIND, error = %err, "profile fetch failed, offering create");
                None
            }
        };
        Self::with_profile(profile)
    }

    pub fn with_profile(profile: Option<S::Profile>) -> Self {
        ProfileController {
            profile,
            view: ViewState::Summary,
            schema: PhantomData,
        }
    }

    pub fn profile(&self) -> Option<&S::Profile> {
        self.profile.as_ref()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn is_approved(&self) -> bool {
        self.profile.as_ref().is_some_and(S::is_approved)
    }

    pub fn actions(&self) -> Vec<SummaryAction> {
        match &self.profile {
            None => vec![SummaryAction::Create],
            Some(profile) if S::is_approved(profile) => vec![
                SummaryAction::Update,
                SummaryAction::View,
                SummaryAction::Logout,
            ],
            Some(_) => vec![SummaryAction::View, SummaryAction::Logout],
        }
    }

    /// Editing is only offered when the summary shows Create or Update.
    pub fn can_edit(&self) -> bool {
        self.actions()
            .iter()
            .any(|a| matches!(a, SummaryAction::Create | SummaryAction::Update))
    }

    /// Stays on the summary when neither Create nor Update is offered.
    pub fn open_editor(self) -> Self {
        let view = if self.can_edit() {
            ViewState::Editing
        } else {
            ViewState::Summary
        };
        Self { view, ..self }
    }

    /// Falls back to the summary when there is nothing to show.
    pub fn open_viewer(self) -> Self {
        let view = if self.profile.is_some() {
            ViewState::Viewing
        } else {
            ViewState::Summary
        };
        Self { view, ..self }
    }

    /// Values the form opens with.
    pub fn initial_values(&self) -> FormValues {
        match &self.profile {
            Some(profile) => S::to_values(profile),
            None => S::blank_values(),
        }
    }

    pub fn save_mode(&self) -> SaveMode {
        if self.profile.is_some() {
            SaveMode::Update
        } else {
            SaveMode::Create
        }
    }

    pub fn submission(&self, values: &FormValues) -> Result<Submission<S::Profile>, ValidationErrors> {
        validate(S::Field::ALL, values)?;
        Ok(Submission {
            mode: self.save_mode(),
            profile: S::from_values(values)?,
        })
    }

    /// The backend accepted `profile`; back to the summary with it.
    pub fn submitted(self, profile: S::Profile) -> Self {
        ProfileController {
            profile: Some(profile),
            view: ViewState::Summary,
            schema: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::forms::{GuideSchema, RestaurantSchema};
    use crate::models::GuideProfile;

    fn guide_body(approved: bool) -> Value {
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

    #[fixture]
    fn guide_values() -> FormValues {
        FormValues::from([
            ("guide_name", "Asha Patil"),
            ("experience", "7"),
            ("language", "Marathi, Hindi"),
            ("bio", "Fort treks and old city walks"),
            ("license_number", "MH-GD-0042"),
            ("is_available", "on"),
            ("phone_no", "9876543210"),
        ])
    }

    #[rstest]
    #[case(None, vec![SummaryAction::Create])]
    #[case(Some(false), vec![SummaryAction::View, SummaryAction::Logout])]
    #[case(Some(true), vec![SummaryAction::Update, SummaryAction::View, SummaryAction::Logout])]
    fn test_summary_actions(#[case] approved: Option<bool>, #[case] expected: Vec<SummaryAction>) {
        let controller = ProfileController::<GuideSchema>::mount(Ok(approved.map(guide_body)));
        assert_eq!(controller.view(), ViewState::Summary);
        assert_eq!(controller.actions(), expected);
    }

    #[rstest]
    #[case(Err(ApiError::NotFound))]
    #[case(Err(ApiError::Rejected { status: 500, message: None }))]
    #[case(Ok(Some(json!({"unexpected": true}))))]
    fn test_failed_fetch_offers_create(#[case] fetched: Result<Option<Value>, ApiError>) {
        let controller = ProfileController::<RestaurantSchema>::mount(fetched);
        assert!(controller.profile().is_none());
        assert_eq!(controller.actions(), vec![SummaryAction::Create]);
        assert_eq!(controller.save_mode(), SaveMode::Create);
    }

    #[rstest]
    fn test_update_resets_approval(guide_values: FormValues) {
        let controller = ProfileController::<GuideSchema>::mount(Ok(Some(guide_body(true))));
        assert!(controller.is_approved());

        let submission = controller.submission(&guide_values).unwrap();
        assert_eq!(submission.mode, SaveMode::Update);
        assert!(!submission.profile.approved);
        assert_eq!(submission.profile.experience, 7);

        let controller = controller.submitted(submission.profile);
        assert_eq!(controller.actions(), vec![SummaryAction::View, SummaryAction::Logout]);
        assert!(!controller.can_edit());
        assert_eq!(controller.open_editor().view(), ViewState::Summary);
    }

    #[rstest]
    fn test_invalid_submission_is_not_built(mut guide_values: FormValues) {
        guide_values.set("bio", "short");
        let controller = ProfileController::<GuideSchema>::with_profile(None);
        let errors = controller.submission(&guide_values).unwrap_err();
        assert!(errors.field_errors().contains_key("bio"));
    }

    #[test]
    fn test_view_transitions() {
        let controller = ProfileController::<GuideSchema>::with_profile(None);
        assert_eq!(controller.open_viewer().view(), ViewState::Summary);

        let profile: GuideProfile = serde_json::from_value(guide_body(true)).unwrap();
        let controller = ProfileController::<GuideSchema>::with_profile(Some(profile));
        let controller = controller.open_editor();
        assert_eq!(controller.view(), ViewState::Editing);
        assert_eq!(controller.initial_values().get("guide_name"), "Asha Patil");
        assert_eq!(controller.open_viewer().view(), ViewState::Viewing);
    }

    #[test]
    fn test_blank_guide_form_defaults() {
        let controller = ProfileController::<GuideSchema>::with_profile(None);
        assert!(controller.initial_values().is_checked("is_available"));
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(SummaryAction::Create.label(), "Create Profile");
        assert_eq!(SummaryAction::Logout.label(), "Logout");
    }
}
