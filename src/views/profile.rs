use std::fmt::Write;

use validator::ValidationErrors;

use crate::flash::Notice;
use crate::forms::profile::{ProfileController, SummaryAction};
use crate::forms::ProfileSchema;
use crate::validation::{FieldDescriptor, FormField, FormValues, Widget};
use crate::views::{escape, field, inline_error, layout};

fn heading<S: ProfileSchema>(controller: &ProfileController<S>) -> String {
    let verb = if controller.profile().is_some() { "Update" } else { "Create" };
    format!("{} Your {} Profile", verb, S::NOUN)
}

fn status<S: ProfileSchema>(controller: &ProfileController<S>) -> &'static str {
    if controller.is_approved() {
        "Approved"
    } else {
        "Pending approval"
    }
}

pub fn summary_page<S: ProfileSchema>(controller: &ProfileController<S>, notice: Option<&Notice>) -> String {
    let route = S::KIND.route();
    let title = heading(controller);
    let mut body = format!("<h2>{}</h2>", escape(&title));
    if controller.profile().is_some() {
        let _ = write!(body, "<p>Status: <strong>{}</strong></p>", status(controller));
    }

    body.push_str("<div class=\"actions\">");
    for action in controller.actions() {
        let _ = match action {
            SummaryAction::Create | SummaryAction::Update => write!(
                body,
                "<a class=\"button\" href=\"{route}/edit\">{}</a> ",
                action.label()
            ),
            SummaryAction::View => write!(
                body,
                "<a class=\"button\" href=\"{route}/view\">{}</a> ",
                action.label()
            ),
            SummaryAction::Logout => write!(
                body,
                "<form method=\"post\" action=\"/logout\"><button type=\"submit\">{}</button></form>",
                action.label()
            ),
        };
    }
    body.push_str("</div>");

    layout(&title, notice, &body)
}

/// What the editor shows besides the field values.
pub struct EditorState<'a> {
    pub errors: Option<&'a ValidationErrors>,
    pub message: Option<&'a str>,
}

pub fn form_page<S: ProfileSchema>(
    controller: &ProfileController<S>,
    values: &FormValues,
    state: &EditorState<'_>,
) -> String {
    let route = S::KIND.route();
    let title = heading(controller);
    let submit = if controller.profile().is_some() {
        format!("Update {}", S::NOUN)
    } else {
        format!("Add {}", S::NOUN)
    };

    let mut body = format!("<h2>{}</h2>", escape(&title));
    if let Some(message) = state.message {
        body.push_str(&inline_error(message));
    }
    let _ = write!(body, "<form method=\"post\" action=\"{route}\">");
    for profile_field in S::Field::ALL {
        body.push_str(&field(profile_field.descriptor(), values, state.errors));
    }
    let _ = write!(
        body,
        "<button type=\"submit\">{}</button> <a class=\"button\" href=\"{route}\">Cancel</a></form>",
        escape(&submit)
    );

    layout(&title, None, &body)
}

/// Read-only card. Falls back to the summary when there is no profile.
pub fn profile_card<S: ProfileSchema>(controller: &ProfileController<S>) -> String {
    let Some(profile) = controller.profile() else {
        return summary_page(controller, None);
    };
    let route = S::KIND.route();
    let values = S::to_values(profile);

    let title = format!("Your {} Profile", S::NOUN);
    let mut body = format!("<h2>{}</h2><dl>", escape(&title));
    for profile_field in S::Field::ALL {
        let descriptor = profile_field.descriptor();
        let _ = write!(
            body,
            "<dt>{}</dt><dd>{}</dd>",
            escape(descriptor.label),
            escape(&display_value(descriptor, &values))
        );
    }
    let _ = write!(
        body,
        "<dt>Status</dt><dd>{}</dd></dl><a class=\"button\" href=\"{route}\">Back</a>",
        status(controller)
    );

    layout(&title, None, &body)
}

fn display_value(descriptor: &FieldDescriptor, values: &FormValues) -> String {
    let raw = values.trimmed(descriptor.name);
    match descriptor.widget {
        Widget::Checkbox if values.is_checked(descriptor.name) => "Yes".to_string(),
        Widget::Checkbox => "No".to_string(),
        Widget::Select(choices) => choices
            .iter()
            .find(|c| c.value == raw)
            .map(|c| c.label)
            .unwrap_or(raw)
            .to_string(),
        _ if raw.is_empty() => "-".to_string(),
        _ => raw.to_string(),
    }
}
