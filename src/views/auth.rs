use std::fmt::Write;

use validator::ValidationErrors;

use crate::flash::Notice;
use crate::forms::auth::{AuthField, AuthMode, OtpState, OTP_FIELD};
use crate::validation::{FormField, FormValues};
use crate::views::{escape, field, inline_error, layout};

/// Everything the sign-in/sign-up page shows.
pub struct EntryPage<'a> {
    pub mode: &'a AuthMode,
    pub values: &'a FormValues,
    pub errors: Option<&'a ValidationErrors>,
    /// Backend failure shown above the form.
    pub message: Option<&'a str>,
    pub notice: Option<&'a Notice>,
}

pub fn entry_page(page: &EntryPage<'_>) -> String {
    let (title, action, submit) = match page.mode {
        AuthMode::Login => ("Sign In", "/auth/login", "Sign In"),
        AuthMode::Signup(_) => ("Sign Up", "/auth/register", "Sign Up"),
    };

    let mut body = format!("<h2>{title}</h2>");
    if let Some(message) = page.message {
        body.push_str(&inline_error(message));
    }

    let _ = write!(body, "<form method=\"post\" action=\"{action}\">");
    for auth_field in page.mode.fields() {
        body.push_str(&field(auth_field.descriptor(), page.values, page.errors));
        if let (AuthField::Email, Some(otp)) = (auth_field, page.mode.otp()) {
            body.push_str(&otp_controls(otp));
        }
    }
    let _ = write!(body, "<button type=\"submit\">{submit}</button></form>");

    let (prompt, switch) = match page.mode {
        AuthMode::Login => ("Not a member? ", "Sign up"),
        AuthMode::Signup(_) => ("Already have an account? ", "Sign in"),
    };
    let _ = write!(
        body,
        "<form method=\"post\" action=\"/auth/toggle\"><p>{prompt}\
         <button class=\"link\" type=\"submit\">{switch}</button></p></form>"
    );

    layout(title, page.notice, &body)
}

fn otp_controls(otp: &OtpState) -> String {
    let send_label = match otp {
        OtpState::Unverified => "Verify Email",
        OtpState::Sent { .. } | OtpState::Verified { .. } => "Resend OTP",
    };
    let mut html = format!(
        "<button class=\"link\" type=\"submit\" formaction=\"/auth/send-otp\" formnovalidate>{send_label}</button>"
    );

    match otp {
        OtpState::Unverified => {}
        OtpState::Sent { email } => {
            let _ = write!(
                html,
                "<p>Code sent to {}</p>\
                 <input name=\"{OTP_FIELD}\" type=\"text\" inputmode=\"numeric\" autocomplete=\"one-time-code\" placeholder=\"Enter OTP\">\
                 <button class=\"link\" type=\"submit\" formaction=\"/auth/verify-otp\" formnovalidate>Submit OTP</button>",
                escape(email)
            );
        }
        OtpState::Verified { email } => {
            let _ = write!(html, "<p class=\"verified\">{} verified ✅</p>", escape(email));
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(mode: &AuthMode, values: &FormValues) -> String {
        entry_page(&EntryPage {
            mode,
            values,
            errors: None,
            message: None,
            notice: None,
        })
    }

    #[test]
    fn test_login_page() {
        let html = render(&AuthMode::Login, &FormValues::new());
        assert!(html.contains("action=\"/auth/login\""));
        assert!(!html.contains("name=\"username\""));
        assert!(!html.contains("Verify Email"));
        assert!(html.contains("Not a member?"));
    }

    #[test]
    fn test_signup_page_walks_otp_states() {
        let values = FormValues::from([("email", "sam@journey.example")]);

        let mode = AuthMode::Login.toggled();
        let html = render(&mode, &values);
        assert!(html.contains("action=\"/auth/register\""));
        assert!(html.contains("Verify Email"));
        assert!(!html.contains("name=\"otp\""));

        let mode = mode.code_sent("sam@journey.example".to_string());
        let html = render(&mode, &values);
        assert!(html.contains("Resend OTP"));
        assert!(html.contains("name=\"otp\""));

        let mode = mode.code_accepted().unwrap();
        let html = render(&mode, &values);
        assert!(html.contains("verified ✅"));
        assert!(!html.contains("name=\"otp\""));
    }

    #[test]
    fn test_backend_message_is_shown_inline() {
        let html = entry_page(&EntryPage {
            mode: &AuthMode::Login,
            values: &FormValues::new(),
            errors: None,
            message: Some("Invalid Credentials. Try again"),
            notice: None,
        });
        assert!(html.contains("<p class=\"inline-error\">Invalid Credentials. Try again</p>"));
    }
}
