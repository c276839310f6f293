use thiserror::Error;
use validator::ValidationErrors;

use crate::forms::{invalid, text};
use crate::models::{LoginRequest, RegisterRequest, Role};
use crate::validation::{
    is_strong_password, Choice, FieldDescriptor, FormField, FormValues, Rule, Widget,
};

pub const ROLES: &[Choice] = &[
    Choice { value: "RESTAURANT", label: "Restaurant" },
    Choice { value: "GUIDE", label: "Guide" },
];

pub const OTP_FIELD: &str = "otp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Email,
    Password,
    Role,
}

const USERNAME: FieldDescriptor = FieldDescriptor {
    name: "username",
    label: "Username",
    widget: Widget::Text,
    rules: &[Rule::Required("Username is required")],
};

const EMAIL: FieldDescriptor = FieldDescriptor {
    name: "email",
    label: "Email",
    widget: Widget::Email,
    rules: &[
        Rule::Required("Email is required"),
        Rule::Email("Invalid email"),
    ],
};

const PASSWORD: FieldDescriptor = FieldDescriptor {
    name: "password",
    label: "Password",
    widget: Widget::Password,
    rules: &[
        Rule::Required("Password is required"),
        Rule::MinLength(8, "Minimum 8 characters"),
        Rule::Pattern(
            is_strong_password,
            "Must include at least one uppercase letter, one number, and one special character",
        ),
    ],
};

const ROLE: FieldDescriptor = FieldDescriptor {
    name: "role",
    label: "Role",
    widget: Widget::Select(ROLES),
    rules: &[
        Rule::Required("Role is required"),
        Rule::OneOf(ROLES, "Select a valid role"),
    ],
};

impl FormField for AuthField {
    const ALL: &'static [Self] = &[
        AuthField::Username,
        AuthField::Email,
        AuthField::Password,
        AuthField::Role,
    ];

    fn descriptor(self) -> &'static FieldDescriptor {
        match self {
            AuthField::Username => &USERNAME,
            AuthField::Email => &EMAIL,
            AuthField::Password => &PASSWORD,
            AuthField::Role => &ROLE,
        }
    }
}

const LOGIN_FIELDS: &[AuthField] = &[AuthField::Email, AuthField::Password];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthFlowError {
    #[error("Switch to sign up to verify an email")]
    NotSigningUp,
    #[error("{0}")]
    InvalidEmail(&'static str),
    #[error("Send a verification code to your email first")]
    CodeNotSent,
    #[error("Enter the code sent to your email")]
    MissingCode,
    #[error("Please verify your email before signing up.")]
    EmailNotVerified,
}

/// Email verification progress inside the sign-up form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OtpState {
    #[default]
    Unverified,
    Sent { email: String },
    Verified { email: String },
}

impl OtpState {
    /// A code went out to `email`. Resending restarts verification.
    pub fn sent(self, email: String) -> OtpState {
        OtpState::Sent { email }
    }

    pub fn accepted(self) -> Result<OtpState, AuthFlowError> {
        match self {
            OtpState::Sent { email } => Ok(OtpState::Verified { email }),
            _ => Err(AuthFlowError::CodeNotSent),
        }
    }

    pub fn pending_email(&self) -> Option<&str> {
        match self {
            OtpState::Sent { email } => Some(email.as_str()),
            _ => None,
        }
    }

    pub fn permits_registration(&self, email: &str) -> bool {
        match self {
            OtpState::Verified { email: verified } => verified.eq_ignore_ascii_case(email.trim()),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup(OtpState),
}

impl AuthMode {
    /// Switches between sign-in and sign-up. Verification never carries over.
    pub fn toggled(self) -> AuthMode {
        match self {
            AuthMode::Login => AuthMode::Signup(OtpState::Unverified),
            AuthMode::Signup(_) => AuthMode::Login,
        }
    }

    pub fn is_signup(&self) -> bool {
        matches!(self, AuthMode::Signup(_))
    }

    pub fn otp(&self) -> Option<&OtpState> {
        match self {
            AuthMode::Signup(otp) => Some(otp),
            AuthMode::Login => None,
        }
    }

    pub fn fields(&self) -> &'static [AuthField] {
        match self {
            AuthMode::Login => LOGIN_FIELDS,
            AuthMode::Signup(_) => AuthField::ALL,
        }
    }

    /// Checks that a code may be sent and returns the normalized address.
    pub fn prepare_send(&self, email: &str) -> Result<String, AuthFlowError> {
        if !self.is_signup() {
            return Err(AuthFlowError::NotSigningUp);
        }
        if let Some(rule) = EMAIL.first_violation(email) {
            return Err(AuthFlowError::InvalidEmail(rule.message()));
        }
        Ok(email.trim().to_string())
    }

    pub fn code_sent(self, email: String) -> AuthMode {
        match self {
            AuthMode::Signup(otp) => AuthMode::Signup(otp.sent(email)),
            AuthMode::Login => AuthMode::Login,
        }
    }

    /// Returns the email the code was sent to and the trimmed code.
    pub fn prepare_verify(&self, code: &str) -> Result<(String, String), AuthFlowError> {
        let otp = self.otp().ok_or(AuthFlowError::NotSigningUp)?;
        let email = otp.pending_email().ok_or(AuthFlowError::CodeNotSent)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(AuthFlowError::MissingCode);
        }
        Ok((email.to_string(), code.to_string()))
    }

    pub fn code_accepted(self) -> Result<AuthMode, AuthFlowError> {
        match self {
            AuthMode::Signup(otp) => otp.accepted().map(AuthMode::Signup),
            AuthMode::Login => Err(AuthFlowError::NotSigningUp),
        }
    }

    pub fn ensure_verified(&self, email: &str) -> Result<(), AuthFlowError> {
        match self.otp() {
            Some(otp) if otp.permits_registration(email) => Ok(()),
            Some(_) => Err(AuthFlowError::EmailNotVerified),
            None => Err(AuthFlowError::NotSigningUp),
        }
    }
}

pub fn login_request(values: &FormValues) -> LoginRequest {
    LoginRequest {
        email: text(values, AuthField::Email),
        password: values.get(PASSWORD.name).to_string(),
    }
}

pub fn register_request(values: &FormValues) -> Result<RegisterRequest, ValidationErrors> {
    let role: Role = values
        .trimmed(ROLE.name)
        .parse()
        .map_err(|_| invalid(AuthField::Role))?;

    Ok(RegisterRequest {
        username: text(values, AuthField::Username),
        email: text(values, AuthField::Email),
        password: values.get(PASSWORD.name).to_string(),
        role,
    })
}
