use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Business role chosen at registration.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Guide,
    Restaurant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guide => "GUIDE",
            Role::Restaurant => "RESTAURANT",
        }
    }

    pub fn landing_route(self) -> &'static str {
        match self {
            Role::Guide => "/guide",
            Role::Restaurant => "/restaurant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "GUIDE" => Ok(Role::Guide),
            "RESTAURANT" => Ok(Role::Restaurant),
            other => Err(format!("unknown role `{}`", other)),
        }
    }
}

/// Where to send a user right after login or registration.
pub fn landing_route(role: Option<Role>) -> &'static str {
    role.map(Role::landing_route).unwrap_or("/")
}

#[derive(Debug, Serialize)]
pub struct OtpRequest<'a> {
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<&'a str>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginResponse {
    pub id: i64,
    pub role: String,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

// The backend echoes the saved user; only the role is relied upon.
#[derive(Debug, Deserialize, Clone)]
pub struct RegisterResponse {
    pub role: String,
}
