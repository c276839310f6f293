use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use validator::{ValidateEmail, ValidateUrl, ValidationError, ValidationErrors};

static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern compiles"));

const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// One entry of an enumerated choice set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

/// Input widget, derived from the declared value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    Text,
    Email,
    Password,
    Number,
    Url,
    Time,
    Checkbox,
    Select(&'static [Choice]),
}

#[derive(Clone, Copy)]
pub enum Rule {
    Required(&'static str),
    MinLength(usize, &'static str),
    Number(&'static str),
    Integer(&'static str),
    Min(f64, &'static str),
    Max(f64, &'static str),
    Pattern(fn(&str) -> bool, &'static str),
    Email(&'static str),
    Url(&'static str),
    OneOf(&'static [Choice], &'static str),
    TimeOfDay(&'static str),
}

impl Rule {
    fn code(&self) -> &'static str {
        match self {
            Rule::Required(_) => "required",
            Rule::MinLength(..) => "length",
            Rule::Number(_) | Rule::Integer(_) => "number",
            Rule::Min(..) | Rule::Max(..) => "range",
            Rule::Pattern(..) => "pattern",
            Rule::Email(_) => "email",
            Rule::Url(_) => "url",
            Rule::OneOf(..) => "choice",
            Rule::TimeOfDay(_) => "time",
        }
    }

    pub fn message(&self) -> &'static str {
        match *self {
            Rule::Required(m)
            | Rule::MinLength(_, m)
            | Rule::Number(m)
            | Rule::Integer(m)
            | Rule::Min(_, m)
            | Rule::Max(_, m)
            | Rule::Pattern(_, m)
            | Rule::Email(m)
            | Rule::Url(m)
            | Rule::OneOf(_, m)
            | Rule::TimeOfDay(m) => m,
        }
    }

    fn accepts(&self, value: &str) -> bool {
        match *self {
            Rule::Required(_) => !value.trim().is_empty(),
            Rule::MinLength(min, _) => value.trim().chars().count() >= min,
            Rule::Number(_) => parse_number(value).is_some(),
            Rule::Integer(_) => value.trim().parse::<i64>().is_ok(),
            // Unparseable numbers are reported by the Number rule.
            Rule::Min(min, _) => parse_number(value).map_or(true, |n| n >= min),
            Rule::Max(max, _) => parse_number(value).map_or(true, |n| n <= max),
            Rule::Pattern(predicate, _) => predicate(value),
            Rule::Email(_) => value.trim().validate_email(),
            Rule::Url(_) => value.trim().validate_url(),
            Rule::OneOf(choices, _) => choices.iter().any(|c| c.value == value.trim()),
            Rule::TimeOfDay(_) => parse_time(value).is_some(),
        }
    }
}

pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
    pub rules: &'static [Rule],
}

impl FieldDescriptor {
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required(_)))
    }

    /// First rule the value breaks. Blank optional fields are not checked.
    pub fn first_violation(&self, value: &str) -> Option<&'static Rule> {
        if value.trim().is_empty() && !self.is_required() {
            return None;
        }
        self.rules.iter().find(|rule| !rule.accepts(value))
    }
}

/// Fixed field set of one form. `ALL` is the render and validation order.
pub trait FormField: Copy + Eq + 'static {
    const ALL: &'static [Self];

    fn descriptor(self) -> &'static FieldDescriptor;

    fn name(self) -> &'static str {
        self.descriptor().name
    }
}

/// Raw values as posted by the browser, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn trimmed(&self, name: &str) -> &str {
        self.get(name).trim()
    }

    pub fn is_checked(&self, name: &str) -> bool {
        matches!(self.trimmed(name), "on" | "true")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn set_checked(&mut self, name: &str, checked: bool) {
        if checked {
            self.set(name, "true");
        } else {
            self.0.remove(name);
        }
    }
}

impl From<HashMap<String, String>> for FormValues {
    fn from(values: HashMap<String, String>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormValues {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

pub fn validate<F: FormField>(fields: &[F], values: &FormValues) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for field in fields {
        let descriptor = field.descriptor();
        if let Some(rule) = descriptor.first_violation(values.get(descriptor.name)) {
            errors.add(
                descriptor.name,
                ValidationError::new(rule.code()).with_message(Cow::Borrowed(rule.message())),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn field_message(errors: &ValidationErrors, name: &str) -> Option<String> {
    errors
        .field_errors()
        .get(name)
        .and_then(|errs| errs.first())
        .and_then(|err| err.message.as_ref())
        .map(|msg| msg.to_string())
}

pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

pub fn is_phone_number(value: &str) -> bool {
    PHONE_NUMBER.is_match(value)
}

/// Uppercase letter, digit and one of `@$!%*?&`, nothing outside letters,
/// digits and those specials. Length is checked separately.
pub fn is_strong_password(value: &str) -> bool {
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    allowed
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}
