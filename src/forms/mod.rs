pub mod auth;
pub mod guide;
pub mod profile;
pub mod restaurant;

use std::borrow::Cow;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::services::ProfileKind;
use crate::validation::{FormField, FormValues};

pub use guide::GuideSchema;
pub use restaurant::RestaurantSchema;

/// Static description of one role's profile form: its field set, the wire
/// type, and the conversion between posted values and that type.
pub trait ProfileSchema: 'static {
    type Field: FormField;
    type Profile: Serialize + DeserializeOwned + Clone + Send + 'static;

    const KIND: ProfileKind;
    const NOUN: &'static str;

    fn is_approved(profile: &Self::Profile) -> bool;

    fn to_values(profile: &Self::Profile) -> FormValues;

    /// Builds the outgoing profile from values that passed validation. The
    /// approval flag is always false.
    fn from_values(values: &FormValues) -> Result<Self::Profile, ValidationErrors>;

    fn blank_values() -> FormValues {
        FormValues::new()
    }
}

pub(crate) fn invalid<F: FormField>(field: F) -> ValidationErrors {
    let descriptor = field.descriptor();
    let mut errors = ValidationErrors::new();
    errors.add(
        descriptor.name,
        ValidationError::new("invalid")
            .with_message(Cow::Owned(format!("{} is invalid", descriptor.label))),
    );
    errors
}

pub(crate) fn parse_field<T: FromStr, F: FormField>(
    values: &FormValues,
    field: F,
) -> Result<T, ValidationErrors> {
    values
        .trimmed(field.name())
        .parse::<T>()
        .map_err(|_| invalid(field))
}

pub(crate) fn parse_optional<T: FromStr, F: FormField>(
    values: &FormValues,
    field: F,
) -> Result<Option<T>, ValidationErrors> {
    if values.trimmed(field.name()).is_empty() {
        return Ok(None);
    }
    parse_field(values, field).map(Some)
}

pub(crate) fn text<F: FormField>(values: &FormValues, field: F) -> String {
    values.trimmed(field.name()).to_string()
}
