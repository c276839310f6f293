use validator::ValidationErrors;

use crate::forms::{parse_field, parse_optional, text, ProfileSchema};
use crate::models::GuideProfile;
use crate::services::ProfileKind;
use crate::validation::{is_phone_number, FieldDescriptor, FormField, FormValues, Rule, Widget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideField {
    Name,
    Experience,
    Language,
    Bio,
    Latitude,
    Longitude,
    LicenseNumber,
    Available,
    Phone,
}

const NAME: FieldDescriptor = FieldDescriptor {
    name: "guide_name",
    label: "Guide name",
    widget: Widget::Text,
    rules: &[Rule::Required("Guide name is required")],
};

const EXPERIENCE: FieldDescriptor = FieldDescriptor {
    name: "experience",
    label: "Experience (years)",
    widget: Widget::Number,
    rules: &[
        Rule::Required("Experience is required"),
        Rule::Integer("Experience must be a whole number"),
        Rule::Min(0.0, "Experience cannot be negative"),
    ],
};

const LANGUAGE: FieldDescriptor = FieldDescriptor {
    name: "language",
    label: "Language",
    widget: Widget::Text,
    rules: &[Rule::Required("Language is required")],
};

const BIO: FieldDescriptor = FieldDescriptor {
    name: "bio",
    label: "Bio",
    widget: Widget::Text,
    rules: &[
        Rule::Required("Bio is required"),
        Rule::MinLength(10, "Bio must be at least 10 characters"),
    ],
};

const LATITUDE: FieldDescriptor = FieldDescriptor {
    name: "latitude",
    label: "Latitude",
    widget: Widget::Number,
    rules: &[
        Rule::Number("Latitude must be a number"),
        Rule::Min(-90.0, "Latitude must be between -90 and 90"),
        Rule::Max(90.0, "Latitude must be between -90 and 90"),
    ],
};

const LONGITUDE: FieldDescriptor = FieldDescriptor {
    name: "longitude",
    label: "Longitude",
    widget: Widget::Number,
    rules: &[
        Rule::Number("Longitude must be a number"),
        Rule::Min(-180.0, "Longitude must be between -180 and 180"),
        Rule::Max(180.0, "Longitude must be between -180 and 180"),
    ],
};

const LICENSE_NUMBER: FieldDescriptor = FieldDescriptor {
    name: "license_number",
    label: "License number",
    widget: Widget::Text,
    rules: &[Rule::Required("License number is required")],
};

const AVAILABLE: FieldDescriptor = FieldDescriptor {
    name: "is_available",
    label: "Available",
    widget: Widget::Checkbox,
    rules: &[],
};

const PHONE: FieldDescriptor = FieldDescriptor {
    name: "phone_no",
    label: "Phone number",
    widget: Widget::Text,
    rules: &[
        Rule::Required("Phone number is required"),
        Rule::Pattern(is_phone_number, "Phone number must be exactly 10 digits"),
    ],
};

impl FormField for GuideField {
    const ALL: &'static [Self] = &[
        GuideField::Name,
        GuideField::Experience,
        GuideField::Language,
        GuideField::Bio,
        GuideField::Latitude,
        GuideField::Longitude,
        GuideField::LicenseNumber,
        GuideField::Available,
        GuideField::Phone,
    ];

    fn descriptor(self) -> &'static FieldDescriptor {
        match self {
            GuideField::Name => &NAME,
            GuideField::Experience => &EXPERIENCE,
            GuideField::Language => &LANGUAGE,
            GuideField::Bio => &BIO,
            GuideField::Latitude => &LATITUDE,
            GuideField::Longitude => &LONGITUDE,
            GuideField::LicenseNumber => &LICENSE_NUMBER,
            GuideField::Available => &AVAILABLE,
            GuideField::Phone => &PHONE,
        }
    }
}

pub struct GuideSchema;

impl ProfileSchema for GuideSchema {
    type Field = GuideField;
    type Profile = GuideProfile;

    const KIND: ProfileKind = ProfileKind::Guide;
    const NOUN: &'static str = "Guide";

    fn is_approved(profile: &GuideProfile) -> bool {
        profile.approved
    }

    fn to_values(profile: &GuideProfile) -> FormValues {
        let mut values = FormValues::new();
        values.set(NAME.name, profile.name.as_str());
        values.set(EXPERIENCE.name, profile.experience.to_string());
        values.set(LANGUAGE.name, profile.language.as_str());
        values.set(BIO.name, profile.bio.as_str());
        if let Some(lat) = profile.latitude {
            values.set(LATITUDE.name, lat.to_string());
        }
        if let Some(lng) = profile.longitude {
            values.set(LONGITUDE.name, lng.to_string());
        }
        values.set(LICENSE_NUMBER.name, profile.license_number.as_str());
        values.set_checked(AVAILABLE.name, profile.is_available);
        values.set(PHONE.name, profile.phone_no.as_str());
        values
    }

    fn from_values(values: &FormValues) -> Result<GuideProfile, ValidationErrors> {
        Ok(GuideProfile {
            name: text(values, GuideField::Name),
            experience: parse_field(values, GuideField::Experience)?,
            language: text(values, GuideField::Language),
            bio: text(values, GuideField::Bio),
            latitude: parse_optional(values, GuideField::Latitude)?,
            longitude: parse_optional(values, GuideField::Longitude)?,
            license_number: text(values, GuideField::LicenseNumber),
            is_available: values.is_checked(AVAILABLE.name),
            phone_no: text(values, GuideField::Phone),
            approved: false,
        })
    }

    fn blank_values() -> FormValues {
        let mut values = FormValues::new();
        values.set_checked(AVAILABLE.name, true);
        values
    }
}
