use validator::ValidationErrors;

use crate::forms::{invalid, parse_field, text, ProfileSchema};
use crate::models::{FoodType, RestaurantProfile};
use crate::services::ProfileKind;
use crate::validation::{
    is_phone_number, Choice, FieldDescriptor, FormField, FormValues, Rule, Widget,
};

pub const FOOD_TYPES: &[Choice] = &[
    Choice { value: "VEG", label: "Veg" },
    Choice { value: "NON_VEG", label: "Non Veg" },
    Choice { value: "BOTH", label: "Both" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestaurantField {
    Name,
    Rating,
    LocationLink,
    FssaiLicense,
    OpenTime,
    CloseTime,
    Description,
    Phone,
    AverageCost,
    FoodType,
}

const NAME: FieldDescriptor = FieldDescriptor {
    name: "resto_name",
    label: "Restaurant name",
    widget: Widget::Text,
    rules: &[Rule::Required("Restaurant name is required")],
};

const RATING: FieldDescriptor = FieldDescriptor {
    name: "rating",
    label: "Rating",
    widget: Widget::Number,
    rules: &[
        Rule::Required("Rating is required"),
        Rule::Number("Rating must be a number"),
        Rule::Min(0.0, "Rating cannot be negative"),
        Rule::Max(5.0, "Rating cannot be more than 5"),
    ],
};

const LOCATION_LINK: FieldDescriptor = FieldDescriptor {
    name: "location_link",
    label: "Location link",
    widget: Widget::Url,
    rules: &[
        Rule::Required("Location link is required"),
        Rule::Url("Enter a valid URL"),
    ],
};

const FSSAI_LICENSE: FieldDescriptor = FieldDescriptor {
    name: "fssai_license",
    label: "FSSAI license",
    widget: Widget::Text,
    rules: &[Rule::Required("FSSAI License is required")],
};

const OPEN_TIME: FieldDescriptor = FieldDescriptor {
    name: "open_time",
    label: "Opening time",
    widget: Widget::Time,
    rules: &[
        Rule::Required("Opening time is required"),
        Rule::TimeOfDay("Opening time must look like HH:MM"),
    ],
};

const CLOSE_TIME: FieldDescriptor = FieldDescriptor {
    name: "close_time",
    label: "Closing time",
    widget: Widget::Time,
    rules: &[
        Rule::Required("Closing time is required"),
        Rule::TimeOfDay("Closing time must look like HH:MM"),
    ],
};

const DESCRIPTION: FieldDescriptor = FieldDescriptor {
    name: "description",
    label: "Description",
    widget: Widget::Text,
    rules: &[
        Rule::Required("Description is required"),
        Rule::MinLength(10, "Description must be at least 10 characters"),
    ],
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

const AVERAGE_COST: FieldDescriptor = FieldDescriptor {
    name: "average_cost",
    label: "Average cost",
    widget: Widget::Number,
    rules: &[
        Rule::Required("Average cost is required"),
        Rule::Number("Average cost must be a number"),
        Rule::Min(1.0, "Average cost must be at least 1"),
    ],
};

const FOOD_TYPE: FieldDescriptor = FieldDescriptor {
    name: "food_type",
    label: "Food type",
    widget: Widget::Select(FOOD_TYPES),
    rules: &[
        Rule::Required("Food type is required"),
        Rule::OneOf(FOOD_TYPES, "Select a valid food type"),
    ],
};

impl FormField for RestaurantField {
    const ALL: &'static [Self] = &[
        RestaurantField::Name,
        RestaurantField::Rating,
        RestaurantField::LocationLink,
        RestaurantField::FssaiLicense,
        RestaurantField::OpenTime,
        RestaurantField::CloseTime,
        RestaurantField::Description,
        RestaurantField::Phone,
        RestaurantField::AverageCost,
        RestaurantField::FoodType,
    ];

    fn descriptor(self) -> &'static FieldDescriptor {
        match self {
            RestaurantField::Name => &NAME,
            RestaurantField::Rating => &RATING,
            RestaurantField::LocationLink => &LOCATION_LINK,
            RestaurantField::FssaiLicense => &FSSAI_LICENSE,
            RestaurantField::OpenTime => &OPEN_TIME,
            RestaurantField::CloseTime => &CLOSE_TIME,
            RestaurantField::Description => &DESCRIPTION,
            RestaurantField::Phone => &PHONE,
            RestaurantField::AverageCost => &AVERAGE_COST,
            RestaurantField::FoodType => &FOOD_TYPE,
        }
    }
}

pub struct RestaurantSchema;

impl ProfileSchema for RestaurantSchema {
    type Field = RestaurantField;
    type Profile = RestaurantProfile;

    const KIND: ProfileKind = ProfileKind::Restaurant;
    const NOUN: &'static str = "Restaurant";

    fn is_approved(profile: &RestaurantProfile) -> bool {
        profile.approved
    }

    fn to_values(profile: &RestaurantProfile) -> FormValues {
        let mut values = FormValues::new();
        values.set(NAME.name, profile.name.as_str());
        values.set(RATING.name, profile.rating.to_string());
        values.set(LOCATION_LINK.name, profile.location_link.as_str());
        values.set(FSSAI_LICENSE.name, profile.fssai_license.as_str());
        values.set(OPEN_TIME.name, profile.open_time.as_str());
        values.set(CLOSE_TIME.name, profile.close_time.as_str());
        values.set(DESCRIPTION.name, profile.description.as_str());
        values.set(PHONE.name, profile.phone_no.as_str());
        values.set(AVERAGE_COST.name, profile.average_cost.to_string());
        values.set(
            FOOD_TYPE.name,
            profile.food_type.map(FoodType::as_str).unwrap_or(""),
        );
        values
    }

    fn from_values(values: &FormValues) -> Result<RestaurantProfile, ValidationErrors> {
        let food_type: FoodType = values
            .trimmed(FOOD_TYPE.name)
            .parse()
            .map_err(|_| invalid(RestaurantField::FoodType))?;

        Ok(RestaurantProfile {
            name: text(values, RestaurantField::Name),
            rating: parse_field(values, RestaurantField::Rating)?,
            location_link: text(values, RestaurantField::LocationLink),
            fssai_license: text(values, RestaurantField::FssaiLicense),
            open_time: text(values, RestaurantField::OpenTime),
            close_time: text(values, RestaurantField::CloseTime),
            description: text(values, RestaurantField::Description),
            phone_no: text(values, RestaurantField::Phone),
            average_cost: parse_field(values, RestaurantField::AverageCost)?,
            food_type: Some(food_type),
            approved: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::validation::{field_message, validate};

    #[fixture]
    fn valid_values() -> FormValues {
        FormValues::from([
            ("resto_name", "Spice Route"),
            ("rating", "4.5"),
            ("location_link", "https://maps.example.com/spice-route"),
            ("fssai_license", "FSSAI-11223344"),
            ("open_time", "09:00"),
            ("close_time", "22:30"),
            ("description", "Coastal thalis and seafood"),
            ("phone_no", "9123456780"),
            ("average_cost", "650"),
            ("food_type", "NON_VEG"),
        ])
    }

    #[rstest]
    fn test_valid_restaurant_passes(valid_values: FormValues) {
        assert!(validate(RestaurantField::ALL, &valid_values).is_ok());
        let profile = RestaurantSchema::from_values(&valid_values).unwrap();
        assert_eq!(profile.rating, 4.5);
        assert_eq!(profile.average_cost, 650.0);
        assert_eq!(profile.food_type, Some(FoodType::NonVeg));
        assert!(!profile.approved);
    }

    #[rstest]
    #[case("rating", "-1", "Rating cannot be negative")]
    #[case("rating", "5.1", "Rating cannot be more than 5")]
    #[case("location_link", "spice route", "Enter a valid URL")]
    #[case("average_cost", "0.5", "Average cost must be at least 1")]
    #[case("food_type", "VEGAN", "Select a valid food type")]
    #[case("food_type", "", "Food type is required")]
    #[case("description", "Too short", "Description must be at least 10 characters")]
    #[case("close_time", "late", "Closing time must look like HH:MM")]
    #[case("phone_no", "912345678", "Phone number must be exactly 10 digits")]
    fn test_field_errors(
        mut valid_values: FormValues,
        #[case] field: &str,
        #[case] value: &str,
        #[case] message: &str,
    ) {
        valid_values.set(field, value);
        let errors = validate(RestaurantField::ALL, &valid_values).unwrap_err();
        assert_eq!(field_message(&errors, field).as_deref(), Some(message));
    }

    #[test]
    fn test_missing_food_type_renders_empty_choice() {
        let profile = RestaurantProfile {
            name: "Spice Route".into(),
            rating: 4.0,
            location_link: "https://maps.example.com/x".into(),
            fssai_license: "F-1".into(),
            open_time: "09:00".into(),
            close_time: "21:00".into(),
            description: "Coastal kitchen".into(),
            phone_no: "9123456780".into(),
            average_cost: 500.0,
            food_type: None,
            approved: true,
        };
        let values = RestaurantSchema::to_values(&profile);
        assert_eq!(values.get("food_type"), "");
        assert_eq!(values.get("average_cost"), "500");
    }

    #[test]
    fn test_select_widget_carries_choices() {
        let descriptor = RestaurantField::FoodType.descriptor();
        assert_eq!(descriptor.widget, Widget::Select(FOOD_TYPES));
        assert_eq!(RestaurantField::OpenTime.descriptor().widget, Widget::Time);
    }
}
