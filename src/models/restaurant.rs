use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodType {
    Veg,
    NonVeg,
    Both,
}

impl FoodType {
    pub fn as_str(self) -> &'static str {
        match self {
            FoodType::Veg => "VEG",
            FoodType::NonVeg => "NON_VEG",
            FoodType::Both => "BOTH",
        }
    }
}

impl FromStr for FoodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "VEG" => Ok(FoodType::Veg),
            "NON_VEG" => Ok(FoodType::NonVeg),
            "BOTH" => Ok(FoodType::Both),
            other => Err(format!("unknown food type `{}`", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantProfile {
    #[serde(rename = "restoName")]
    pub name: String,
    pub rating: f64,
    pub location_link: String,
    pub fssai_license: String,
    pub open_time: String,
    pub close_time: String,
    pub description: String,
    pub phone_no: String,
    pub average_cost: f64,
    // Older records may carry no food type.
    #[serde(default)]
    pub food_type: Option<FoodType>,
    #[serde(alias = "isApproved", default)]
    pub approved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_type_wire_names() {
        assert_eq!(serde_json::to_value(FoodType::NonVeg).unwrap(), "NON_VEG");
        assert_eq!("BOTH".parse::<FoodType>(), Ok(FoodType::Both));
        assert!("VEGAN".parse::<FoodType>().is_err());
    }

    #[test]
    fn test_restaurant_tolerates_missing_food_type() {
        let body = r#"{
            "restoName": "Spice Route", "rating": 4.5,
            "locationLink": "https://maps.example.com/x", "fssaiLicense": "F-9",
            "openTime": "09:00", "closeTime": "22:30",
            "description": "Coastal kitchen", "phoneNo": "9123456780",
            "averageCost": 600, "foodType": null, "approved": true
        }"#;
        let profile: RestaurantProfile = serde_json::from_str(body).unwrap();
        assert_eq!(profile.food_type, None);
        assert!(profile.approved);
        assert_eq!(profile.average_cost, 600.0);
    }
}
