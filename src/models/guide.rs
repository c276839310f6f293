use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GuideProfile {
    #[serde(rename = "guidename")]
    pub name: String,
    pub experience: u32,
    pub language: String,
    pub bio: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub license_number: String,
    #[serde(alias = "available", default)]
    pub is_available: bool,
    pub phone_no: String,
    #[serde(alias = "isApproved", default)]
    pub approved: bool,
}
