use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to load or create a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub name: String,
}

/// Request to replace a profile's food choices
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFoodsRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(alias = "food_choices", rename = "foodChoices", default)]
    pub food_choices: Vec<String>,
}

/// Request to extract food choices from free text
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExtractFoodsRequest {
    #[validate(length(min = 1))]
    pub description: String,
}

/// Request to rank every other profile against one user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
}

/// Request to score one pair of profiles
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScorePairRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "name_a", rename = "nameA")]
    pub name_a: String,
    #[validate(length(min = 1))]
    #[serde(alias = "name_b", rename = "nameB")]
    pub name_b: String,
}
