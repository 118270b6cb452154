use serde::{Deserialize, Serialize};
use crate::models::domain::{FoodProfile, HybridResult, MatchResult};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "llmEnabled")]
    pub llm_enabled: bool,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Response carrying a single profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: FoodProfile,
    #[serde(rename = "isNew", skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
}

/// Response listing profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesResponse {
    pub success: bool,
    pub users: Vec<FoodProfile>,
}

/// Response for food extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractFoodsResponse {
    pub success: bool,
    #[serde(rename = "foodChoices")]
    pub food_choices: Vec<String>,
}

/// Response for deterministic top-N matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateMatchesResponse {
    pub success: bool,
    pub matches: Vec<MatchResult>,
}

/// Response for two-phase hybrid ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankMatchesResponse {
    pub success: bool,
    pub matches: Vec<HybridResult>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}
