use serde::{Deserialize, Serialize};

/// A person's stored food preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodProfile {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(rename = "foodChoices", default)]
    pub food_choices: Vec<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

impl FoodProfile {
    /// Create a fresh profile with no food choices yet
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        Self {
            user_id: Some(uuid::Uuid::new_v4().to_string()),
            name: name.into(),
            food_choices: Vec::new(),
            created_at: Some(now),
            last_updated: Some(now),
        }
    }

    /// Profile with the given food choices and no timestamps
    pub fn with_foods<I, S>(name: impl Into<String>, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: None,
            name: name.into(),
            food_choices: foods.into_iter().map(Into::into).collect(),
            created_at: None,
            last_updated: None,
        }
    }

    /// Identity comparison used to exclude the subject from its own candidates
    pub fn is_same_person(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// One bounded similarity signal and the terms that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScore {
    pub value: u8,
    pub evidence: Vec<String>,
}

impl SubScore {
    pub fn zero() -> Self {
        Self {
            value: 0,
            evidence: Vec::new(),
        }
    }
}

/// Deterministic compatibility between a subject and a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub subject: String,
    pub candidate: String,
    pub score: u8,
    #[serde(rename = "exactOverlap")]
    pub exact_overlap: SubScore,
    #[serde(rename = "cuisineOverlap")]
    pub cuisine_overlap: SubScore,
    #[serde(rename = "keywordOverlap")]
    pub keyword_overlap: SubScore,
    #[serde(rename = "sharedExact")]
    pub shared_exact: Vec<String>,
    #[serde(rename = "matchedCuisines")]
    pub matched_cuisines: Vec<String>,
    #[serde(rename = "keywordHits")]
    pub keyword_hits: Vec<String>,
}

/// Parsing strategy that recovered a verdict from raw judge text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStrategy {
    Strict,
    Loose,
    Fuzzy,
}

/// Why a judgment was computed locally instead of read from the judge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackCause {
    EmptyInput,
    InvocationFailed,
    Unparseable,
}

/// Where a judgment score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "lowercase")]
pub enum JudgmentSource {
    Judge(ParseStrategy),
    Fallback(FallbackCause),
}

/// Judge-derived score (0-100) with its rationale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentResult {
    pub score: u8,
    pub rationale: String,
    pub source: JudgmentSource,
}

/// Blend of the deterministic score and the judge score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridResult {
    pub subject: String,
    pub candidate: String,
    #[serde(rename = "finalScore")]
    pub final_score: u8,
    #[serde(rename = "deterministicScore")]
    pub deterministic_score: u8,
    #[serde(rename = "judgmentScore")]
    pub judgment_score: u8,
    pub rationale: String,
    #[serde(rename = "judgmentSource")]
    pub judgment_source: JudgmentSource,
    #[serde(rename = "sharedExact")]
    pub shared_exact: Vec<String>,
    #[serde(rename = "matchedCuisines")]
    pub matched_cuisines: Vec<String>,
    #[serde(rename = "keywordHits")]
    pub keyword_hits: Vec<String>,
}

/// Point allocation for the deterministic scorers
///
/// The default caps (40 + 60 + 20) sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub exact_overlap: u8,
    pub cuisine_increment: u8,
    pub cuisine_cap: u8,
    pub keyword_increment: u8,
    pub keyword_cap: u8,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_overlap: 40,
            cuisine_increment: 30,
            cuisine_cap: 60,
            keyword_increment: 5,
            keyword_cap: 20,
        }
    }
}

/// Weights of the hybrid blend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub deterministic: f64,
    pub judge: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            deterministic: 0.6,
            judge: 0.4,
        }
    }
}
