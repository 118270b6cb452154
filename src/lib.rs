//! Food Friend - food preference matching service
//!
//! This library provides the compatibility engine behind Food Friend: cuisine
//! normalization, bounded similarity scoring, defensive parsing of language
//! model verdicts, and a two-phase hybrid ranking pipeline.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{CuisineCatalog, Judge, JudgePrompt, MatchError, Matcher, normalize_food_list, score_pair};
pub use crate::models::{FoodProfile, HybridResult, JudgmentResult, MatchResult, ScoringWeights};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        let a = FoodProfile::with_foods("a", ["sushi"]);
        let b = FoodProfile::with_foods("b", ["ramen"]);
        assert_eq!(matcher.score(&a, &b).matched_cuisines, vec!["japanese"]);
    }
}
