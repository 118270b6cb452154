use crate::core::catalog::CuisineCatalog;
use crate::core::normalize::normalize_food_list;
use crate::core::similarity::{cuisine_similarity, jaccard_similarity, keyword_similarity};
use crate::models::{FoodProfile, MatchResult, ScoringWeights};

/// Calculate the deterministic compatibility score (0-100) for two profiles
///
/// Scoring formula:
/// score = min(
///     floor(jaccard * 40) +           # exact dish overlap
///     min(30 * cuisines, 60) +        # shared cuisine clusters
///     min(5 * keywords, 20),          # shared taste descriptors
///     100
/// )
///
/// Never fails and never leaves this process; missing food choices count as
/// an empty list.
pub fn score_pair(
    user_a: &FoodProfile,
    user_b: &FoodProfile,
    catalog: &CuisineCatalog,
    weights: &ScoringWeights,
) -> MatchResult {
    let foods1 = normalize_food_list(&user_a.food_choices, catalog);
    let foods2 = normalize_food_list(&user_b.food_choices, catalog);

    // 1. Exact item overlap
    let exact = jaccard_similarity(&foods1, &foods2, weights);

    // 2. Cuisine cluster match
    let cuisines = cuisine_similarity(&foods1, &foods2, catalog, weights);

    // 3. General keyword similarity
    let keywords = keyword_similarity(&foods1, &foods2, catalog, weights);

    let total = exact.value as u32 + cuisines.value as u32 + keywords.value as u32;
    let score = total.min(100) as u8;

    tracing::trace!(
        subject = %user_a.name,
        candidate = %user_b.name,
        exact = exact.value,
        cuisine = cuisines.value,
        keyword = keywords.value,
        score,
        "Scored pair"
    );

    MatchResult {
        subject: user_a.name.clone(),
        candidate: user_b.name.clone(),
        score,
        shared_exact: exact.evidence.clone(),
        matched_cuisines: cuisines.evidence.clone(),
        keyword_hits: keywords.evidence.clone(),
        exact_overlap: exact,
        cuisine_overlap: cuisines,
        keyword_overlap: keywords,
    }
}
