use crate::models::{BlendWeights, HybridResult, JudgmentResult, MatchResult};

/// Weighted blend of the deterministic and judge scores, rounded and clamped
#[inline]
pub fn blend_scores(deterministic: u8, judgment: u8, weights: &BlendWeights) -> u8 {
    let blended = weights.deterministic * deterministic as f64 + weights.judge * judgment as f64;
    if blended.is_nan() {
        return 0;
    }
    blended.round().clamp(0.0, 100.0) as u8
}

/// Merge both constituent results into one displayable record
pub fn combine(deterministic: MatchResult, judgment: JudgmentResult, weights: &BlendWeights) -> HybridResult {
    let final_score = blend_scores(deterministic.score, judgment.score, weights);

    HybridResult {
        subject: deterministic.subject,
        candidate: deterministic.candidate,
        final_score,
        deterministic_score: deterministic.score,
        judgment_score: judgment.score,
        rationale: judgment.rationale,
        judgment_source: judgment.source,
        shared_exact: deterministic.shared_exact,
        matched_cuisines: deterministic.matched_cuisines,
        keyword_hits: deterministic.keyword_hits,
    }
}
