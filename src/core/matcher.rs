use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use crate::core::{
    catalog::CuisineCatalog,
    error::MatchError,
    hybrid::combine,
    judgment::{judge_foods, Judge},
    scoring::score_pair,
};
use crate::models::{BlendWeights, FoodProfile, HybridResult, JudgmentResult, MatchResult, ScoringWeights};

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Deterministic scoring of every candidate (cheap, local)
/// 2. Shortlist of the best deterministic scores
/// 3. Hybrid re-scoring of the shortlist with the external judge
/// 4. Final ranking by blended score
///
/// Holds only immutable configuration, so clones are cheap and can be shared
/// across request handlers.
#[derive(Debug, Clone)]
pub struct Matcher {
    catalog: Arc<CuisineCatalog>,
    weights: ScoringWeights,
    blend: BlendWeights,
    judge_timeout: Option<Duration>,
}

impl Matcher {
    pub fn new(catalog: Arc<CuisineCatalog>, weights: ScoringWeights, blend: BlendWeights) -> Self {
        Self {
            catalog,
            weights,
            blend,
            judge_timeout: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(CuisineCatalog::default()),
            ScoringWeights::default(),
            BlendWeights::default(),
        )
    }

    /// Bound each judge call; an elapsed timeout counts as a failed call
    pub fn with_judge_timeout(mut self, timeout: Duration) -> Self {
        self.judge_timeout = Some(timeout);
        self
    }

    pub fn catalog(&self) -> &CuisineCatalog {
        &self.catalog
    }

    /// Deterministic score for one pair; total and side-effect free
    pub fn score(&self, user_a: &FoodProfile, user_b: &FoodProfile) -> MatchResult {
        score_pair(user_a, user_b, &self.catalog, &self.weights)
    }

    /// Judge verdict for one pair; never fails
    pub async fn judge(&self, user_a: &FoodProfile, user_b: &FoodProfile, judge: &dyn Judge) -> JudgmentResult {
        judge_foods(&user_a.food_choices, &user_b.food_choices, judge, self.judge_timeout).await
    }

    /// Blend the deterministic score with the judge's verdict
    ///
    /// Fails only when no judge is configured at all; judge errors are
    /// absorbed by the judgment fallback.
    pub async fn blend(
        &self,
        user_a: &FoodProfile,
        user_b: &FoodProfile,
        judge: Option<&dyn Judge>,
    ) -> Result<HybridResult, MatchError> {
        let judge = judge.ok_or(MatchError::JudgeUnavailable)?;
        Ok(self.blend_with(user_a, user_b, judge).await)
    }

    async fn blend_with(&self, user_a: &FoodProfile, user_b: &FoodProfile, judge: &dyn Judge) -> HybridResult {
        self.blend_scored(user_a, user_b, self.score(user_a, user_b), judge).await
    }

    /// Blend an already computed deterministic result with a fresh verdict
    async fn blend_scored(
        &self,
        user_a: &FoodProfile,
        user_b: &FoodProfile,
        deterministic: MatchResult,
        judge: &dyn Judge,
    ) -> HybridResult {
        let judgment = self.judge(user_a, user_b, judge).await;

        let result = combine(deterministic, judgment, &self.blend);

        tracing::debug!(
            "Blended {} -> {}: final={} (deterministic={}, judge={})",
            result.subject,
            result.candidate,
            result.final_score,
            result.deterministic_score,
            result.judgment_score
        );

        result
    }

    /// Rank every candidate by deterministic score only
    pub fn rank_deterministic(
        &self,
        subject: &FoodProfile,
        candidates: &[FoodProfile],
        limit: usize,
    ) -> Vec<MatchResult> {
        let mut scored: Vec<MatchResult> = candidates
            .iter()
            .map(|candidate| self.score(subject, candidate))
            .collect();

        // Stable: equal scores keep candidate order
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit);
        scored
    }

    /// Two-phase ranking of candidates for `subject`
    ///
    /// Phase 1 scores every candidate deterministically and keeps the best
    /// `shortlist_size`. Phase 2 blends only that shortlist with the judge,
    /// so the judge is invoked at most `shortlist_size` times. The subject
    /// must already be excluded from `candidates`.
    ///
    /// # Returns
    /// Up to `top_matches` results, best blended score first. Ties keep the
    /// original candidate order.
    pub async fn rank(
        &self,
        subject: &FoodProfile,
        candidates: &[FoodProfile],
        judge: Option<&dyn Judge>,
        shortlist_size: usize,
        top_matches: usize,
    ) -> Result<Vec<HybridResult>, MatchError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let judge = judge.ok_or(MatchError::JudgeUnavailable)?;

        // Phase 1: cheap deterministic filter
        let mut phase_one: Vec<(usize, MatchResult)> = candidates
            .iter()
            .enumerate()
            .map(|(idx, candidate)| (idx, self.score(subject, candidate)))
            .collect();

        // Stable: the shortlist cut keeps earlier candidates among equals
        phase_one.sort_by(|a, b| b.1.score.cmp(&a.1.score));
        phase_one.truncate(shortlist_size);

        tracing::info!(
            "Shortlisted {} of {} candidates for {}",
            phase_one.len(),
            candidates.len(),
            subject.name
        );

        // Phase 2: judge calls run concurrently, joined before sorting
        let blends = phase_one
            .into_iter()
            .map(|(idx, deterministic)| self.blend_scored(subject, &candidates[idx], deterministic, judge));
        let mut results = join_all(blends).await;

        results.sort_by(|a, b| b.final_score.cmp(&a.final_score));
        results.truncate(top_matches);

        Ok(results)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}
