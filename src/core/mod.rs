// Core algorithm exports
pub mod catalog;
pub mod error;
pub mod extraction;
pub mod hybrid;
pub mod judgment;
pub mod matcher;
pub mod normalize;
pub mod scoring;
pub mod similarity;

pub use catalog::{Cuisine, CuisineCatalog};
pub use error::{JudgeError, MatchError};
pub use extraction::{fallback_food_words, parse_food_list, resolve_food_choices};
pub use hybrid::{blend_scores, combine};
pub use judgment::{interpret, judge_foods, overlap_fallback, Judge, JudgePrompt, Verdict};
pub use matcher::Matcher;
pub use normalize::normalize_food_list;
pub use scoring::score_pair;
pub use similarity::{cuisine_similarity, jaccard_similarity, keyword_similarity};
