// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BlendWeights, FallbackCause, FoodProfile, HybridResult, JudgmentResult, JudgmentSource,
    MatchResult, ParseStrategy, ScoringWeights, SubScore,
};
pub use requests::{ExtractFoodsRequest, FindMatchesRequest, LoginRequest, ScorePairRequest, UpdateFoodsRequest};
pub use responses::{
    CalculateMatchesResponse, ErrorResponse, ExtractFoodsResponse, HealthResponse, ProfileResponse,
    ProfilesResponse, RankMatchesResponse,
};
