use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use std::sync::Arc;

use crate::config::RankingSettings;
use crate::core::extraction::resolve_food_choices;
use crate::core::{Judge, MatchError, Matcher};
use crate::models::{
    CalculateMatchesResponse, ErrorResponse, ExtractFoodsRequest, ExtractFoodsResponse, FindMatchesRequest,
    FoodProfile, HealthResponse, LoginRequest, ProfileResponse, ProfilesResponse, RankMatchesResponse,
    ScorePairRequest, UpdateFoodsRequest,
};
use crate::services::{JsonProfileStore, LlmClient, ProfileError, ProfileSource};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<JsonProfileStore>,
    pub llm: Option<Arc<LlmClient>>,
    pub matcher: Matcher,
    pub ranking: RankingSettings,
}

impl AppState {
    /// The configured judge, if a language model is wired in
    pub fn judge(&self) -> Option<&dyn Judge> {
        self.llm.as_deref().map(|client| client as &dyn Judge)
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/profiles", web::get().to(list_profiles))
        .route("/profiles", web::post().to(login))
        .route("/profiles/foods", web::put().to(update_foods))
        .route("/foods/extract", web::post().to(extract_foods))
        .route("/matches/calculate", web::post().to(calculate_matches))
        .route("/matches/rank", web::post().to(rank_matches))
        .route("/matches/score", web::post().to(score_pair));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn profile_error(context: &str, err: ProfileError) -> HttpResponse {
    match err {
        ProfileError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: "User not found".to_string(),
            message,
            status_code: 404,
        }),
        ProfileError::InvalidName(name) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: format!("{} cannot be used as a profile name", name),
            status_code: 400,
        }),
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}

fn not_found(name: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "User not found".to_string(),
        message: format!("No profile named {}", name),
        status_code: 404,
    })
}

fn no_preferences(name: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "No food preferences set".to_string(),
        message: format!("{} has not listed any foods yet", name),
        status_code: 400,
    })
}

/// Load the subject, or the HTTP response explaining why it cannot be used
async fn load_subject(state: &AppState, name: &str) -> Result<FoodProfile, HttpResponse> {
    match state.profiles.get(name).await {
        Ok(Some(profile)) if profile.food_choices.is_empty() => Err(no_preferences(name)),
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(not_found(name)),
        Err(e) => Err(profile_error("Failed to fetch user profile", e)),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        llm_enabled: state.llm.is_some(),
    })
}

/// List every stored profile
///
/// GET /api/v1/profiles
async fn list_profiles(state: web::Data<AppState>) -> impl Responder {
    match state.profiles.all_except(None).await {
        Ok(users) => HttpResponse::Ok().json(ProfilesResponse { success: true, users }),
        Err(e) => profile_error("Failed to list profiles", e),
    }
}

/// Load or create a profile
///
/// POST /api/v1/profiles
///
/// Request body:
/// ```json
/// { "name": "string" }
/// ```
async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let name = req.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "Name is required".to_string(),
            status_code: 400,
        });
    }

    match state.profiles.get_or_create(name).await {
        Ok((user, is_new)) => HttpResponse::Ok().json(ProfileResponse {
            success: true,
            user,
            is_new: Some(is_new),
        }),
        Err(e) => profile_error("Failed to load profile", e),
    }
}

/// Replace a user's food choices
///
/// PUT /api/v1/profiles/foods
///
/// Request body:
/// ```json
/// { "name": "string", "foodChoices": ["string"] }
/// ```
async fn update_foods(state: web::Data<AppState>, req: web::Json<UpdateFoodsRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let req = req.into_inner();
    match state.profiles.update_foods(req.name.trim(), req.food_choices).await {
        Ok(user) => {
            tracing::info!("Updated {} food choices for {}", user.food_choices.len(), user.name);
            HttpResponse::Ok().json(ProfileResponse {
                success: true,
                user,
                is_new: None,
            })
        }
        Err(e) => profile_error("Failed to update profile", e),
    }
}

/// Extract food choices from a natural-language description
///
/// POST /api/v1/foods/extract
async fn extract_foods(state: web::Data<AppState>, req: web::Json<ExtractFoodsRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let description = req.description.trim();
    let food_choices = match &state.llm {
        Some(llm) => llm.extract_food_choices(description).await,
        None => resolve_food_choices(None, description),
    };

    HttpResponse::Ok().json(ExtractFoodsResponse {
        success: true,
        food_choices,
    })
}

/// Deterministic top-N matches for a user
///
/// POST /api/v1/matches/calculate
///
/// Request body:
/// ```json
/// { "name": "string", "limit": 10 }
/// ```
async fn calculate_matches(state: web::Data<AppState>, req: web::Json<FindMatchesRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let subject = match load_subject(&state, &req.name).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let others = match state.profiles.all_except(Some(&subject.name)).await {
        Ok(others) => others,
        Err(e) => return profile_error("Failed to load candidates", e),
    };

    let limit = req
        .limit
        .map(usize::from)
        .unwrap_or(state.ranking.calculate_limit);
    let matches = state.matcher.rank_deterministic(&subject, &others, limit);

    tracing::info!(
        "Returning {} deterministic matches for {} (from {} candidates)",
        matches.len(),
        subject.name,
        others.len()
    );

    HttpResponse::Ok().json(CalculateMatchesResponse { success: true, matches })
}

/// Two-phase hybrid ranking for a user
///
/// POST /api/v1/matches/rank
async fn rank_matches(state: web::Data<AppState>, req: web::Json<FindMatchesRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let subject = match load_subject(&state, &req.name).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let others = match state.profiles.all_except(Some(&subject.name)).await {
        Ok(others) => others,
        Err(e) => return profile_error("Failed to load candidates", e),
    };

    let top_matches = req
        .limit
        .map(usize::from)
        .unwrap_or(state.ranking.top_matches);

    let ranked = state
        .matcher
        .rank(
            &subject,
            &others,
            state.judge(),
            state.ranking.shortlist_size,
            top_matches,
        )
        .await;

    match ranked {
        Ok(matches) => {
            tracing::info!(
                "Returning {} hybrid matches for {} (from {} candidates)",
                matches.len(),
                subject.name,
                others.len()
            );
            HttpResponse::Ok().json(RankMatchesResponse {
                success: true,
                matches,
                total_candidates: others.len(),
            })
        }
        Err(e @ MatchError::JudgeUnavailable) => HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "Judge unavailable".to_string(),
            message: e.to_string(),
            status_code: 503,
        }),
    }
}

/// Deterministic score for one pair of users
///
/// POST /api/v1/matches/score
async fn score_pair(state: web::Data<AppState>, req: web::Json<ScorePairRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let mut pair = Vec::with_capacity(2);
    for name in [&req.name_a, &req.name_b] {
        match state.profiles.get(name).await {
            Ok(Some(profile)) => pair.push(profile),
            Ok(None) => return not_found(name),
            Err(e) => return profile_error("Failed to fetch user profile", e),
        }
    }

    HttpResponse::Ok().json(state.matcher.score(&pair[0], &pair[1]))
}
