// Integration tests for Food Friend

use actix_web::{test, web, App};
use async_trait::async_trait;
use food_friend::config::RankingSettings;
use food_friend::core::{Judge, JudgeError, JudgePrompt, MatchError, Matcher};
use food_friend::models::{FallbackCause, FoodProfile, JudgmentSource};
use food_friend::routes::{configure_routes, matches::AppState};
use food_friend::services::{CompletionParams, JsonProfileStore, LlmClient, ProfileSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn create_test_profile(name: &str, foods: &[&str]) -> FoodProfile {
    FoodProfile::with_foods(name, foods.iter().copied())
}

/// Judge that always errors, counting how often it was asked
struct BrokenJudge {
    calls: AtomicUsize,
}

#[async_trait]
impl Judge for BrokenJudge {
    async fn invoke(&self, _prompt: &JudgePrompt) -> Result<String, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(JudgeError::Invocation("model crashed".to_string()))
    }
}

/// Judge that scores by how many foods the second list has
struct LengthJudge;

#[async_trait]
impl Judge for LengthJudge {
    async fn invoke(&self, prompt: &JudgePrompt) -> Result<String, JudgeError> {
        let score = (prompt.list_b.len() * 20).min(100);
        Ok(format!(r#"{{"score": {}, "reason": "{} foods listed"}}"#, score, prompt.list_b.len()))
    }
}

#[tokio::test]
async fn test_integration_two_phase_ranking() {
    let matcher = Matcher::with_defaults();
    let judge = LengthJudge;
    let subject = create_test_profile("me", &["pizza", "ramen", "tacos"]);

    let candidates = vec![
        create_test_profile("italian-fan", &["pizza", "lasagna"]),
        create_test_profile("ramen-fan", &["ramen"]),
        create_test_profile("no-overlap", &["haggis"]),
        create_test_profile("everything", &["pizza", "ramen", "tacos", "sushi", "burrito"]),
        create_test_profile("empty", &[]),
        create_test_profile("taco-fan", &["tacos", "nachos"]),
        create_test_profile("kimchi-fan", &["kimchi"]),
    ];

    let result = matcher
        .rank(&subject, &candidates, Some(&judge), 5, 3)
        .await
        .expect("judge is configured");

    assert_eq!(result.len(), 3);
    assert_eq!(result[0].candidate, "everything");

    // Sorted by blended score
    for i in 1..result.len() {
        assert!(
            result[i - 1].final_score >= result[i].final_score,
            "Matches not sorted by final score"
        );
    }

    // Zero-overlap candidates never make the cut
    for r in &result {
        assert_ne!(r.candidate, "no-overlap");
        assert_ne!(r.candidate, "empty");
    }
}

#[tokio::test]
async fn test_ranking_survives_broken_judge() {
    let matcher = Matcher::with_defaults();
    let judge = BrokenJudge { calls: AtomicUsize::new(0) };
    let subject = create_test_profile("me", &["sushi"]);

    let candidates: Vec<FoodProfile> = (0..50)
        .map(|i| create_test_profile(&format!("user{}", i), &["sushi", "udon"]))
        .collect();

    let result = matcher.rank(&subject, &candidates, Some(&judge), 5, 3).await.unwrap();

    assert_eq!(judge.calls.load(Ordering::SeqCst), 5);
    assert_eq!(result.len(), 3);
    for r in &result {
        assert!(!r.rationale.is_empty());
        assert!(r.final_score <= 100);
        assert_eq!(r.judgment_source, JudgmentSource::Fallback(FallbackCause::InvocationFailed));
    }
}

#[tokio::test]
async fn test_ranking_without_judge_fails_fast() {
    let matcher = Matcher::with_defaults();
    let subject = create_test_profile("me", &["sushi"]);
    let candidates = vec![create_test_profile("you", &["sushi"])];

    let result = matcher.rank(&subject, &candidates, None, 5, 3).await;

    assert!(matches!(result, Err(MatchError::JudgeUnavailable)));
}

#[tokio::test]
async fn test_blend_with_broken_judge_still_answers() {
    let matcher = Matcher::with_defaults();
    let judge = BrokenJudge { calls: AtomicUsize::new(0) };

    let result = matcher
        .blend(
            &create_test_profile("a", &["Pho", "banh mi"]),
            &create_test_profile("b", &["pho"]),
            Some(&judge),
        )
        .await
        .unwrap();

    // Fallback: one shared item -> 10 + 20
    assert_eq!(result.judgment_score, 30);
    assert_eq!(result.rationale, "Both enjoy pho.");
    assert!(result.final_score <= 100);
}

async fn seeded_state(dir: &std::path::Path, llm: Option<Arc<LlmClient>>) -> AppState {
    let profiles = Arc::new(JsonProfileStore::open(dir).await.unwrap());

    profiles.save(&create_test_profile("Me", &["pizza", "sushi"])).await.unwrap();
    profiles.save(&create_test_profile("Ana", &["pizza"])).await.unwrap();
    profiles.save(&create_test_profile("Bo", &["ramen"])).await.unwrap();
    profiles.save(&create_test_profile("Cy", &["haggis"])).await.unwrap();
    profiles.save(&create_test_profile("Hungry", &[])).await.unwrap();

    AppState {
        profiles,
        llm,
        matcher: Matcher::with_defaults(),
        ranking: RankingSettings::default(),
    }
}

#[actix_web::test]
async fn test_calculate_matches_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let state = seeded_state(dir.path(), None).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/calculate")
        .set_json(serde_json::json!({ "name": "me" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 4);
    assert_eq!(matches[0]["candidate"], "Ana");
    assert!(matches.iter().all(|m| m["candidate"] != "Me"));
}

#[actix_web::test]
async fn test_rank_endpoint_without_llm_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let state = seeded_state(dir.path(), None).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .set_json(serde_json::json!({ "name": "Me" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), actix_web::http::StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_calculate_requires_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let state = seeded_state(dir.path(), None).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/calculate")
        .set_json(serde_json::json!({ "name": "Hungry" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/calculate")
        .set_json(serde_json::json!({ "name": "Nobody" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_lifecycle_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let state = seeded_state(dir.path(), None).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .set_json(serde_json::json!({ "name": "Dee" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["isNew"], true);

    let req = test::TestRequest::put()
        .uri("/api/v1/profiles/foods")
        .set_json(serde_json::json!({ "name": "Dee", "foodChoices": ["pizza", "gnocchi"] }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["foodChoices"], serde_json::json!(["pizza", "gnocchi"]));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/score")
        .set_json(serde_json::json!({ "nameA": "Dee", "nameB": "Ana" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["sharedExact"], serde_json::json!(["pizza"]));
    assert_eq!(body["matchedCuisines"], serde_json::json!(["italian"]));
}

#[actix_web::test]
async fn test_path_like_profile_name_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = seeded_state(dir.path(), None).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/profiles")
        .set_json(serde_json::json!({ "name": "../outside" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/calculate")
        .set_json(serde_json::json!({ "name": "a/b" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_extract_endpoint_without_llm_scans_text() {
    let dir = tempfile::tempdir().unwrap();
    let state = seeded_state(dir.path(), None).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/foods/extract")
        .set_json(serde_json::json!({ "description": "I could eat Thai curry every day" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["foodChoices"], serde_json::json!(["thai", "curry"]));
}

#[actix_web::test]
async fn test_rank_endpoint_with_model_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/completion")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content": "{\"score\": 80, \"reason\": \"Similar tastes\"}"}"#)
        .expect_at_most(5)
        .create_async()
        .await;

    let params = CompletionParams {
        max_tokens: 80,
        temperature: 0.4,
        top_p: 0.9,
        top_k: 40,
        repeat_penalty: 1.1,
    };
    let llm = LlmClient::new(server.url(), Duration::from_secs(5), params, params).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let state = seeded_state(dir.path(), Some(Arc::new(llm))).await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/rank")
        .set_json(serde_json::json!({ "name": "Me" }))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(body["totalCandidates"], 4);
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0]["candidate"], "Ana");
    assert_eq!(matches[0]["judgmentScore"], 80);
    assert_eq!(matches[0]["rationale"], "Similar tastes");
    mock.assert_async().await;
}
