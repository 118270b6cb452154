use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use food_friend::config::Settings;
use food_friend::core::{CuisineCatalog, Matcher};
use food_friend::models::{BlendWeights, ScoringWeights};
use food_friend::routes::{self, matches::AppState};
use food_friend::services::{JsonProfileStore, LlmClient};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so the level can come from it
    let settings = Settings::load();
    let logging = settings
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Food Friend matching service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io_error("Configuration error", e)
    })?;

    info!("Configuration loaded successfully");

    // Profile store
    let profiles = Arc::new(
        JsonProfileStore::open(&settings.profiles.data_dir)
            .await
            .map_err(|e| {
                error!("Failed to open profile directory {}: {}", settings.profiles.data_dir, e);
                io_error("Profile store error", e)
            })?,
    );

    info!("Profile store opened at {}", settings.profiles.data_dir);

    // Language model client (optional - hybrid ranking is refused without it)
    let llm = if settings.llm.enabled {
        let client = LlmClient::new(
            settings.llm.endpoint.clone(),
            settings.llm.timeout(),
            settings.llm.judge_params(),
            settings.llm.extract_params(),
        )
        .map_err(|e| {
            error!("Failed to create language model client: {}", e);
            io_error("LLM client error", e)
        })?;
        info!("Language model client initialized ({})", settings.llm.endpoint);
        Some(Arc::new(client))
    } else {
        warn!("Language model disabled - hybrid ranking will answer 503");
        None
    };

    // Initialize matcher with configured weights
    let weights = ScoringWeights::from(&settings.scoring.weights);
    let blend = BlendWeights::from(&settings.scoring.blend);

    let matcher = Matcher::new(Arc::new(CuisineCatalog::default()), weights, blend)
        .with_judge_timeout(settings.llm.timeout());

    info!("Matcher initialized with weights: {:?}, blend: {:?}", weights, blend);

    // Build application state
    let app_state = AppState {
        profiles,
        llm,
        matcher,
        ranking: settings.ranking.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
