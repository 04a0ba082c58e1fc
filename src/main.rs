use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use matchbuddy::config::Settings;
use matchbuddy::core::Recommender;
use matchbuddy::models::ScoringWeights;
use matchbuddy::routes::{self, AppState};
use matchbuddy::services::{ContactService, RateLimiter};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
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

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Initialize logging, RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting MatchBuddy recommendation service...");

    let weights = ScoringWeights::from(&settings.scoring.weights);
    let policy = settings.recommendation.policy();
    let recommender = Recommender::new(weights, policy);

    info!("Recommender initialized with weights: {:?}", weights);

    let limiter = RateLimiter::new(
        settings.contact.rate_limit,
        Duration::from_secs(settings.contact.rate_window_secs),
        settings.contact.rate_limit_capacity,
    );
    let contact = Arc::new(ContactService::new(
        limiter,
        settings.contact.default_country_code.clone(),
    ));

    info!(
        "Contact rate limit: {} requests per {}s",
        settings.contact.rate_limit, settings.contact.rate_window_secs
    );

    // Periodically drop rate-limit windows that have run out
    let eviction_interval = Duration::from_secs(settings.contact.eviction_interval_secs.max(1));
    let evicting = Arc::clone(&contact);
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(eviction_interval);
        loop {
            interval.tick().await;
            evicting.evict_expired(Instant::now());
        }
    });

    let app_state = AppState {
        recommender,
        contact,
        default_max_results: settings.recommendation.default_max_results,
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
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))
    .map_err(|e| {
        error!("Failed to bind HTTP server: {}", e);
        e
    })?
    .run()
    .await
}
