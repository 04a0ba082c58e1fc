use actix_web::{web, HttpResponse, Responder};
use chrono::{Datelike, Utc};
use validator::ValidationErrors;

use crate::core::{build_feed, filter_by_distance, selectable_categories, FeedContext, STRENGTH_LEVELS};
use crate::models::{
    ErrorResponse, FeedRequest, FeedResponse, HealthResponse, NearbyGamesRequest,
    NearbyGamesResponse, RecommendRequest, RecommendResponse, SimilarityRequest,
    SimilarityResponse,
};
use crate::routes::AppState;

/// Configure all game-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/games/nearby", web::post().to(nearby_games))
        .route("/games/recommend", web::post().to(recommend_games))
        .route("/games/similar", web::post().to(similar_game))
        .route("/games/feed", web::post().to(games_feed))
        .route("/categories", web::get().to(categories))
        .route("/strength-levels", web::get().to(strength_levels));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

fn validation_failed(errors: ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: field_errors={:?}", errors);
    HttpResponse::BadRequest().json(ErrorResponse::new("Validation failed", errors.to_string(), 400))
}

/// Nearby games endpoint
///
/// POST /api/v1/games/nearby
///
/// Request body:
/// ```json
/// {
///   "games": [{"id": "string", "lat": 52.5, "lng": 13.4}],
///   "viewerLocation": {"lat": 52.5, "lng": 13.4},
///   "maxRadiusKm": 30
/// }
/// ```
async fn nearby_games(req: web::Json<NearbyGamesRequest>) -> impl Responder {
    if let Err(errors) = req.validate_all() {
        return validation_failed(errors);
    }

    let games = filter_by_distance(
        &req.games,
        req.viewer_location.as_ref(),
        req.max_radius_km,
        Utc::now().year(),
    );

    tracing::debug!("Returning {} of {} games near the viewer", games.len(), req.games.len());

    HttpResponse::Ok().json(NearbyGamesResponse {
        total: games.len(),
        games,
    })
}

/// Recommend games endpoint
///
/// POST /api/v1/games/recommend
///
/// Request body:
/// ```json
/// {
///   "games": [{"id": "string", "ageGroup": "U12", "strength": 5}],
///   "viewerHistory": [{"id": "string", "ageGroup": "U12", "strength": 6}],
///   "viewerLocation": {"lat": 52.5, "lng": 13.4},
///   "maxResults": 6
/// }
/// ```
async fn recommend_games(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate_all() {
        return validation_failed(errors);
    }

    let max_results = req.max_results.unwrap_or(state.default_max_results);

    tracing::info!(
        "Recommending up to {} of {} games (history: {})",
        max_results,
        req.games.len(),
        req.viewer_history.len()
    );

    let recommendations = state.recommender.recommend(
        &req.games,
        &req.viewer_history,
        req.viewer_location.as_ref(),
        max_results,
    );

    HttpResponse::Ok().json(RecommendResponse {
        recommendations,
        total_candidates: req.games.len(),
    })
}

/// Top match classification endpoint
///
/// POST /api/v1/games/similar
async fn similar_game(
    state: web::Data<AppState>,
    req: web::Json<SimilarityRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate_all() {
        return validation_failed(errors);
    }

    let highly_similar = state.recommender.is_highly_similar(
        &req.game,
        req.viewer_profile.as_ref(),
        &req.viewer_history,
        req.viewer_location.as_ref(),
    );

    HttpResponse::Ok().json(SimilarityResponse {
        game_id: req.game.id.clone(),
        highly_similar,
    })
}

/// Games feed endpoint
///
/// POST /api/v1/games/feed
///
/// Request body:
/// ```json
/// {
///   "games": [{"id": "string", "date": "2026-11-01"}],
///   "viewerHistory": [],
///   "viewerProfile": {"categories": ["2014"], "location": {"lat": 52.5, "lng": 13.4}},
///   "filters": {"date": "2026-10-20", "category": "2014", "radiusKm": 25}
/// }
/// ```
async fn games_feed(state: web::Data<AppState>, req: web::Json<FeedRequest>) -> impl Responder {
    if let Err(errors) = req.validate_all() {
        return validation_failed(errors);
    }

    let games = build_feed(
        &state.recommender,
        FeedContext {
            games: &req.games,
            history: &req.viewer_history,
            profile: req.viewer_profile.as_ref(),
            viewer: req.viewer_location.as_ref(),
            filters: &req.filters,
        },
        Utc::now(),
    );

    HttpResponse::Ok().json(FeedResponse {
        total: games.len(),
        games,
    })
}

/// Selectable categories for the current year
async fn categories() -> impl Responder {
    HttpResponse::Ok().json(selectable_categories(Utc::now().year()))
}

/// Named team-strength levels
async fn strength_levels() -> impl Responder {
    HttpResponse::Ok().json(STRENGTH_LEVELS)
}
