use serde::Serialize;

use crate::models::domain::{EnrichedRecord, FeedEntry, ScoredRecord};

/// Response for the nearby games endpoint
#[derive(Debug, Clone, Serialize)]
pub struct NearbyGamesResponse {
    pub games: Vec<EnrichedRecord>,
    pub total: usize,
}

/// Response for the recommend endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub recommendations: Vec<ScoredRecord>,
    pub total_candidates: usize,
}

/// Response for the similarity endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResponse {
    pub game_id: String,
    pub highly_similar: bool,
}

/// Response for the feed endpoint
#[derive(Debug, Clone, Serialize)]
pub struct FeedResponse {
    pub games: Vec<FeedEntry>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
