// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CreationMarker, EnrichedRecord, FeedEntry, FeedFilters, GameRecord, GeoPoint, PreferenceVector,
    RecommendationPolicy, ScoredRecord, ScoringWeights, ViewerProfile, DERIVED_FIELDS,
};
pub use requests::{ContactRequest, FeedRequest, NearbyGamesRequest, RecommendRequest, SimilarityRequest};
pub use responses::{
    ErrorResponse, FeedResponse, HealthResponse, NearbyGamesResponse, RecommendResponse,
    SimilarityResponse,
};
