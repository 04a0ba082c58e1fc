//! MatchBuddy - Match recommendation engine for amateur team games
//!
//! This library provides the ranking core behind the MatchBuddy games feed.
//! It narrows open games by distance and strength, scores them against a
//! preference vector derived from the viewer's own games, and builds the
//! merged feed. Phone normalization and the WhatsApp contact redirect live
//! in `services`.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{Recommender, build_feed, haversine_distance, normalize_category};
pub use models::{GameRecord, GeoPoint, ScoredRecord, ScoringWeights, RecommendationPolicy, FeedEntry};
