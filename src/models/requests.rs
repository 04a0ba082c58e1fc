use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::domain::{FeedFilters, GameRecord, GeoPoint, ViewerProfile};
use crate::services::PhoneInput;

/// Request to narrow games to the viewer's radius
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NearbyGamesRequest {
    pub games: Vec<GameRecord>,
    #[serde(default)]
    pub viewer_location: Option<GeoPoint>,
    #[validate(range(min = 0.0, max = 20000.0))]
    #[serde(default = "default_radius_km")]
    pub max_radius_km: f64,
}

/// Request for recommended games
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub games: Vec<GameRecord>,
    #[serde(alias = "userGames", default)]
    pub viewer_history: Vec<GameRecord>,
    #[serde(alias = "userLocation", default)]
    pub viewer_location: Option<GeoPoint>,
    /// Falls back to the configured default when absent
    #[validate(range(min = 1, max = 100))]
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Request to classify a single game as a top match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityRequest {
    pub game: GameRecord,
    #[serde(alias = "profile", default)]
    pub viewer_profile: Option<ViewerProfile>,
    #[serde(alias = "userGames", default)]
    pub viewer_history: Vec<GameRecord>,
    #[serde(alias = "userLocation", default)]
    pub viewer_location: Option<GeoPoint>,
}

/// Request to assemble the games feed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    pub games: Vec<GameRecord>,
    #[serde(alias = "userGames", default)]
    pub viewer_history: Vec<GameRecord>,
    #[serde(alias = "profile", default)]
    pub viewer_profile: Option<ViewerProfile>,
    #[serde(default)]
    pub viewer_location: Option<GeoPoint>,
    #[serde(default)]
    pub filters: FeedFilters,
}

/// Request for a WhatsApp contact redirect
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactRequest {
    pub phone: PhoneInput,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub text: Option<String>,
}

fn default_radius_km() -> f64 {
    crate::core::distance::DEFAULT_FILTER_RADIUS_KM
}

/// Validate every location carried by a request
///
/// Locations are optional and nested, so they are checked here rather than
/// through the derive.
pub fn validate_locations<'a>(
    locations: impl IntoIterator<Item = Option<&'a GeoPoint>>,
) -> Result<(), ValidationErrors> {
    locations
        .into_iter()
        .flatten()
        .try_for_each(|location| location.validate())
}

impl NearbyGamesRequest {
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        validate_locations([self.viewer_location.as_ref()])
    }
}

impl RecommendRequest {
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        validate_locations([self.viewer_location.as_ref()])
    }
}

impl SimilarityRequest {
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        validate_locations([
            self.viewer_location.as_ref(),
            self.viewer_profile.as_ref().and_then(|p| p.location.as_ref()),
        ])
    }
}

impl FeedRequest {
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        validate_locations([
            self.viewer_location.as_ref(),
            self.viewer_profile.as_ref().and_then(|p| p.location.as_ref()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recommend_request_accepts_legacy_names() {
        let request: RecommendRequest = serde_json::from_value(json!({
            "games": [{"id": "a"}],
            "userGames": [{"id": "own", "ageGroup": "U12"}],
            "userLocation": {"lat": 52.0, "lng": 13.0}
        }))
        .unwrap();

        assert_eq!(request.viewer_history.len(), 1);
        assert!(request.viewer_location.is_some());
        assert_eq!(request.max_results, None);
        assert!(request.validate_all().is_ok());
    }

    #[test]
    fn test_out_of_range_location_is_rejected() {
        let request: RecommendRequest = serde_json::from_value(json!({
            "games": [],
            "viewerLocation": {"lat": 95.0, "lng": 13.0}
        }))
        .unwrap();

        assert!(request.validate_all().is_err());
    }

    #[test]
    fn test_zero_max_results_is_rejected() {
        let request: RecommendRequest =
            serde_json::from_value(json!({"games": [], "maxResults": 0})).unwrap();
        assert!(request.validate_all().is_err());
    }

    #[test]
    fn test_nearby_request_default_radius() {
        let request: NearbyGamesRequest = serde_json::from_value(json!({"games": []})).unwrap();
        assert_eq!(request.max_radius_km, 30.0);
    }
}
