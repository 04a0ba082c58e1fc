use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// Keys computed by the engine; stale copies sent back by clients are dropped
/// so they never shadow the freshly computed values.
pub const DERIVED_FIELDS: [&str; 5] = [
    "normalizedCategory",
    "distanceKm",
    "recommendationScore",
    "recommended",
    "normalizedAgeGroup",
];

/// A published friendly-match request, as stored by the document database.
///
/// Loosely typed source fields (numbers sent as strings, categories sent as
/// numbers, timestamps in two shapes) are coerced here, once, during
/// deserialization. Unknown fields are kept in `extra` and echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    #[serde(
        alias = "ageGroup",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(
        alias = "lon",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub lng: Option<f64>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<CreationMarker>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameRecord {
    /// Bare record with only an identifier set
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: None,
            strength: None,
            date: None,
            lat: None,
            lng: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    /// Location of the game, only when both coordinates are present and finite
    pub fn coordinates(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng),
            _ => None,
        }
    }

    /// Strength as a finite number
    pub fn strength_value(&self) -> Option<f64> {
        self.strength.filter(|s| s.is_finite())
    }

    /// Creation marker in whole seconds, 0 when unknown
    pub fn created_seconds(&self) -> i64 {
        self.created_at.map(|c| c.seconds()).unwrap_or(0)
    }
}

/// Server-side creation timestamp, either plain seconds or a
/// `{seconds, nanoseconds}` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreationMarker {
    Seconds(i64),
    Timestamp {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(alias = "_nanoseconds", default)]
        nanoseconds: u32,
    },
}

impl CreationMarker {
    pub fn seconds(&self) -> i64 {
        match self {
            CreationMarker::Seconds(s) => *s,
            CreationMarker::Timestamp { seconds, .. } => *seconds,
        }
    }
}

/// Geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoPoint {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[serde(alias = "lon")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

impl GeoPoint {
    /// Returns `None` unless both values are finite
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if lat.is_finite() && lng.is_finite() {
            Some(Self { lat, lng })
        } else {
            None
        }
    }
}

/// A game record with its normalized category and distance to the viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: GameRecord,
    pub normalized_category: String,
    /// `None` means the distance is unknown
    pub distance_km: Option<f64>,
}

impl EnrichedRecord {
    pub fn id(&self) -> &str {
        &self.record.id
    }
}

/// An enriched record with its recommendation score (higher is better)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub game: EnrichedRecord,
    pub recommendation_score: f64,
}

impl ScoredRecord {
    pub fn id(&self) -> &str {
        self.game.id()
    }
}

/// Implicit profile derived from the viewer's own games
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceVector {
    /// Empty when unknown
    pub preferred_category: String,
    pub strength_estimate: Option<f64>,
}

/// Declared profile data of the viewer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerProfile {
    #[serde(alias = "ageGroups", default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

/// One entry of the assembled games feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    #[serde(flatten)]
    pub game: EnrichedRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation_score: Option<f64>,
    pub recommended: bool,
}

impl FeedEntry {
    pub fn id(&self) -> &str {
        self.game.id()
    }
}

impl From<ScoredRecord> for FeedEntry {
    fn from(scored: ScoredRecord) -> Self {
        Self {
            game: scored.game,
            recommendation_score: Some(scored.recommendation_score),
            recommended: true,
        }
    }
}

impl From<EnrichedRecord> for FeedEntry {
    fn from(game: EnrichedRecord) -> Self {
        Self {
            game,
            recommendation_score: None,
            recommended: false,
        }
    }
}

/// Filters chosen by the viewer on the games feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedFilters {
    /// Earliest date (ISO `YYYY-MM-DD`) to show
    #[serde(default)]
    pub date: Option<String>,
    /// Normalized category token the game must have
    #[serde(alias = "ageGroup", default)]
    pub category: Option<String>,
    #[serde(alias = "radius", default)]
    pub radius_km: Option<f64>,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub distance: f64,
    pub strength: f64,
    pub time: f64,
    /// Flat bonus for an exact preferred-category match
    pub category_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            distance: 0.5,
            strength: 0.3,
            time: 0.2,
            category_bonus: 0.2,
        }
    }
}

/// Thresholds of the narrowing pipeline and the similarity classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationPolicy {
    pub base_radius_km: f64,
    pub radius_step_km: f64,
    pub max_radius_km: f64,
    /// Radius widening stops once this many games are inside
    pub min_radius_candidates: usize,
    pub strength_tolerance: f64,
    /// Strength narrowing is skipped when it would leave fewer games
    pub min_strength_candidates: usize,
    pub similar_max_distance_km: f64,
    pub similar_strength_tolerance: f64,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            base_radius_km: 30.0,
            radius_step_km: 10.0,
            max_radius_km: 50.0,
            min_radius_candidates: 3,
            strength_tolerance: 2.0,
            min_strength_candidates: 3,
            similar_max_distance_km: 15.0,
            similar_strength_tolerance: 1.0,
        }
    }
}

/// Finite number from a JSON number or numeric string
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
