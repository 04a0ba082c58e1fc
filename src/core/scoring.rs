use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::{EnrichedRecord, GeoPoint, PreferenceVector, ScoredRecord, ScoringWeights};

/// Neutral contributions for unknown inputs
const NEUTRAL_DISTANCE_SCORE: f64 = 0.5;
const NEUTRAL_STRENGTH_SCORE: f64 = 0.6;
const NEUTRAL_TIME_SCORE: f64 = 0.4;

/// Score for games today or in the past
const PAST_TIME_SCORE: f64 = 0.3;
/// Score for games at or beyond the horizon
const DISTANT_TIME_SCORE: f64 = 0.1;
const TIME_HORIZON_DAYS: f64 = 60.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Calculate the recommendation score of a game
///
/// Scoring formula:
/// score = (
///     distance_score * 0.5 +      # 1 / (1 + km/10), 0.5 if unknown
///     strength_score * 0.3 +      # 1 - |Δ|/4 floored at 0, 0.6 if unknown
///     time_score * 0.2 +          # Sooner = higher, 0.4 if unknown
///     category_bonus              # +0.2 on exact preferred category
/// )
///
/// The sum is not clamped; the bonus acts as a tie-breaking boost.
pub fn score(
    game: EnrichedRecord,
    preferences: &PreferenceVector,
    viewer: Option<&GeoPoint>,
    weights: &ScoringWeights,
    now: DateTime<Utc>,
) -> ScoredRecord {
    let distance = distance_score(viewer.and(game.distance_km));
    let strength = strength_score(game.record.strength_value(), preferences.strength_estimate);
    let time = time_score(game.record.date.as_deref(), now);
    let bonus = if category_matches(&game.normalized_category, &preferences.preferred_category) {
        weights.category_bonus
    } else {
        0.0
    };

    let recommendation_score =
        distance * weights.distance + strength * weights.strength + time * weights.time + bonus;

    ScoredRecord {
        game,
        recommendation_score,
    }
}

/// Distance score (0-1]
/// Closer distance = higher score, hyperbolic decay
#[inline]
pub fn distance_score(distance_km: Option<f64>) -> f64 {
    match distance_km {
        Some(d) => 1.0 / (1.0 + d / 10.0),
        None => NEUTRAL_DISTANCE_SCORE,
    }
}

/// Strength similarity score (0-1)
#[inline]
pub fn strength_score(strength: Option<f64>, estimate: Option<f64>) -> f64 {
    match (strength, estimate) {
        (Some(strength), Some(estimate)) => {
            let delta = (strength - estimate).abs();
            (1.0 - (delta / 4.0).min(1.0)).max(0.0)
        }
        _ => NEUTRAL_STRENGTH_SCORE,
    }
}

/// Date proximity score
/// Games in the near future score highest, decaying linearly to the horizon
pub fn time_score(date: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(target) = date.and_then(parse_game_date) else {
        return NEUTRAL_TIME_SCORE;
    };

    let days = (target - now).num_milliseconds() as f64 / MILLIS_PER_DAY;
    if days <= 0.0 {
        PAST_TIME_SCORE
    } else if days >= TIME_HORIZON_DAYS {
        DISTANT_TIME_SCORE
    } else {
        1.0 - days / TIME_HORIZON_DAYS
    }
}

#[inline]
fn category_matches(normalized: &str, preferred: &str) -> bool {
    !preferred.is_empty() && normalized == preferred
}

/// Parse a game date
///
/// Accepts RFC 3339 timestamps, naive date-times (read as UTC) and plain
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_game_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
