use crate::core::category::{leading_integer, normalize_category};
use crate::models::{EnrichedRecord, FeedFilters};

/// Strength from which a team is considered strong enough to play older
const STRONG_TEAM_STRENGTH: f64 = 7.0;

/// Default radius of the feed location filter
pub const DEFAULT_FEED_RADIUS_KM: f64 = 25.0;

/// Check whether a game's category suits the viewer's preferred category
///
/// Birth years one apart are compatible. Strong teams (estimate of 7 or more)
/// are additionally compatible with any category token numerically at or
/// above their own.
#[inline]
pub fn category_is_compatible(
    candidate: &str,
    preferred: &str,
    strength_estimate: Option<f64>,
) -> bool {
    if preferred.is_empty() {
        return true;
    }
    if candidate.is_empty() {
        return false;
    }
    if candidate == preferred {
        return true;
    }

    let (Some(candidate_year), Some(preferred_year)) =
        (leading_integer(candidate), leading_integer(preferred))
    else {
        return false;
    };

    if candidate_year.abs_diff(preferred_year) <= 1 {
        return true;
    }

    let is_strong = strength_estimate.is_some_and(|s| s >= STRONG_TEAM_STRENGTH);
    is_strong && candidate_year >= preferred_year
}

/// Radius of the feed location filter, falling back to the default when unset or zero
pub fn feed_radius(filters: &FeedFilters) -> f64 {
    filters
        .radius_km
        .filter(|r| *r != 0.0 && !r.is_nan())
        .unwrap_or(DEFAULT_FEED_RADIUS_KM)
}

/// Check whether a game's strength is unknown or within `tolerance` of the estimate
#[inline]
pub fn strength_within(strength: Option<f64>, estimate: f64, tolerance: f64) -> bool {
    match strength {
        Some(strength) => (strength - estimate).abs() <= tolerance,
        None => true,
    }
}

/// Check a feed entry against the viewer's feed filters
///
/// Games dated before the filter date, games of another category and, when
/// the viewer is located, games known to be beyond the radius are dropped.
/// Missing values never exclude a game.
pub fn matches_feed_filters(
    game: &EnrichedRecord,
    filters: &FeedFilters,
    location_known: bool,
    reference_year: i32,
) -> bool {
    if let (Some(from), Some(date)) = (non_empty(&filters.date), non_empty(&game.record.date)) {
        if date < from {
            return false;
        }
    }

    if let Some(category) = non_empty(&filters.category) {
        let normalized = normalize_category(game.record.category.as_deref(), reference_year);
        if normalized != category {
            return false;
        }
    }

    if location_known {
        let radius = feed_radius(filters);
        if game.distance_km.is_some_and(|d| d > radius) {
            return false;
        }
    }

    true
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameRecord;

    fn entry(date: Option<&str>, category: Option<&str>, distance_km: Option<f64>) -> EnrichedRecord {
        EnrichedRecord {
            record: GameRecord {
                date: date.map(str::to_string),
                category: category.map(str::to_string),
                ..GameRecord::new("g")
            },
            normalized_category: String::new(),
            distance_km,
        }
    }

    #[test]
    fn test_no_preference_accepts_everything() {
        assert!(category_is_compatible("", "", None));
        assert!(category_is_compatible("2014", "", None));
    }

    #[test]
    fn test_missing_candidate_category() {
        assert!(!category_is_compatible("", "2014", None));
    }

    #[test]
    fn test_exact_and_adjacent_years() {
        assert!(category_is_compatible("Herren", "Herren", None));
        assert!(category_is_compatible("2013", "2014", None));
        assert!(category_is_compatible("2015", "2014", None));
        assert!(!category_is_compatible("2016", "2014", None));
    }

    #[test]
    fn test_unparseable_years_are_incompatible() {
        assert!(!category_is_compatible("Damen", "2014", Some(9.0)));
        assert!(!category_is_compatible("2014", "Herren", None));
    }

    #[test]
    fn test_strong_team_relaxation() {
        assert!(category_is_compatible("2017", "2014", Some(7.0)));
        assert!(!category_is_compatible("2017", "2014", Some(6.9)));
        assert!(!category_is_compatible("2011", "2014", Some(9.0)));
        assert!(!category_is_compatible("2017", "2014", None));
    }

    #[test]
    fn test_extreme_year_tokens_do_not_overflow() {
        assert!(!category_is_compatible("9223372036854775807", "-1", None));
        assert!(!category_is_compatible("-9223372036854775808", "1", Some(9.0)));
        assert!(category_is_compatible("9223372036854775807", "-1", Some(7.0)));
        assert!(category_is_compatible("9223372036854775807", "9223372036854775806", None));
    }

    #[test]
    fn test_strength_tolerance_boundary() {
        assert!(strength_within(Some(7.0), 5.0, 2.0));
        assert!(!strength_within(Some(8.0), 5.0, 2.0));
        assert!(strength_within(None, 5.0, 2.0));
    }

    #[test]
    fn test_feed_filter_date() {
        let filters = FeedFilters {
            date: Some("2026-11-01".to_string()),
            ..FeedFilters::default()
        };
        assert!(!matches_feed_filters(&entry(Some("2026-10-30"), None, None), &filters, false, 2026));
        assert!(matches_feed_filters(&entry(Some("2026-11-01"), None, None), &filters, false, 2026));
        assert!(matches_feed_filters(&entry(None, None, None), &filters, false, 2026));
    }

    #[test]
    fn test_feed_filter_category() {
        let filters = FeedFilters {
            category: Some("2014".to_string()),
            ..FeedFilters::default()
        };
        assert!(matches_feed_filters(&entry(None, Some("U12"), None), &filters, false, 2026));
        assert!(!matches_feed_filters(&entry(None, Some("U13"), None), &filters, false, 2026));
        assert!(!matches_feed_filters(&entry(None, None, None), &filters, false, 2026));
    }

    #[test]
    fn test_feed_filter_radius() {
        let filters = FeedFilters::default();
        assert!(matches_feed_filters(&entry(None, None, Some(25.0)), &filters, true, 2026));
        assert!(!matches_feed_filters(&entry(None, None, Some(26.0)), &filters, true, 2026));
        assert!(matches_feed_filters(&entry(None, None, Some(26.0)), &filters, false, 2026));
        assert!(matches_feed_filters(&entry(None, None, None), &filters, true, 2026));
    }

    #[test]
    fn test_zero_feed_radius_uses_default() {
        let filters = FeedFilters {
            radius_km: Some(0.0),
            ..FeedFilters::default()
        };
        assert_eq!(feed_radius(&filters), DEFAULT_FEED_RADIUS_KM);
        assert!(matches_feed_filters(&entry(None, None, Some(20.0)), &filters, true, 2026));
        assert!(!matches_feed_filters(&entry(None, None, Some(26.0)), &filters, true, 2026));

        let narrow = FeedFilters {
            radius_km: Some(10.0),
            ..FeedFilters::default()
        };
        assert_eq!(feed_radius(&narrow), 10.0);
    }
}
