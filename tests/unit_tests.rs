// Unit tests for MatchBuddy

use chrono::{DateTime, TimeZone, Utc};
use matchbuddy::core::{
    category::{leading_integer, normalize_category, selectable_categories},
    distance::{filter_by_distance, haversine_distance},
    filters::{category_is_compatible, strength_within},
    preferences::derive_preferences,
    scoring::{distance_score, strength_score, time_score},
    strength::strength_level,
};
use matchbuddy::models::{GameRecord, GeoPoint};
use matchbuddy::services::{ensure_plus_prefix, sanitize_for_redirect, PhoneError, PhoneInput};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
}

fn game(category: Option<&str>, strength: Option<f64>) -> GameRecord {
    GameRecord {
        category: category.map(str::to_string),
        strength,
        ..GameRecord::new("g")
    }
}

fn located(id: &str, lat: f64, lng: f64) -> GameRecord {
    GameRecord {
        lat: Some(lat),
        lng: Some(lng),
        ..GameRecord::new(id)
    }
}

#[test]
fn test_haversine_distance_zero() {
    let distance = haversine_distance(52.52, 13.405, 52.52, 13.405);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_berlin_to_potsdam() {
    // Berlin to Potsdam is roughly 27 km
    let distance = haversine_distance(52.52, 13.405, 52.3906, 13.0645);
    assert!(distance > 20.0 && distance < 35.0, "got {}", distance);
}

#[test]
fn test_normalize_category() {
    assert_eq!(normalize_category(Some("U12"), 2026), "2014");
    assert_eq!(normalize_category(Some("U9 Junioren"), 2026), "2017");
    assert_eq!(normalize_category(Some("2014"), 2026), "2014");
    assert_eq!(normalize_category(Some("Herren"), 2026), "Herren");
    assert_eq!(normalize_category(None, 2026), "");
}

#[test]
fn test_leading_integer() {
    assert_eq!(leading_integer("2014abc"), Some(2014));
    assert_eq!(leading_integer(" -3"), Some(-3));
    assert_eq!(leading_integer("Herren"), None);
}

#[test]
fn test_selectable_categories() {
    let categories = selectable_categories(2026);
    assert_eq!(categories.len(), 17);
    assert_eq!(categories[0].value, "2020");
    assert_eq!(categories[13].value, "2007");
    assert_eq!(categories[16].value, "Soma");
}

#[test]
fn test_adjacent_birth_years_are_compatible() {
    assert!(category_is_compatible("2015", "2014", None));
    assert!(category_is_compatible("2013", "2014", None));
    assert!(!category_is_compatible("2016", "2014", None));
}

#[test]
fn test_strong_team_boundary() {
    assert!(!category_is_compatible("2016", "2014", Some(6.9)));
    assert!(category_is_compatible("2016", "2014", Some(7.0)));
    assert!(category_is_compatible("2016", "2014", Some(8.0)));
    // Strong teams only reach up, never further down
    assert!(!category_is_compatible("2012", "2014", Some(9.0)));
}

#[test]
fn test_non_numeric_categories() {
    assert!(category_is_compatible("Herren", "Herren", None));
    assert!(!category_is_compatible("Herren", "2014", Some(9.0)));
    assert!(!category_is_compatible("", "2014", None));
    assert!(category_is_compatible("", "", None));
}

#[test]
fn test_strength_within() {
    assert!(strength_within(None, 5.0, 2.0));
    assert!(strength_within(Some(7.0), 5.0, 2.0));
    assert!(!strength_within(Some(7.5), 5.0, 2.0));
}

#[test]
fn test_preferences_from_mixed_history() {
    let history = vec![
        game(Some("U12"), Some(6.0)),
        game(Some("2014"), Some(8.0)),
        game(Some("U13"), Some(5.0)),
        game(None, None),
    ];

    let preferences = derive_preferences(&history, 2026);
    assert_eq!(preferences.preferred_category, "2014");
    let estimate = preferences.strength_estimate.unwrap();
    assert!((estimate - 19.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_preferences_without_data() {
    let preferences = derive_preferences(&[game(None, None)], 2026);
    assert!(preferences.preferred_category.is_empty());
    assert!(preferences.strength_estimate.is_none());
}

#[test]
fn test_distance_score() {
    assert_eq!(distance_score(Some(0.0)), 1.0);
    assert!((distance_score(Some(10.0)) - 0.5).abs() < 1e-9);
    assert_eq!(distance_score(None), 0.5);
}

#[test]
fn test_strength_score() {
    assert!((strength_score(Some(5.0), Some(7.0)) - 0.5).abs() < 1e-9);
    assert_eq!(strength_score(Some(1.0), Some(9.0)), 0.0);
    assert_eq!(strength_score(None, Some(5.0)), 0.6);
    assert_eq!(strength_score(Some(5.0), None), 0.6);
}

#[test]
fn test_time_score() {
    assert!((time_score(Some("2026-10-31T12:00:00Z"), now()) - 0.5).abs() < 1e-9);
    assert_eq!(time_score(Some("2026-09-01"), now()), 0.3);
    assert_eq!(time_score(Some("2027-06-01"), now()), 0.1);
    assert_eq!(time_score(None, now()), 0.4);
    assert_eq!(time_score(Some("next saturday"), now()), 0.4);
}

#[test]
fn test_filter_by_distance_keeps_unlocated_after_nearby() {
    let viewer = GeoPoint::new(52.52, 13.405).unwrap();
    let games = vec![
        GameRecord::new("unlocated"),
        located("munich", 48.1351, 11.582),
        located("near", 52.53, 13.41),
    ];

    let result = filter_by_distance(&games, Some(&viewer), 30.0, 2026);
    let ids: Vec<&str> = result.iter().map(|g| g.id()).collect();
    assert_eq!(ids, vec!["near", "unlocated"]);
}

#[test]
fn test_filter_by_distance_without_viewer() {
    let games = vec![located("a", 48.1351, 11.582), GameRecord::new("b")];

    let result = filter_by_distance(&games, None, 30.0, 2026);
    let ids: Vec<&str> = result.iter().map(|g| g.id()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(result.iter().all(|g| g.distance_km.is_none()));
}

#[test]
fn test_strength_levels() {
    assert_eq!(strength_level(7.6).map(|l| l.value), Some(8));
    assert_eq!(strength_level(-3.0).map(|l| l.value), Some(1));
}

#[test]
fn test_plus_prefix() {
    assert_eq!(ensure_plus_prefix(&PhoneInput::raw("0049 151 123")), "+49151123");
    assert_eq!(
        ensure_plus_prefix(&PhoneInput::structured("+43", "0664 123")),
        "+43664123"
    );
    assert_eq!(ensure_plus_prefix(&PhoneInput::raw("n/a")), "");
}

#[test]
fn test_redirect_number() {
    assert_eq!(
        sanitize_for_redirect(&PhoneInput::raw("0151 1234567"), "+49").unwrap(),
        "491511234567"
    );
    assert_eq!(
        sanitize_for_redirect(&PhoneInput::structured("+44", "07700 900123"), "+49").unwrap(),
        "447700900123"
    );
    assert_eq!(
        sanitize_for_redirect(&PhoneInput::raw(""), "+49"),
        Err(PhoneError::Empty)
    );
}
