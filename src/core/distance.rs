use crate::core::category::normalize_category;
use crate::models::{EnrichedRecord, GameRecord, GeoPoint, DERIVED_FIELDS};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default radius for `filter_by_distance`
pub const DEFAULT_FILTER_RADIUS_KM: f64 = 30.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance from the viewer to a game, when both locations are known
#[inline]
pub fn distance_to(viewer: Option<&GeoPoint>, record: &GameRecord) -> Option<f64> {
    let viewer = viewer?;
    let game = record.coordinates()?;
    let distance = haversine_distance(viewer.lat, viewer.lng, game.lat, game.lng);
    distance.is_finite().then_some(distance)
}

/// Attach the normalized category and the viewer distance to a game
pub fn enrich(record: &GameRecord, viewer: Option<&GeoPoint>, reference_year: i32) -> EnrichedRecord {
    let mut record = record.clone();
    for key in DERIVED_FIELDS {
        record.extra.remove(key);
    }

    EnrichedRecord {
        normalized_category: normalize_category(record.category.as_deref(), reference_year),
        distance_km: distance_to(viewer, &record),
        record,
    }
}

/// Enrich every game and narrow the list to the viewer's radius
///
/// Without a viewer location nothing is filtered. Otherwise games inside the
/// radius come first, followed by games without coordinates. When no game is
/// inside the radius, all games with a known distance are returned
/// nearest-first instead, and when no distance is known at all the whole
/// enriched list is returned.
pub fn filter_by_distance(
    records: &[GameRecord],
    viewer: Option<&GeoPoint>,
    max_radius_km: f64,
    reference_year: i32,
) -> Vec<EnrichedRecord> {
    let enriched: Vec<EnrichedRecord> = records
        .iter()
        .map(|record| enrich(record, viewer, reference_year))
        .collect();

    if viewer.is_none() {
        return enriched;
    }

    narrow_to_radius(enriched, max_radius_km)
}

fn narrow_to_radius(enriched: Vec<EnrichedRecord>, max_radius_km: f64) -> Vec<EnrichedRecord> {
    let within_radius = enriched
        .iter()
        .filter(|game| is_within(game, max_radius_km))
        .count();

    if within_radius > 0 {
        let (mut kept, unlocated): (Vec<_>, Vec<_>) = enriched
            .into_iter()
            .filter(|game| game.distance_km.is_none() || is_within(game, max_radius_km))
            .partition(|game| game.distance_km.is_some());
        kept.extend(unlocated);
        return kept;
    }

    let mut located: Vec<EnrichedRecord> = enriched
        .iter()
        .filter(|game| game.distance_km.is_some())
        .cloned()
        .collect();

    if located.is_empty() {
        tracing::trace!("No game has a known distance, returning all {} games", enriched.len());
        return enriched;
    }

    tracing::trace!(
        "No game within {} km, falling back to {} games nearest-first",
        max_radius_km,
        located.len()
    );
    sort_nearest_first(&mut located);
    located
}

/// Whether a game has a known distance within the radius
#[inline]
pub fn is_within(game: &EnrichedRecord, radius_km: f64) -> bool {
    game.distance_km.is_some_and(|d| d <= radius_km)
}

/// Stable sort by ascending distance, unknown distances last
pub fn sort_nearest_first(games: &mut [EnrichedRecord]) {
    games.sort_by(|a, b| {
        let a = a.distance_km.unwrap_or(f64::INFINITY);
        let b = b.distance_km.unwrap_or(f64::INFINITY);
        a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
    });
}
