use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};

use crate::core::{
    distance::filter_by_distance,
    filters::{feed_radius, matches_feed_filters},
    recommender::Recommender,
    scoring::parse_game_date,
};
use crate::models::{FeedEntry, FeedFilters, GameRecord, GeoPoint, ViewerProfile};

/// Cap on recommended games mixed into the feed
pub const FEED_RECOMMENDATIONS: usize = 8;

/// Everything needed to assemble a viewer's feed
#[derive(Debug, Clone, Copy)]
pub struct FeedContext<'a> {
    pub games: &'a [GameRecord],
    /// The viewer's own games
    pub history: &'a [GameRecord],
    pub profile: Option<&'a ViewerProfile>,
    pub viewer: Option<&'a GeoPoint>,
    pub filters: &'a FeedFilters,
}

/// Assemble the games feed
///
/// Upcoming games are narrowed by distance, recommendations are computed when
/// the viewer has a profile, the viewer's filters are applied to both lists,
/// the viewer's own games are removed, and the merged list is ordered by date.
pub fn build_feed(recommender: &Recommender, context: FeedContext<'_>, now: DateTime<Utc>) -> Vec<FeedEntry> {
    if context.games.is_empty() {
        return Vec::new();
    }

    let reference_year = now.year();
    let today = now.format("%Y-%m-%d").to_string();
    let games = upcoming(context.games, &today);

    let location = context
        .viewer
        .or_else(|| context.profile.and_then(|p| p.location.as_ref()));
    let radius = feed_radius(context.filters);

    let distance_aware = filter_by_distance(&games, location, radius, reference_year);

    let recommended: Vec<FeedEntry> = if context.profile.is_some() {
        let pool: Vec<GameRecord> = distance_aware.iter().map(|g| g.record.clone()).collect();
        recommender
            .recommend_at(&pool, context.history, location, FEED_RECOMMENDATIONS, now)
            .into_iter()
            .map(FeedEntry::from)
            .collect()
    } else {
        Vec::new()
    };

    let own_ids: HashSet<&str> = context.history.iter().map(|g| g.id.as_str()).collect();
    let visible = |entry: &FeedEntry| {
        !own_ids.contains(entry.id())
            && matches_feed_filters(&entry.game, context.filters, location.is_some(), reference_year)
    };

    let recommended: Vec<FeedEntry> = recommended.into_iter().filter(|e| visible(e)).collect();
    let base: Vec<FeedEntry> = distance_aware
        .into_iter()
        .map(FeedEntry::from)
        .filter(|e| visible(e))
        .collect();

    tracing::debug!(
        "Feed built from {} games: {} recommended, {} base",
        context.games.len(),
        recommended.len(),
        base.len()
    );

    let mut feed = merge_recommended(recommended, base);
    sort_by_upcoming_date(&mut feed);
    feed
}

/// Games without a date or dated today or later
///
/// Falls back to every game when none is upcoming.
pub fn upcoming(games: &[GameRecord], today: &str) -> Vec<GameRecord> {
    let future: Vec<GameRecord> = games
        .iter()
        .filter(|game| match game.date.as_deref() {
            None | Some("") => true,
            Some(date) => date >= today,
        })
        .cloned()
        .collect();

    if future.is_empty() {
        games.to_vec()
    } else {
        future
    }
}

/// Recommended entries first, then base entries, unique by id
pub fn merge_recommended(recommended: Vec<FeedEntry>, base: Vec<FeedEntry>) -> Vec<FeedEntry> {
    let mut seen = HashSet::new();
    recommended
        .into_iter()
        .chain(base)
        .filter(|entry| seen.insert(entry.id().to_string()))
        .collect()
}

/// Stable sort by game date, undated games last, ties by creation time
pub fn sort_by_upcoming_date(entries: &mut [FeedEntry]) {
    entries.sort_by_cached_key(|entry| {
        let timestamp = entry
            .game
            .record
            .date
            .as_deref()
            .and_then(parse_game_date)
            .map(|d| d.timestamp_millis())
            .unwrap_or(i64::MAX);
        (timestamp, entry.game.record.created_seconds())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreationMarker, EnrichedRecord};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
    }

    fn dated(id: &str, date: Option<&str>) -> GameRecord {
        GameRecord {
            date: date.map(str::to_string),
            ..GameRecord::new(id)
        }
    }

    fn entry(id: &str, date: Option<&str>, created: i64) -> FeedEntry {
        FeedEntry::from(EnrichedRecord {
            record: GameRecord {
                created_at: Some(CreationMarker::Seconds(created)),
                ..dated(id, date)
            },
            normalized_category: String::new(),
            distance_km: None,
        })
    }

    #[test]
    fn test_upcoming_drops_past_games() {
        let games = vec![
            dated("past", Some("2026-09-30")),
            dated("today", Some("2026-10-01")),
            dated("undated", None),
        ];
        let result = upcoming(&games, "2026-10-01");
        let ids: Vec<&str> = result.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["today", "undated"]);
    }

    #[test]
    fn test_upcoming_falls_back_to_all() {
        let games = vec![dated("past", Some("2026-09-30"))];
        assert_eq!(upcoming(&games, "2026-10-01").len(), 1);
    }

    #[test]
    fn test_merge_prefers_recommended_copy() {
        let mut recommended = entry("a", None, 0);
        recommended.recommended = true;
        let merged = merge_recommended(vec![recommended], vec![entry("a", None, 0), entry("b", None, 0)]);

        assert_eq!(merged.len(), 2);
        assert!(merged[0].recommended);
        assert_eq!(merged[1].id(), "b");
    }

    #[test]
    fn test_sort_by_upcoming_date() {
        let mut entries = vec![
            entry("undated", None, 1),
            entry("later", Some("2026-10-20"), 1),
            entry("sooner-newer", Some("2026-10-05"), 20),
            entry("sooner-older", Some("2026-10-05"), 10),
        ];
        sort_by_upcoming_date(&mut entries);
        let ids: Vec<&str> = entries.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["sooner-older", "sooner-newer", "later", "undated"]);
    }

    #[test]
    fn test_feed_excludes_own_games() {
        let recommender = Recommender::default();
        let games = vec![dated("own", Some("2026-10-10")), dated("other", Some("2026-10-11"))];
        let history = vec![dated("own", Some("2026-10-10"))];
        let filters = FeedFilters::default();
        let profile = ViewerProfile::default();

        let feed = build_feed(
            &recommender,
            FeedContext {
                games: &games,
                history: &history,
                profile: Some(&profile),
                viewer: None,
                filters: &filters,
            },
            now(),
        );

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id(), "other");
        assert!(feed[0].recommended);
    }

    #[test]
    fn test_feed_without_profile_has_no_recommendations() {
        let recommender = Recommender::default();
        let games = vec![dated("a", Some("2026-10-10"))];
        let filters = FeedFilters::default();

        let feed = build_feed(
            &recommender,
            FeedContext {
                games: &games,
                history: &[],
                profile: None,
                viewer: None,
                filters: &filters,
            },
            now(),
        );

        assert_eq!(feed.len(), 1);
        assert!(!feed[0].recommended);
        assert_eq!(feed[0].recommendation_score, None);
    }
}
