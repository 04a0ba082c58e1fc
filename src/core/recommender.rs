use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};

use crate::core::{
    category::normalize_category,
    distance::{enrich, is_within},
    filters::{category_is_compatible, strength_within},
    preferences::derive_preferences,
    scoring::score,
};
use crate::models::{
    EnrichedRecord, GameRecord, GeoPoint, RecommendationPolicy, ScoredRecord, ScoringWeights,
    ViewerProfile,
};

/// Default cap on returned recommendations
pub const DEFAULT_MAX_RESULTS: usize = 6;

/// Recommendation engine - implements the narrowing and ranking pipeline
///
/// # Pipeline Stages
/// 1. Enrichment (normalized category, distance)
/// 2. Radius narrowing, widened until enough games are inside
/// 3. Category narrowing
/// 4. Strength narrowing
/// 5. Scoring, ranking, dedupe and cap
///
/// No stage ever narrows the pool to nothing.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    weights: ScoringWeights,
    policy: RecommendationPolicy,
}

impl Recommender {
    pub fn new(weights: ScoringWeights, policy: RecommendationPolicy) -> Self {
        Self { weights, policy }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn policy(&self) -> &RecommendationPolicy {
        &self.policy
    }

    /// Rank games for the viewer, relative to the current time
    pub fn recommend(
        &self,
        records: &[GameRecord],
        history: &[GameRecord],
        viewer: Option<&GeoPoint>,
        max_results: usize,
    ) -> Vec<ScoredRecord> {
        self.recommend_at(records, history, viewer, max_results, Utc::now())
    }

    /// Rank games for the viewer
    ///
    /// # Arguments
    /// * `records` - Candidate games
    /// * `history` - The viewer's own games, used to derive preferences
    /// * `viewer` - The viewer's location, if known
    /// * `max_results` - Maximum number of games to return
    /// * `now` - Reference time for date scoring and category normalization
    ///
    /// # Returns
    /// Games ordered by descending score, unique by id
    pub fn recommend_at(
        &self,
        records: &[GameRecord],
        history: &[GameRecord],
        viewer: Option<&GeoPoint>,
        max_results: usize,
        now: DateTime<Utc>,
    ) -> Vec<ScoredRecord> {
        if records.is_empty() {
            return Vec::new();
        }

        let reference_year = now.year();
        let preferences = derive_preferences(history, reference_year);

        let mut candidates: Vec<EnrichedRecord> = records
            .iter()
            .map(|record| enrich(record, viewer, reference_year))
            .collect();

        // Stage 2: radius narrowing
        if viewer.is_some() {
            candidates = self.narrow_by_radius(candidates);
        }

        // Stage 3: category narrowing
        if !preferences.preferred_category.is_empty() {
            let compatible: Vec<EnrichedRecord> = candidates
                .iter()
                .filter(|game| {
                    category_is_compatible(
                        &game.normalized_category,
                        &preferences.preferred_category,
                        preferences.strength_estimate,
                    )
                })
                .cloned()
                .collect();

            if compatible.is_empty() {
                tracing::debug!(
                    "No game compatible with category {}, skipping category narrowing",
                    preferences.preferred_category
                );
            } else {
                candidates = compatible;
            }
        }

        // Stage 4: strength narrowing
        if let Some(estimate) = preferences.strength_estimate {
            let similar: Vec<EnrichedRecord> = candidates
                .iter()
                .filter(|game| {
                    strength_within(game.record.strength_value(), estimate, self.policy.strength_tolerance)
                })
                .cloned()
                .collect();

            if similar.len() >= self.policy.min_strength_candidates {
                candidates = similar;
            } else {
                tracing::debug!(
                    "Only {} games near strength {:.1}, skipping strength narrowing",
                    similar.len(),
                    estimate
                );
            }
        }

        // Stage 5: score and rank
        let mut scored: Vec<ScoredRecord> = candidates
            .into_iter()
            .map(|game| score(game, &preferences, viewer, &self.weights, now))
            .collect();

        scored.sort_by(|a, b| {
            b.recommendation_score
                .partial_cmp(&a.recommendation_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut seen = HashSet::new();
        let mut unique: Vec<ScoredRecord> = scored
            .into_iter()
            .filter(|game| seen.insert(game.id().to_string()))
            .collect();
        unique.truncate(max_results);

        tracing::debug!(
            "Recommended {} of {} games (preferred category: {:?}, strength: {:?})",
            unique.len(),
            records.len(),
            preferences.preferred_category,
            preferences.strength_estimate
        );

        unique
    }

    /// Widen the radius step by step until enough games are inside
    ///
    /// Games without a distance are always kept next to the radius set. When
    /// even the widest radius holds no game, the pool stays untouched.
    fn narrow_by_radius(&self, candidates: Vec<EnrichedRecord>) -> Vec<EnrichedRecord> {
        let count_within = |radius: f64| candidates.iter().filter(|g| is_within(g, radius)).count();

        let mut radius = self.policy.base_radius_km;
        let mut inside = count_within(radius);
        while inside < self.policy.min_radius_candidates && radius < self.policy.max_radius_km {
            let next = (radius + self.policy.radius_step_km).min(self.policy.max_radius_km);
            // Non-positive steps never reach the maximum
            if next <= radius || next.is_nan() {
                break;
            }
            radius = next;
            inside = count_within(radius);
        }

        if inside == 0 {
            tracing::trace!("No game within {} km, keeping all {} games", radius, candidates.len());
            return candidates;
        }

        tracing::trace!("{} games within {} km", inside, radius);
        let (mut kept, unlocated): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .filter(|game| game.distance_km.is_none() || is_within(game, radius))
            .partition(|game| game.distance_km.is_some());
        kept.extend(unlocated);
        kept
    }

    /// Classify a single game as a top match, relative to the current time
    pub fn is_highly_similar(
        &self,
        record: &GameRecord,
        profile: Option<&ViewerProfile>,
        history: &[GameRecord],
        viewer: Option<&GeoPoint>,
    ) -> bool {
        self.is_highly_similar_at(record, profile, history, viewer, Utc::now())
    }

    /// Classify a single game as a top match
    ///
    /// The category must be compatible with the viewer's preferred category
    /// (from history, else the first declared profile category). Distance and
    /// strength must be close when they can be determined; checks whose
    /// inputs are unknown pass.
    pub fn is_highly_similar_at(
        &self,
        record: &GameRecord,
        profile: Option<&ViewerProfile>,
        history: &[GameRecord],
        viewer: Option<&GeoPoint>,
        now: DateTime<Utc>,
    ) -> bool {
        let reference_year = now.year();
        let game = enrich(record, viewer, reference_year);
        let preferences = derive_preferences(history, reference_year);

        let preferred_category = if preferences.preferred_category.is_empty() {
            profile
                .and_then(|p| p.categories.first())
                .map(|c| normalize_category(Some(c), reference_year))
                .unwrap_or_default()
        } else {
            preferences.preferred_category
        };

        let category_match = category_is_compatible(
            &game.normalized_category,
            &preferred_category,
            preferences.strength_estimate,
        );

        let strength_match = match (record.strength_value(), preferences.strength_estimate) {
            (Some(strength), Some(estimate)) => {
                (strength - estimate).abs() <= self.policy.similar_strength_tolerance
            }
            _ => true,
        };

        let region_match = match (viewer, game.distance_km) {
            (Some(_), Some(distance)) => distance <= self.policy.similar_max_distance_km,
            _ => true,
        };

        category_match && region_match && strength_match
    }
}
