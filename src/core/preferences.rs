use std::collections::HashMap;

use crate::core::category::normalize_category;
use crate::models::{GameRecord, PreferenceVector};

/// Derive the viewer's implicit preferences from their own games
///
/// The preferred category is the most frequent non-empty normalized category,
/// ties going to the one seen first. The strength estimate is the mean of all
/// known strengths.
pub fn derive_preferences(history: &[GameRecord], reference_year: i32) -> PreferenceVector {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    let mut strength_sum = 0.0;
    let mut strength_count = 0usize;

    for game in history {
        let normalized = normalize_category(game.category.as_deref(), reference_year);
        if !normalized.is_empty() {
            let count = counts.entry(normalized.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(normalized);
            }
            *count += 1;
        }

        if let Some(strength) = game.strength_value() {
            strength_sum += strength;
            strength_count += 1;
        }
    }

    let mut preferred_category = String::new();
    let mut max_count = 0;
    for category in first_seen {
        let count = counts.get(&category).copied().unwrap_or(0);
        if count > max_count {
            max_count = count;
            preferred_category = category;
        }
    }

    let strength_estimate = (strength_count > 0).then(|| strength_sum / strength_count as f64);

    PreferenceVector {
        preferred_category,
        strength_estimate,
    }
}
