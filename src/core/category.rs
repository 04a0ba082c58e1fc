use serde::Serialize;

/// Youngest and oldest youth age offered when creating a game
const YOUTH_AGE_RANGE: std::ops::RangeInclusive<i32> = 6..=19;

/// Adult categories offered after the youth birth years
const ADULT_CATEGORIES: [&str; 3] = ["Herren", "Damen", "Soma"];

/// A category offered for selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub label: String,
    pub value: String,
}

/// Normalize an age-group label (e.g. "U12") to a comparable birth-year token
///
/// "U" followed by one or two digits becomes `reference_year - age`; anything
/// after the digits is ignored. Values that are not in that form are returned
/// unchanged, and a missing value becomes the empty string.
pub fn normalize_category(value: Option<&str>, reference_year: i32) -> String {
    let Some(raw) = value else {
        return String::new();
    };

    match under_age(raw) {
        Some(age) => (reference_year - age).to_string(),
        None => raw.to_string(),
    }
}

/// Age of a "U<age>" label
fn under_age(raw: &str) -> Option<i32> {
    let rest = raw.strip_prefix('U').or_else(|| raw.strip_prefix('u'))?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).take(2).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse the integer prefix of a string
///
/// Leading whitespace and one sign are allowed; parsing stops at the first
/// non-digit. Returns `None` when no digit follows.
pub fn leading_integer(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Categories a coach can pick: youth birth years (youngest first), then adults
pub fn selectable_categories(reference_year: i32) -> Vec<CategoryOption> {
    YOUTH_AGE_RANGE
        .map(|age| {
            let birth_year = (reference_year - age).to_string();
            CategoryOption {
                label: birth_year.clone(),
                value: birth_year,
            }
        })
        .chain(ADULT_CATEGORIES.iter().map(|name| CategoryOption {
            label: name.to_string(),
            value: name.to_string(),
        }))
        .collect()
}
