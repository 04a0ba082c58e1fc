use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Country code assumed when none is given
pub const DEFAULT_COUNTRY_CODE: &str = "+49";

/// Country codes that are two digits long, used to split ambiguous prefixes
const TWO_DIGIT_CODES: [&str; 44] = [
    "20", "27", "30", "31", "32", "33", "34", "36", "39", "40", "41", "43", "44", "45", "46",
    "47", "48", "49", "51", "52", "53", "54", "55", "56", "57", "58", "60", "61", "62", "63",
    "64", "65", "66", "81", "82", "84", "86", "90", "91", "92", "93", "94", "95", "98",
];

/// Longest digit string still treated as missing its country code
const MAX_LOCAL_DIGITS: usize = 12;

/// Errors that can occur when normalizing a phone number
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Phone number is empty")]
    Empty,

    #[error("Phone number contains no digits")]
    NoDigits,
}

/// Phone number as stored on a trainer profile
///
/// Older profiles store a single string, newer ones a country code and a
/// local number. Both shapes are accepted here and nowhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhoneInput {
    Structured {
        #[serde(rename = "countryCode", default, deserialize_with = "text_or_number")]
        country_code: Option<String>,
        #[serde(default, deserialize_with = "text_or_number")]
        number: Option<String>,
    },
    Raw(String),
}

impl PhoneInput {
    pub fn structured(country_code: impl Into<String>, number: impl Into<String>) -> Self {
        PhoneInput::Structured {
            country_code: Some(country_code.into()),
            number: Some(number.into()),
        }
    }

    pub fn raw(value: impl Into<String>) -> Self {
        PhoneInput::Raw(value.into())
    }
}

/// Phone number split into country code and local number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneParts {
    /// Always starts with `+`
    pub country_code: String,
    /// Digits only
    pub number: String,
}

impl PhoneParts {
    fn new(country_code: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            number: number.into(),
        }
    }
}

/// Split a phone number into country code and local number
///
/// Strings starting with `+` (or `00`) are split by guessing the country code
/// length: the fallback code wins when it matches, then North America for a
/// leading 1, then known two-digit codes, else the longest (three digit)
/// candidate. Strings without a prefix get the fallback code.
pub fn to_phone_parts(input: Option<&PhoneInput>, fallback_country_code: &str) -> PhoneParts {
    let Some(input) = input else {
        return PhoneParts::new(fallback_country_code, "");
    };

    let raw = match input {
        PhoneInput::Structured {
            country_code,
            number,
        } => {
            return PhoneParts::new(
                sanitize_country_code(country_code.as_deref(), fallback_country_code),
                sanitize_number(number.as_deref().unwrap_or("")),
            );
        }
        PhoneInput::Raw(raw) => raw.trim(),
    };

    if raw.is_empty() {
        return PhoneParts::new(fallback_country_code, "");
    }

    let normalized = match raw.strip_prefix("00") {
        Some(rest) => format!("+{}", rest),
        None => raw.to_string(),
    };

    let Some(international) = normalized.strip_prefix('+') else {
        return PhoneParts::new(fallback_country_code, sanitize_number(&normalized));
    };

    let digits = digits_of(international);
    if digits.is_empty() {
        return PhoneParts::new(fallback_country_code, "");
    }

    // (code, rest) for code lengths 1..=3 that leave at least one digit
    let candidates: Vec<(&str, &str)> = (1..=3)
        .filter(|len| *len < digits.len())
        .map(|len| digits.split_at(len))
        .collect();

    let Some(&(longest_code, longest_rest)) = candidates.last() else {
        return PhoneParts::new(format!("+{}", digits), "");
    };

    let fallback = sanitize_country_code(Some(fallback_country_code), DEFAULT_COUNTRY_CODE);
    if let Some((code, rest)) = candidates.iter().find(|(code, _)| fallback[1..] == **code) {
        return PhoneParts::new(format!("+{}", code), *rest);
    }

    if let Some((code, rest)) = candidates.iter().find(|(code, _)| *code == "1") {
        return PhoneParts::new(format!("+{}", code), *rest);
    }

    if longest_code.len() == 3 {
        let (first_two, third) = longest_code.split_at(2);
        if TWO_DIGIT_CODES.contains(&first_two) {
            return PhoneParts::new(format!("+{}", first_two), format!("{}{}", third, longest_rest));
        }
    }

    PhoneParts::new(format!("+{}", longest_code), longest_rest)
}

/// Format a phone number as `+<digits>`, or an empty string when there is no number
pub fn ensure_plus_prefix(input: &PhoneInput) -> String {
    match input {
        PhoneInput::Structured {
            country_code,
            number,
        } => {
            let number = sanitize_number(number.as_deref().unwrap_or(""));
            if number.is_empty() {
                return String::new();
            }
            let code = country_code
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(DEFAULT_COUNTRY_CODE);
            format!("+{}{}", digits_of(code), number)
        }
        PhoneInput::Raw(raw) => {
            let raw = raw.trim();
            let digits = match raw.strip_prefix("00") {
                Some(rest) => digits_of(rest),
                None => digits_of(raw),
            };
            if digits.is_empty() {
                String::new()
            } else {
                format!("+{}", digits)
            }
        }
    }
}

/// Digits-only international number for a wa.me redirect
///
/// Structured numbers use their own country code (or the default when it is
/// missing). Plain strings shorter than 13 digits that do not already start
/// with the default code get it prepended.
pub fn sanitize_for_redirect(input: &PhoneInput, default_country_code: &str) -> Result<String, PhoneError> {
    let default_digits = digits_of(default_country_code);

    let combined = match input {
        PhoneInput::Structured {
            country_code,
            number,
        } => {
            let number = sanitize_number(number.as_deref().unwrap_or(""));
            if number.is_empty() {
                return Err(PhoneError::Empty);
            }
            let code = country_code.as_deref().map(digits_of).unwrap_or_default();
            let code = if code.is_empty() { default_digits } else { code };
            format!("{}{}", code, number)
        }
        PhoneInput::Raw(raw) => {
            if raw.trim().is_empty() {
                return Err(PhoneError::Empty);
            }
            let digits = digits_of(raw).trim_start_matches('0').to_string();
            if digits.is_empty() {
                return Err(PhoneError::NoDigits);
            }
            if !digits.starts_with(&default_digits) && digits.len() <= MAX_LOCAL_DIGITS {
                format!("{}{}", default_digits, digits)
            } else {
                digits
            }
        }
    };

    let sanitized = combined.trim_start_matches('0').to_string();
    if sanitized.is_empty() {
        return Err(PhoneError::NoDigits);
    }
    Ok(sanitized)
}

/// `+<digits>` country code, falling back when the value is blank
fn sanitize_country_code(value: Option<&str>, fallback: &str) -> String {
    let raw = value.unwrap_or("").trim();
    if raw.is_empty() {
        return fallback.to_string();
    }
    match raw.strip_prefix("00") {
        Some(rest) => format!("+{}", digits_of(rest)),
        None => format!("+{}", digits_of(raw)),
    }
}

/// Digits of a local number without leading zeros
fn sanitize_number(value: &str) -> String {
    digits_of(value).trim_start_matches('0').to_string()
}

fn digits_of(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
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
