use crate::services::phone::{ensure_plus_prefix, PhoneInput};

const WHATSAPP_BASE_URL: &str = "https://wa.me/";

/// Chat link for a phone number, with an optional prefilled message
///
/// Returns `None` when the phone number is empty.
pub fn build_whatsapp_url(phone: &PhoneInput, message: &str) -> Option<String> {
    let normalized = ensure_plus_prefix(phone);
    if normalized.is_empty() {
        return None;
    }
    Some(with_text(format!("{}{}", WHATSAPP_BASE_URL, normalized), message))
}

/// Redirect target for an already sanitized, digits-only number
pub fn contact_redirect_url(digits: &str, text: Option<&str>) -> String {
    with_text(format!("{}{}", WHATSAPP_BASE_URL, digits), text.unwrap_or(""))
}

/// Relative path of the contact redirect for a trainer
///
/// Returns an empty string when the trainer id is empty.
pub fn secure_contact_path(trainer_id: &str, message: &str) -> String {
    if trainer_id.is_empty() {
        return String::new();
    }
    with_text(format!("/contact/{}", urlencoding::encode(trainer_id)), message)
}

fn with_text(base: String, message: &str) -> String {
    if message.is_empty() {
        base
    } else {
        format!("{}?text={}", base, urlencoding::encode(message))
    }
}
