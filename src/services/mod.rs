// Service exports
pub mod contact;
pub mod phone;
pub mod rate_limit;
pub mod whatsapp;

pub use contact::{ContactError, ContactRedirect, ContactService};
pub use phone::{ensure_plus_prefix, sanitize_for_redirect, to_phone_parts, PhoneError, PhoneInput, PhoneParts};
pub use rate_limit::{RateDecision, RateLimiter};
pub use whatsapp::{build_whatsapp_url, contact_redirect_url, secure_contact_path};
