use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::services::phone::{sanitize_for_redirect, PhoneError, PhoneInput};
use crate::services::rate_limit::{RateDecision, RateLimiter};
use crate::services::whatsapp::contact_redirect_url;

/// Errors that can occur when issuing a contact redirect
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),

    #[error("Too many requests, retry in {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },
}

/// A WhatsApp redirect ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRedirect {
    pub url: String,
    pub contact_id: uuid::Uuid,
}

/// Issues rate limited WhatsApp redirects
///
/// Holds the only mutable state of the service: the per-client limiter.
#[derive(Debug)]
pub struct ContactService {
    limiter: Mutex<RateLimiter>,
    default_country_code: String,
}

impl ContactService {
    pub fn new(limiter: RateLimiter, default_country_code: impl Into<String>) -> Self {
        Self {
            limiter: Mutex::new(limiter),
            default_country_code: default_country_code.into(),
        }
    }

    /// Build the redirect for `client` if it is still within its request budget
    pub fn redirect(
        &self,
        client: &str,
        phone: &PhoneInput,
        text: Option<&str>,
        now: Instant,
    ) -> Result<ContactRedirect, ContactError> {
        let decision = self
            .limiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .check(client, now);

        if let RateDecision::Limited { retry_after } = decision {
            tracing::warn!("Rate limit exceeded for contact client");
            return Err(ContactError::RateLimited { retry_after });
        }

        let digits = sanitize_for_redirect(phone, &self.default_country_code)?;
        let redirect = ContactRedirect {
            url: contact_redirect_url(&digits, text.filter(|t| !t.is_empty())),
            contact_id: uuid::Uuid::new_v4(),
        };

        tracing::info!(contact_id = %redirect.contact_id, "Issued WhatsApp redirect");
        Ok(redirect)
    }

    /// Sweep finished rate limit windows
    pub fn evict_expired(&self, now: Instant) -> usize {
        let removed = self
            .limiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .evict_expired(now);
        tracing::debug!("Evicted {} expired rate limit windows", removed);
        removed
    }
}
