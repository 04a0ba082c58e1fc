use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use std::time::Instant;
use validator::Validate;

use crate::models::{ContactRequest, ErrorResponse};
use crate::routes::AppState;
use crate::services::ContactError;

/// Configure contact routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/contact/whatsapp", web::post().to(contact_whatsapp));
}

/// WhatsApp contact redirect endpoint
///
/// POST /api/v1/contact/whatsapp
///
/// Request body:
/// ```json
/// {
///   "phone": {"countryCode": "+49", "number": "0151 1234567"},
///   "text": "string"
/// }
/// ```
///
/// Responds with a 302 redirect to wa.me. Each client may request six
/// redirects per minute.
async fn contact_whatsapp(
    state: web::Data<AppState>,
    req: web::Json<ContactRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let client = {
        let info = http_req.connection_info();
        info.realip_remote_addr().unwrap_or("unknown").to_string()
    };

    match state
        .contact
        .redirect(&client, &req.phone, req.text.as_deref(), Instant::now())
    {
        Ok(redirect) => HttpResponse::Found()
            .insert_header((header::LOCATION, redirect.url))
            .insert_header(("X-Contact-Id", redirect.contact_id.to_string()))
            .finish(),
        Err(ContactError::RateLimited { retry_after }) => HttpResponse::TooManyRequests()
            .insert_header((header::RETRY_AFTER, retry_after.as_secs().max(1).to_string()))
            .json(ErrorResponse::new(
                "Too many requests",
                "Too many requests. Please try again later.",
                429,
            )),
        Err(e @ ContactError::InvalidPhone(_)) => {
            tracing::info!("Rejected contact request: {}", e);
            HttpResponse::BadRequest().json(ErrorResponse::new("Invalid phone number", e.to_string(), 400))
        }
    }
}
