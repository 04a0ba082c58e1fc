// Route exports
pub mod contact;
pub mod games;

use actix_web::web;
use std::sync::Arc;

use crate::core::Recommender;
use crate::services::ContactService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub contact: Arc<ContactService>,
    pub default_max_results: usize,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(games::configure)
            .configure(contact::configure),
    );
}
