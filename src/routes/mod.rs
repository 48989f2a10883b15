// Route exports
pub mod managers;
pub mod properties;
pub mod tenants;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::models::HealthResponse;
use crate::services::{GeocodingClient, ListingStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ListingStore>,
    pub geocoder: Arc<GeocodingClient>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .configure(properties::configure)
        .configure(managers::configure)
        .configure(tenants::configure);
}

/// GET /health
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_reachable = match state.store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_reachable { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        store_reachable,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
