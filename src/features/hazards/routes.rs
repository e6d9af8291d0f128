use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::hazards::handlers::{self, HazardState};
use crate::features::hazards::services::HazardService;
use crate::modules::storage::ObjectStore;

/// Create routes for the hazards feature
pub fn routes(hazard_service: Arc<HazardService>, media_store: Arc<dyn ObjectStore>) -> Router {
    let state = HazardState {
        hazard_service,
        media_store,
    };

    Router::new()
        .route(
            "/api/hazards",
            get(handlers::list_hazards).post(handlers::create_hazard),
        )
        .route(
            "/api/hazards/{id}",
            get(handlers::get_hazard)
                .put(handlers::update_hazard)
                .delete(handlers::delete_hazard),
        )
        .route("/api/health", get(handlers::health_check))
        .with_state(state)
}
