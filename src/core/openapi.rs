use utoipa::{Modify, OpenApi};

use crate::features::hazards::{
    dtos as hazards_dtos, handlers as hazards_handlers, models as hazards_models,
};
use crate::shared::types::Pagination;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Hazards
        hazards_handlers::hazard_handler::list_hazards,
        hazards_handlers::hazard_handler::get_hazard,
        hazards_handlers::hazard_handler::create_hazard,
        hazards_handlers::hazard_handler::update_hazard,
        hazards_handlers::hazard_handler::delete_hazard,
        // Health
        hazards_handlers::health_handler::health_check,
    ),
    components(
        schemas(
            // Shared
            Pagination,
            // Hazards
            hazards_models::HazardType,
            hazards_models::Severity,
            hazards_models::HazardSource,
            hazards_models::HazardTag,
            hazards_models::GeoPoint,
            hazards_models::PointType,
            hazards_dtos::HazardResponseDto,
            hazards_dtos::HazardListResponseDto,
            hazards_dtos::HazardMessageResponseDto,
            hazards_dtos::DeleteHazardResponseDto,
            hazards_dtos::HazardMultipartDto,
            hazards_dtos::HealthResponseDto,
            hazards_dtos::SortOrder,
        )
    ),
    tags(
        (name = "hazards", description = "Hazard report submission and listing"),
        (name = "health", description = "Service health probe"),
    ),
    info(
        title = "HazardWatch API",
        version = "0.1.0",
        description = "Hazard reporting and listing API",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
