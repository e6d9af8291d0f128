use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::hazards::models::{GeoPoint, Hazard, HazardSource, HazardType, Severity};
use crate::features::hazards::services::location_service::LocationInput;
use crate::features::hazards::services::validation_service::TagsInput;
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::types::Pagination;

/// Raw hazard fields as collected from a multipart form (or an internal
/// caller). Everything arrives untyped; the validation service turns this
/// into a `NewHazard` or `HazardPatch`.
#[derive(Debug, Default, Validate)]
pub struct HazardFormDto {
    pub hazard_type: Option<String>,
    pub severity: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub location: Option<LocationInput>,
    pub tags: Option<TagsInput>,
    /// Update only; the string "true" coerces to true, anything else to false
    pub verified: Option<String>,
    /// Internal callers may supply an explicit score; HTTP clients cannot
    pub credibility_score: Option<i32>,
}

/// Response DTO for a hazard report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HazardResponseDto {
    pub id: Uuid,
    pub hazard_type: HazardType,
    pub severity: Severity,
    pub description: String,
    pub location: GeoPoint,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub credibility_score: i32,
    pub source: HazardSource,
    pub verified: bool,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Hazard> for HazardResponseDto {
    fn from(h: Hazard) -> Self {
        Self {
            id: h.id,
            hazard_type: h.hazard_type,
            severity: h.severity,
            location: h.location(),
            description: h.description,
            tags: h.tags,
            images: h.images,
            videos: h.videos,
            credibility_score: h.credibility_score,
            source: h.source,
            verified: h.verified,
            reported_by: h.reported_by,
            created_at: h.created_at,
            updated_at: h.updated_at,
        }
    }
}

/// Response DTO for the hazard listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HazardListResponseDto {
    pub hazards: Vec<HazardResponseDto>,
    pub pagination: Pagination,
}

/// Response DTO for create/update: a confirmation message plus the record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HazardMessageResponseDto {
    pub message: String,
    pub hazard: HazardResponseDto,
}

/// Response DTO for delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteHazardResponseDto {
    pub message: String,
}

/// Response DTO for the health probe
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponseDto {
    pub status: String,
    pub timestamp: String,
}

/// Sort direction for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query parameters for `GET /api/hazards`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListHazardsQuery {
    /// Exact-match severity filter
    pub severity: Option<Severity>,
    /// Exact-match hazard type filter
    #[serde(rename = "hazardType")]
    pub hazard_type: Option<HazardType>,
    /// Page size (default: 50, max: 100)
    pub limit: Option<i64>,
    /// Page number (1-indexed, default: 1)
    pub page: Option<i64>,
    /// Sort field (default: createdAt)
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction (default: desc)
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<SortOrder>,
}

impl ListHazardsQuery {
    /// 1-indexed page, floored at 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Clamped page size
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

/// Multipart form for create/update.
/// Note: This struct is for Swagger UI documentation only.
/// The actual handlers use axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct HazardMultipartDto {
    /// Hazard type, e.g. "Wildfire"
    #[schema(example = "Wildfire")]
    pub hazard_type: Option<String>,
    /// Severity: low, moderate, high or severe
    #[schema(example = "high")]
    pub severity: Option<String>,
    /// Free-text description (max 1000 characters)
    pub description: Option<String>,
    /// Location as "lat,lng"
    #[schema(example = "34.05,-118.25")]
    pub location: Option<String>,
    /// Tags as a JSON array string, e.g. `["help","warning"]`
    pub tags: Option<String>,
    /// Update only: "true" marks the report verified
    pub verified: Option<String>,
    /// Optional media attachment (image/* or video/*, max 10MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: Option<String>,
}

/// File extension for the stored media object, derived from the declared
/// content type; unknown subtypes fall back to the original filename.
pub fn media_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        "video/quicktime" => Some("mov"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults() {
        let query = ListHazardsQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 50);
    }

    #[test]
    fn list_query_clamps_out_of_range_values() {
        let query = ListHazardsQuery {
            limit: Some(100_000),
            page: Some(-2),
            ..Default::default()
        };
        assert_eq!(query.limit(), 100);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn response_dto_uses_camel_case_and_canonical_location() {
        let hazard = Hazard {
            id: Uuid::nil(),
            hazard_type: HazardType::Flood,
            severity: Severity::High,
            description: "Severe flooding in residential areas.".to_string(),
            longitude: -121.4689,
            latitude: 38.5556,
            tags: vec!["warning".to_string()],
            images: vec![],
            videos: vec![],
            credibility_score: 80,
            source: HazardSource::CitizenReport,
            verified: false,
            reported_by: "Local Resident".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(HazardResponseDto::from(hazard)).unwrap();
        assert_eq!(value["hazardType"], "Flood");
        assert_eq!(value["severity"], "high");
        assert_eq!(value["credibilityScore"], 80);
        assert_eq!(value["source"], "Citizen Report");
        assert_eq!(value["reportedBy"], "Local Resident");
        assert_eq!(
            value["location"],
            serde_json::json!({"type": "Point", "coordinates": [-121.4689, 38.5556]})
        );
    }

    #[test]
    fn media_extension_covers_common_types() {
        assert_eq!(media_extension("image/png"), Some("png"));
        assert_eq!(media_extension("video/mp4"), Some("mp4"));
        assert_eq!(media_extension("image/x-exotic"), None);
    }
}
