use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::hazards::dtos::{
    media_extension, DeleteHazardResponseDto, HazardFormDto, HazardListResponseDto,
    HazardMessageResponseDto, HazardMultipartDto, HazardResponseDto, ListHazardsQuery,
};
use crate::features::hazards::models::{MediaAttachment, MediaKind};
use crate::features::hazards::services::hazard_service::{
    HazardFilter, HazardService, HazardSort, SortField,
};
use crate::features::hazards::services::location_service::LocationInput;
use crate::features::hazards::services::validation_service::{self, TagsInput, ValidationError};
use crate::modules::storage::ObjectStore;
use crate::shared::constants::MAX_UPLOAD_SIZE;
use crate::shared::types::Pagination;

/// State for hazard handlers
#[derive(Clone)]
pub struct HazardState {
    pub hazard_service: Arc<HazardService>,
    pub media_store: Arc<dyn ObjectStore>,
}

/// List hazards with optional filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/hazards",
    params(ListHazardsQuery),
    responses(
        (status = 200, description = "Page of hazards", body = HazardListResponseDto)
    ),
    tag = "hazards"
)]
pub async fn list_hazards(
    State(state): State<HazardState>,
    Query(query): Query<ListHazardsQuery>,
) -> Result<Json<HazardListResponseDto>> {
    let filter = HazardFilter {
        severity: query.severity,
        hazard_type: query.hazard_type,
    };
    let sort = HazardSort {
        field: query
            .sort_by
            .as_deref()
            .map(SortField::parse)
            .unwrap_or(SortField::CreatedAt),
        order: query.sort_order.unwrap_or_default(),
    };
    let page = query.page();
    let per_page = query.limit();

    let (hazards, total) = state
        .hazard_service
        .list(&filter, &sort, page, per_page)
        .await?;

    Ok(Json(HazardListResponseDto {
        hazards: hazards.into_iter().map(Into::into).collect(),
        pagination: Pagination::new(page, per_page, total),
    }))
}

/// Get a hazard by ID
#[utoipa::path(
    get,
    path = "/api/hazards/{id}",
    params(
        ("id" = String, Path, description = "Hazard ID")
    ),
    responses(
        (status = 200, description = "Hazard found", body = HazardResponseDto),
        (status = 400, description = "Invalid hazard ID"),
        (status = 404, description = "Hazard not found")
    ),
    tag = "hazards"
)]
pub async fn get_hazard(
    State(state): State<HazardState>,
    Path(raw_id): Path<String>,
) -> Result<Json<HazardResponseDto>> {
    let id = parse_hazard_id(&raw_id)?;
    let hazard = state.hazard_service.get_by_id(id).await?;
    Ok(Json(hazard.into()))
}

/// Create a hazard from a multipart form with an optional media file
#[utoipa::path(
    post,
    path = "/api/hazards",
    request_body(
        content = HazardMultipartDto,
        content_type = "multipart/form-data",
        description = "Hazard fields plus an optional single media file",
    ),
    responses(
        (status = 201, description = "Hazard created", body = HazardMessageResponseDto),
        (status = 400, description = "Validation failure or oversized file")
    ),
    tag = "hazards"
)]
pub async fn create_hazard(
    State(state): State<HazardState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<HazardMessageResponseDto>)> {
    const CONTEXT: &str = "Failed to create hazard";

    let form = collect_hazard_form(&mut multipart).await?;
    let media = match form.upload {
        Some(upload) => Some(store_media(state.media_store.as_ref(), upload, CONTEXT).await?),
        None => None,
    };

    let prepared = {
        let mut rng = rand::thread_rng();
        validation_service::validate_new(&form.fields, media.clone(), &mut rng)
    };
    let new_hazard = match prepared {
        Ok(hazard) => hazard,
        Err(e) => {
            discard_media(state.media_store.as_ref(), media.as_ref()).await;
            return Err(e.into_app(CONTEXT));
        }
    };

    let hazard = match state.hazard_service.insert(&new_hazard).await {
        Ok(hazard) => hazard,
        Err(e) => {
            discard_media(state.media_store.as_ref(), media.as_ref()).await;
            return Err(e);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(HazardMessageResponseDto {
            message: "Hazard created".to_string(),
            hazard: hazard.into(),
        }),
    ))
}

/// Update a hazard: partial field replacement plus optional media append
#[utoipa::path(
    put,
    path = "/api/hazards/{id}",
    params(
        ("id" = String, Path, description = "Hazard ID")
    ),
    request_body(
        content = HazardMultipartDto,
        content_type = "multipart/form-data",
        description = "Any subset of mutable hazard fields plus an optional single media file",
    ),
    responses(
        (status = 200, description = "Hazard updated", body = HazardMessageResponseDto),
        (status = 400, description = "Invalid ID or validation failure"),
        (status = 404, description = "Hazard not found")
    ),
    tag = "hazards"
)]
pub async fn update_hazard(
    State(state): State<HazardState>,
    Path(raw_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<HazardMessageResponseDto>> {
    const CONTEXT: &str = "Failed to update hazard";

    let id = parse_hazard_id(&raw_id)?;
    let form = collect_hazard_form(&mut multipart).await?;
    let media = match form.upload {
        Some(upload) => Some(store_media(state.media_store.as_ref(), upload, CONTEXT).await?),
        None => None,
    };

    let patch = match validation_service::validate_patch(&form.fields, media.clone()) {
        Ok(patch) => patch,
        Err(e) => {
            discard_media(state.media_store.as_ref(), media.as_ref()).await;
            return Err(e.into_app(CONTEXT));
        }
    };

    let hazard = match state.hazard_service.update_partial(id, &patch).await {
        Ok(hazard) => hazard,
        Err(e) => {
            // Covers the unknown-id case too: an accepted upload must not
            // outlive the failed write
            discard_media(state.media_store.as_ref(), media.as_ref()).await;
            return Err(e);
        }
    };

    Ok(Json(HazardMessageResponseDto {
        message: "Hazard updated".to_string(),
        hazard: hazard.into(),
    }))
}

/// Delete a hazard along with its stored media
#[utoipa::path(
    delete,
    path = "/api/hazards/{id}",
    params(
        ("id" = String, Path, description = "Hazard ID")
    ),
    responses(
        (status = 200, description = "Hazard deleted", body = DeleteHazardResponseDto),
        (status = 400, description = "Invalid hazard ID"),
        (status = 404, description = "Hazard not found")
    ),
    tag = "hazards"
)]
pub async fn delete_hazard(
    State(state): State<HazardState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteHazardResponseDto>> {
    let id = parse_hazard_id(&raw_id)?;
    let hazard = state.hazard_service.delete_by_id(id).await?;

    // Best-effort media cleanup; failures are logged, never surfaced
    let deletions = hazard
        .media_urls()
        .map(|url| state.media_store.delete_url(url));
    for result in futures::future::join_all(deletions).await {
        if let Err(e) = result {
            tracing::warn!("Failed to delete media for hazard {}: {}", id, e);
        }
    }

    Ok(Json(DeleteHazardResponseDto {
        message: "Hazard deleted".to_string(),
    }))
}

fn parse_hazard_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// A file accepted from the multipart form, not yet stored
struct UploadedFile {
    data: Vec<u8>,
    filename: String,
    content_type: String,
}

struct HazardForm {
    fields: HazardFormDto,
    upload: Option<UploadedFile>,
}

async fn collect_hazard_form(multipart: &mut Multipart) -> Result<HazardForm> {
    let mut form = HazardForm {
        fields: HazardFormDto::default(),
        upload: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    tracing::debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                if data.len() > MAX_UPLOAD_SIZE {
                    return Err(AppError::UploadTooLarge);
                }

                form.upload = Some(UploadedFile {
                    data: data.to_vec(),
                    filename,
                    content_type,
                });
            }
            "hazardType" => form.fields.hazard_type = read_text(field).await?,
            "severity" => form.fields.severity = read_text(field).await?,
            "description" => form.fields.description = read_text(field).await?,
            "location" => {
                form.fields.location = read_text(field).await?.map(LocationInput::Raw);
            }
            "tags" => form.fields.tags = read_text(field).await?.map(TagsInput::Raw),
            "verified" => form.fields.verified = read_text(field).await?,
            _ => {
                tracing::debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok(form)
}

/// Empty text fields count as absent
async fn read_text(field: Field<'_>) -> Result<Option<String>> {
    let text = field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {}", e)))?;
    Ok(Some(text).filter(|t| !t.is_empty()))
}

/// Classify the upload and hand it to the object store.
/// Classification happens first so unsupported files are never stored.
async fn store_media(
    store: &dyn ObjectStore,
    upload: UploadedFile,
    context: &str,
) -> Result<MediaAttachment> {
    let kind = MediaKind::from_content_type(&upload.content_type).ok_or_else(|| {
        ValidationError::UnsupportedMediaType(upload.content_type.clone()).into_app(context)
    })?;

    let extension = media_extension(&upload.content_type)
        .unwrap_or_else(|| upload.filename.rsplit('.').next().unwrap_or("bin"));
    let key = format!("hazards/{}.{}", Uuid::new_v4(), extension);

    let url = store
        .store(&key, upload.data, &upload.content_type)
        .await?;

    tracing::debug!("Stored hazard media: {}", url);
    Ok(MediaAttachment { kind, url })
}

/// Best-effort deletion of an orphaned upload after a failed write
async fn discard_media(store: &dyn ObjectStore, media: Option<&MediaAttachment>) {
    if let Some(attachment) = media {
        if let Err(e) = store.delete_url(&attachment.url).await {
            tracing::warn!(
                "Failed to clean up orphaned media {}: {}",
                attachment.url,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::hazards::routes;
    use crate::modules::storage::testing::InMemoryStore;
    use axum::extract::DefaultBodyLimit;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;
    use sqlx::postgres::PgPoolOptions;

    /// Router over a lazy (never-connected) pool and an in-memory store.
    /// Exercises every path that resolves before the repository is reached.
    /// Carries the same body-size layer the server installs, so the 10MB
    /// media cap is what rejects oversized uploads.
    fn test_server() -> (TestServer, Arc<InMemoryStore>) {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/hazardwatch_test_unreachable")
            .expect("lazy pool");
        let store = Arc::new(InMemoryStore::default());
        let router = routes::routes(Arc::new(HazardService::new(pool)), store.clone())
            .layer(DefaultBodyLimit::max(12 * 1024 * 1024));
        (TestServer::new(router).unwrap(), store)
    }

    fn description() -> String {
        Sentence(3..8).fake()
    }

    #[tokio::test]
    async fn health_reports_ok_with_timestamp() {
        let (server, _) = test_server();
        let response = server.get("/api/health").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "OK");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_before_the_repository() {
        let (server, _) = test_server();
        for path in [
            "/api/hazards/not-a-uuid",
            "/api/hazards/12345",
            "/api/hazards/zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz",
        ] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: serde_json::Value = response.json();
            assert_eq!(body["error"], "Invalid hazard ID");
        }
    }

    #[tokio::test]
    async fn delete_with_malformed_id_is_rejected() {
        let (server, _) = test_server();
        let response = server.delete("/api/hazards/not-a-uuid").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_without_description_fails_validation() {
        let (server, _) = test_server();
        let form = MultipartForm::new()
            .add_text("hazardType", "Wildfire")
            .add_text("severity", "severe")
            .add_text("location", "41.2132,-124.0046");

        let response = server.post("/api/hazards").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Failed to create hazard");
        assert_eq!(body["details"], "`description` is required");
    }

    #[tokio::test]
    async fn create_validation_failure_cleans_up_stored_media() {
        let (server, store) = test_server();
        let form = MultipartForm::new()
            .add_text("hazardType", "Wildfire")
            .add_text("severity", "not-a-severity")
            .add_text("description", description())
            .add_text("location", "41.2132,-124.0046")
            .add_part(
                "file",
                Part::bytes(vec![0xFF, 0xD8, 0xFF])
                    .file_name("scene.jpg")
                    .mime_type("image/jpeg"),
            );

        let response = server.post("/api/hazards").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        // The orphaned object must be deleted, not leaked
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_with_specific_message() {
        let (server, store) = test_server();
        let form = MultipartForm::new()
            .add_text("hazardType", "Flood")
            .add_text("severity", "high")
            .add_text("description", description())
            .add_text("location", "38.5556,-121.4689")
            .add_part(
                "file",
                Part::bytes(vec![0u8; MAX_UPLOAD_SIZE + 1])
                    .file_name("huge.jpg")
                    .mime_type("image/jpeg"),
            );

        let response = server.post("/api/hazards").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "File too large. Max 10MB.");
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn unsupported_media_type_is_rejected_without_storing() {
        let (server, store) = test_server();
        let form = MultipartForm::new()
            .add_text("hazardType", "Flood")
            .add_text("severity", "high")
            .add_text("description", description())
            .add_text("location", "38.5556,-121.4689")
            .add_part(
                "file",
                Part::bytes(b"%PDF-1.4".to_vec())
                    .file_name("report.pdf")
                    .mime_type("application/pdf"),
            );

        let response = server.post("/api/hazards").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn update_validation_failure_cleans_up_stored_media() {
        let (server, store) = test_server();
        let id = Uuid::new_v4();
        let form = MultipartForm::new()
            .add_text("location", "not,numbers")
            .add_part(
                "file",
                Part::bytes(vec![0x00, 0x00, 0x00, 0x18])
                    .file_name("clip.mp4")
                    .mime_type("video/mp4"),
            );

        let response = server
            .put(&format!("/api/hazards/{}", id))
            .multipart(form)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Failed to update hazard");
        assert_eq!(
            body["details"],
            "Invalid location numbers. Must be numeric lat,lng"
        );
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn invalid_severity_filter_is_rejected() {
        let (server, _) = test_server();
        let response = server.get("/api/hazards?severity=apocalyptic").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
