use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::hazards::dtos::SortOrder;
use crate::features::hazards::models::{
    Hazard, HazardPatch, HazardType, MediaKind, NewHazard, Severity,
};
use crate::shared::types::page_offset;

const HAZARD_COLUMNS: &str = "id, hazard_type, severity, description, longitude, latitude, \
     tags, images, videos, credibility_score, source, verified, reported_by, \
     created_at, updated_at";

/// Exact-match listing filter; omitted fields are unconstrained
#[derive(Debug, Clone, Copy, Default)]
pub struct HazardFilter {
    pub severity: Option<Severity>,
    pub hazard_type: Option<HazardType>,
}

/// Sortable columns of the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Severity,
    HazardType,
    CredibilityScore,
}

impl SortField {
    /// Map an API sort name to a field; unknown names fall back to the
    /// default rather than failing the request.
    pub fn parse(name: &str) -> Self {
        match name {
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "severity" => SortField::Severity,
            "hazardType" => SortField::HazardType,
            "credibilityScore" => SortField::CredibilityScore,
            _ => SortField::CreatedAt,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Severity => "severity",
            SortField::HazardType => "hazard_type",
            SortField::CredibilityScore => "credibility_score",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HazardSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for HazardSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Repository for hazard records
pub struct HazardService {
    pool: PgPool,
}

impl HazardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List hazards with filter, sort and offset pagination; returns the page
    /// plus the total count for the active filter.
    pub async fn list(
        &self,
        filter: &HazardFilter,
        sort: &HazardSort,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Hazard>, i64)> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM hazards",
            HAZARD_COLUMNS
        ));
        push_filters(&mut query, filter);
        query.push(" ORDER BY ");
        query.push(sort.field.column());
        query.push(match sort.order {
            SortOrder::Asc => " ASC",
            SortOrder::Desc => " DESC",
        });
        query.push(" LIMIT ");
        query.push_bind(per_page);
        query.push(" OFFSET ");
        query.push_bind(page_offset(page, per_page));

        let hazards = query
            .build_query_as::<Hazard>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list hazards: {:?}", e);
                AppError::Database(e)
            })?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM hazards");
        push_filters(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count hazards: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((hazards, total))
    }

    /// Get a hazard by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<Hazard> {
        sqlx::query_as::<_, Hazard>(
            "SELECT id, hazard_type, severity, description, longitude, latitude, \
             tags, images, videos, credibility_score, source, verified, reported_by, \
             created_at, updated_at \
             FROM hazards WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get hazard: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Hazard not found".to_string()))
    }

    /// Insert a validated hazard and return the stored record
    pub async fn insert(&self, data: &NewHazard) -> Result<Hazard> {
        let hazard = sqlx::query_as::<_, Hazard>(
            "INSERT INTO hazards (hazard_type, severity, description, longitude, latitude, \
             tags, images, videos, credibility_score, source, verified, reported_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING id, hazard_type, severity, description, longitude, latitude, \
             tags, images, videos, credibility_score, source, verified, reported_by, \
             created_at, updated_at",
        )
        .bind(data.hazard_type)
        .bind(data.severity)
        .bind(&data.description)
        .bind(data.location.longitude())
        .bind(data.location.latitude())
        .bind(&data.tags)
        .bind(&data.images)
        .bind(&data.videos)
        .bind(data.credibility_score)
        .bind(data.source)
        .bind(data.verified)
        .bind(&data.reported_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create hazard: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Created hazard: {} ({})", hazard.id, hazard.hazard_type);
        Ok(hazard)
    }

    /// Apply a partial update; supplied fields replace, media appends.
    /// An empty patch returns the current record unchanged.
    pub async fn update_partial(&self, id: Uuid, patch: &HazardPatch) -> Result<Hazard> {
        if patch.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE hazards SET updated_at = NOW()");

        if let Some(hazard_type) = patch.hazard_type {
            query.push(", hazard_type = ");
            query.push_bind(hazard_type);
        }
        if let Some(severity) = patch.severity {
            query.push(", severity = ");
            query.push_bind(severity);
        }
        if let Some(description) = &patch.description {
            query.push(", description = ");
            query.push_bind(description);
        }
        if let Some(location) = &patch.location {
            query.push(", longitude = ");
            query.push_bind(location.longitude());
            query.push(", latitude = ");
            query.push_bind(location.latitude());
        }
        if let Some(tags) = &patch.tags {
            query.push(", tags = ");
            query.push_bind(tags);
        }
        if let Some(verified) = patch.verified {
            query.push(", verified = ");
            query.push_bind(verified);
        }
        if let Some(media) = &patch.media {
            // Media arrays only grow; an update appends, never replaces
            match media.kind {
                MediaKind::Image => {
                    query.push(", images = array_append(images, ");
                    query.push_bind(&media.url);
                    query.push(")");
                }
                MediaKind::Video => {
                    query.push(", videos = array_append(videos, ");
                    query.push_bind(&media.url);
                    query.push(")");
                }
            }
        }

        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(" RETURNING ");
        query.push(HAZARD_COLUMNS);

        let hazard = query
            .build_query_as::<Hazard>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update hazard: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Hazard not found".to_string()))?;

        tracing::info!("Updated hazard: {}", id);
        Ok(hazard)
    }

    /// Delete a hazard and return the deleted record so the caller can clean
    /// up its media objects.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<Hazard> {
        let hazard = sqlx::query_as::<_, Hazard>(
            "DELETE FROM hazards WHERE id = $1 \
             RETURNING id, hazard_type, severity, description, longitude, latitude, \
             tags, images, videos, credibility_score, source, verified, reported_by, \
             created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete hazard: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Hazard not found".to_string()))?;

        tracing::info!("Deleted hazard: {}", id);
        Ok(hazard)
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &HazardFilter) {
    let mut separator = " WHERE ";
    if let Some(severity) = filter.severity {
        query.push(separator);
        query.push("severity = ");
        query.push_bind(severity);
        separator = " AND ";
    }
    if let Some(hazard_type) = filter.hazard_type {
        query.push(separator);
        query.push("hazard_type = ");
        query.push_bind(hazard_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_maps_api_names_to_columns() {
        assert_eq!(SortField::parse("createdAt").column(), "created_at");
        assert_eq!(SortField::parse("updatedAt").column(), "updated_at");
        assert_eq!(SortField::parse("severity").column(), "severity");
        assert_eq!(SortField::parse("hazardType").column(), "hazard_type");
        assert_eq!(
            SortField::parse("credibilityScore").column(),
            "credibility_score"
        );
    }

    #[test]
    fn unknown_sort_field_falls_back_to_created_at() {
        assert_eq!(SortField::parse("__proto__"), SortField::CreatedAt);
        assert_eq!(SortField::parse(""), SortField::CreatedAt);
    }

    #[test]
    fn default_sort_is_created_at_descending() {
        let sort = HazardSort::default();
        assert_eq!(sort.field, SortField::CreatedAt);
        assert_eq!(sort.order, SortOrder::Desc);
    }

    #[test]
    fn filters_render_into_where_clause() {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM hazards");
        push_filters(
            &mut query,
            &HazardFilter {
                severity: Some(Severity::High),
                hazard_type: Some(HazardType::Flood),
            },
        );
        assert_eq!(
            query.sql(),
            "SELECT COUNT(*) FROM hazards WHERE severity = $1 AND hazard_type = $2"
        );
    }

    #[test]
    fn empty_filter_renders_no_where_clause() {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM hazards");
        push_filters(&mut query, &HazardFilter::default());
        assert_eq!(query.sql(), "SELECT COUNT(*) FROM hazards");
    }
}
