use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_listing::aggregate::{
    BulkDeleteRequest, BulkDeleteResponse, BulkUpdateRequest, BulkUpdateResponse,
    DuplicateListResponse, ImportRequest, ImportResult, ListingDto, ListingListResponse,
    ListingPatch, ListingResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{api_error, internal_error, ApiError};
use crate::domain::a001_listing::{self, error::ListingError};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Неверный UUID в пути трактуется как отсутствующий листинг
fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| api_error(StatusCode::NOT_FOUND, "Listing not found"))
}

fn map_error(context: &str, e: anyhow::Error) -> ApiError {
    match e.downcast_ref::<ListingError>() {
        Some(ListingError::NotFound) => api_error(StatusCode::NOT_FOUND, e.to_string()),
        Some(ListingError::InvalidStatus(_)) | Some(ListingError::Validation(_)) => {
            api_error(StatusCode::BAD_REQUEST, e.to_string())
        }
        None => internal_error(context, e),
    }
}

/// GET /api/listings?status=&category=
pub async fn list(Query(query): Query<ListQuery>) -> Result<Json<ListingListResponse>, ApiError> {
    let listings = a001_listing::service::list(query.status.as_deref(), query.category.as_deref())
        .await
        .map_err(|e| map_error("Failed to list listings", e))?;
    Ok(Json(ListingListResponse {
        success: true,
        count: listings.len(),
        listings,
    }))
}

/// GET /api/listings/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<ListingResponse>, ApiError> {
    let uuid = parse_id(&id)?;
    match a001_listing::service::get_by_id(uuid).await {
        Ok(Some(listing)) => Ok(Json(ListingResponse::ok(listing))),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "Listing not found")),
        Err(e) => Err(internal_error("Failed to load listing", e)),
    }
}

/// POST /api/listings
pub async fn create(
    Json(dto): Json<ListingDto>,
) -> Result<(StatusCode, Json<ListingResponse>), ApiError> {
    match a001_listing::service::create(dto).await {
        Ok(listing) => Ok((StatusCode::CREATED, Json(ListingResponse::ok(listing)))),
        Err(e) => match e.downcast::<ListingError>() {
            Ok(ListingError::Validation(errors)) => Ok((
                StatusCode::BAD_REQUEST,
                Json(ListingResponse::rejected(errors)),
            )),
            Ok(other) => Err(api_error(StatusCode::BAD_REQUEST, other.to_string())),
            Err(e) => Err(internal_error("Failed to create listing", e)),
        },
    }
}

/// PUT /api/listings/:id
pub async fn update(
    Path(id): Path<String>,
    Json(patch): Json<ListingPatch>,
) -> Result<Json<ListingResponse>, ApiError> {
    let uuid = parse_id(&id)?;
    let listing = a001_listing::service::update(uuid, patch)
        .await
        .map_err(|e| map_error("Failed to update listing", e))?;
    Ok(Json(ListingResponse::ok(listing)))
}

/// DELETE /api/listings/:id
pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let uuid = parse_id(&id)?;
    a001_listing::service::delete(uuid)
        .await
        .map_err(|e| map_error("Failed to delete listing", e))?;
    Ok(Json(json!({ "success": true })))
}

/// POST /api/listings/bulk-update
pub async fn bulk_update(
    Json(req): Json<BulkUpdateRequest>,
) -> Result<Json<BulkUpdateResponse>, ApiError> {
    let status = req.status.as_deref().map(str::trim).unwrap_or_default();
    if req.listing_ids.is_empty() || status.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "listing_ids and status are required",
        ));
    }
    let updated_count = a001_listing::service::bulk_update_status(&req.listing_ids, status)
        .await
        .map_err(|e| map_error("Bulk status update failed", e))?;
    Ok(Json(BulkUpdateResponse {
        success: true,
        updated_count,
    }))
}

/// POST /api/listings/bulk-delete
pub async fn bulk_delete(
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    if req.listing_ids.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "listing_ids are required"));
    }
    let deleted_count = a001_listing::service::bulk_delete(&req.listing_ids)
        .await
        .map_err(|e| internal_error("Bulk delete failed", e))?;
    Ok(Json(BulkDeleteResponse {
        success: true,
        deleted_count,
    }))
}

/// POST /api/listings/import
pub async fn import(Json(req): Json<ImportRequest>) -> Result<Json<ImportResult>, ApiError> {
    a001_listing::service::import(req)
        .await
        .map(Json)
        .map_err(|e| internal_error("Listing import failed", e))
}

/// GET /api/listings/duplicates
pub async fn duplicates() -> Result<Json<DuplicateListResponse>, ApiError> {
    let duplicates = a001_listing::service::find_duplicates()
        .await
        .map_err(|e| internal_error("Duplicate scan failed", e))?;
    Ok(Json(DuplicateListResponse {
        success: true,
        count: duplicates.len(),
        duplicates,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::with_test_database;

    async fn bulk_update_error(listing_ids: Vec<String>, status: Option<&str>) -> ApiError {
        let req = BulkUpdateRequest {
            listing_ids,
            status: status.map(String::from),
        };
        match bulk_update(Json(req)).await {
            Ok(_) => panic!("bulk update should fail"),
            Err(e) => e,
        }
    }

    #[tokio::test]
    async fn test_bulk_update_requires_ids_and_status() {
        let ids = vec![Uuid::new_v4().to_string()];
        for (listing_ids, status) in [(vec![], Some("active")), (ids.clone(), None), (ids, Some("  "))] {
            let (code, body) = bulk_update_error(listing_ids, status).await;
            assert_eq!(code, StatusCode::BAD_REQUEST);
            assert_eq!(body.0["error"], "listing_ids and status are required");
        }
    }

    #[tokio::test]
    async fn test_bulk_update_rejects_unknown_status() {
        with_test_database(async {
            let (code, body) =
                bulk_update_error(vec![Uuid::new_v4().to_string()], Some("archived")).await;
            assert_eq!(code, StatusCode::BAD_REQUEST);
            assert_eq!(
                body.0["error"],
                "Invalid status. Must be one of: draft, active, paused, stopped, error"
            );
        })
        .await;
    }

    #[tokio::test]
    async fn test_rejected_create_returns_errors_list() {
        with_test_database(async {
            let dto = ListingDto {
                asin: "B0ABC12345".to_string(),
                ..Default::default()
            };
            let (code, _) = create(Json(dto.clone())).await.ok().unwrap();
            assert_eq!(code, StatusCode::CREATED);

            let (code, Json(body)) = create(Json(dto)).await.ok().unwrap();
            assert_eq!(code, StatusCode::BAD_REQUEST);
            assert!(!body.success);
            assert_eq!(
                body.errors,
                vec!["Duplicate detected: ASIN already exists: B0ABC12345".to_string()]
            );
        })
        .await;
    }
}
