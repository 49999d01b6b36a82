use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a002_blacklist::aggregate::{
    BlacklistCheckRequest, BlacklistCheckResponse, BlacklistEntryDto, BlacklistEntryResponse,
    BlacklistListResponse,
};
use serde_json::json;
use uuid::Uuid;

use super::{api_error, internal_error, ApiError};
use crate::domain::a002_blacklist::{self, error::BlacklistError};

/// GET /api/blacklist
pub async fn list_all() -> Result<Json<BlacklistListResponse>, ApiError> {
    let entries = a002_blacklist::service::list_all()
        .await
        .map_err(|e| internal_error("Failed to list blacklist", e))?;
    Ok(Json(BlacklistListResponse {
        success: true,
        count: entries.len(),
        entries,
    }))
}

/// POST /api/blacklist
pub async fn create(
    Json(dto): Json<BlacklistEntryDto>,
) -> Result<(StatusCode, Json<BlacklistEntryResponse>), ApiError> {
    match a002_blacklist::service::create(dto).await {
        Ok(entry) => Ok((
            StatusCode::CREATED,
            Json(BlacklistEntryResponse {
                success: true,
                entry,
            }),
        )),
        Err(e) => Err(match e.downcast_ref::<BlacklistError>() {
            Some(BlacklistError::AlreadyExists(_)) => api_error(StatusCode::CONFLICT, e.to_string()),
            Some(BlacklistError::NotFound) => api_error(StatusCode::NOT_FOUND, e.to_string()),
            Some(_) => api_error(StatusCode::BAD_REQUEST, e.to_string()),
            None => internal_error("Failed to create blacklist entry", e),
        }),
    }
}

/// DELETE /api/blacklist/:id
pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let uuid =
        Uuid::parse_str(&id).map_err(|_| api_error(StatusCode::NOT_FOUND, "Entry not found"))?;
    match a002_blacklist::service::delete(uuid).await {
        Ok(()) => Ok(Json(json!({ "success": true }))),
        Err(e) => Err(match e.downcast_ref::<BlacklistError>() {
            Some(BlacklistError::NotFound) => api_error(StatusCode::NOT_FOUND, e.to_string()),
            _ => internal_error("Failed to delete blacklist entry", e),
        }),
    }
}

/// POST /api/blacklist/check
pub async fn check(
    Json(req): Json<BlacklistCheckRequest>,
) -> Result<Json<BlacklistCheckResponse>, ApiError> {
    let result = a002_blacklist::service::check_product(&req)
        .await
        .map_err(|e| internal_error("Blacklist check failed", e))?;
    Ok(Json(BlacklistCheckResponse {
        success: true,
        result,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::with_test_database;

    fn dto(entry_type: &str, value: &str) -> BlacklistEntryDto {
        BlacklistEntryDto {
            entry_type: Some(entry_type.to_string()),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_maps_errors_to_status_codes() {
        with_test_database(async {
            let (code, _) = create(Json(dto("asin", "B0BLOCKED1"))).await.ok().unwrap();
            assert_eq!(code, StatusCode::CREATED);

            let cases = [
                (dto("asin", "b0blocked1"), StatusCode::CONFLICT),
                (dto("asin", ""), StatusCode::BAD_REQUEST),
                (dto("colour", "red"), StatusCode::BAD_REQUEST),
            ];
            for (input, expected) in cases {
                let Err((code, body)) = create(Json(input)).await else {
                    panic!("create should fail");
                };
                assert_eq!(code, expected, "{}", body.0);
            }
        })
        .await;
    }
}
