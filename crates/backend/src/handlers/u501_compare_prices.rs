use axum::http::StatusCode;
use axum::Json;
use contracts::usecases::u501_compare_prices::{CompareRequest, CompareResponse};

use super::{api_error, internal_error, ApiError};
use crate::shared::amazon;
use crate::usecases::u501_compare_prices;

/// POST /api/compare/us-jp
pub async fn compare(Json(req): Json<CompareRequest>) -> Result<Json<CompareResponse>, ApiError> {
    if req.asin.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "ASIN is required"));
    }
    let catalog = amazon::provider();
    u501_compare_prices::compare(catalog.as_ref(), &req)
        .await
        .map(Json)
        .map_err(|e| internal_error("Price comparison failed", e))
}
