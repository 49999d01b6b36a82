use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use contracts::usecases::u503_stock_monitor::{
    CheckAllResponse, CheckOutcome, MonitorSettings, MonitorStatus,
};
use uuid::Uuid;

use super::{api_error, internal_error, ApiError};
use crate::usecases::u503_stock_monitor::executor;

/// POST /api/monitor/check/:id
pub async fn check_listing(Path(id): Path<String>) -> Result<Json<CheckOutcome>, ApiError> {
    let uuid =
        Uuid::parse_str(&id).map_err(|_| api_error(StatusCode::NOT_FOUND, "Listing not found"))?;
    match executor::check_listing(uuid).await {
        Ok(Some(outcome)) => Ok(Json(outcome)),
        Ok(None) => Err(api_error(StatusCode::NOT_FOUND, "Listing not found")),
        Err(e) => Err(internal_error("Stock check failed", e)),
    }
}

/// POST /api/monitor/check-all
pub async fn check_all() -> Result<Json<CheckAllResponse>, ApiError> {
    let result = executor::check_all()
        .await
        .map_err(|e| internal_error("Stock check of all listings failed", e))?;
    Ok(Json(CheckAllResponse {
        success: true,
        result,
    }))
}

/// GET /api/monitor/status
pub async fn status() -> Result<Json<MonitorStatus>, ApiError> {
    executor::status()
        .await
        .map(Json)
        .map_err(|e| internal_error("Failed to read monitor status", e))
}

/// PUT /api/monitor/settings
pub async fn update_settings(
    Json(settings): Json<MonitorSettings>,
) -> Result<Json<MonitorStatus>, ApiError> {
    if let Err(message) = settings.validate() {
        return Err(api_error(StatusCode::BAD_REQUEST, message));
    }
    executor::update_settings(settings)
        .await
        .map(Json)
        .map_err(|e| internal_error("Failed to save monitor settings", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fractional_interval_is_bad_request() {
        let settings: MonitorSettings = serde_json::from_value(serde_json::json!({
            "monitoring": true,
            "check_interval_hours": 1.5,
            "auto_stop_on_out_of_stock": true,
            "auto_update_prices": true,
            "auto_stop_low_profit": true,
        }))
        .unwrap();
        let Err((code, body)) = update_settings(Json(settings)).await else {
            panic!("settings should be rejected");
        };
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.0["error"],
            "check_interval_hours must be a whole number between 1 and 168"
        );
    }
}
