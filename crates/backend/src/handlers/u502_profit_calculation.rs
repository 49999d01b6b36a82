use axum::Json;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_profit_calculation::{
    ProfitCalculation, ProfitRequest, ProfitResponse, ShippingRequest, ShippingResponse,
};

use crate::shared::pricing::{ProfitCalculator, ShippingCalculator};

/// POST /api/profit/calculate
pub async fn calculate_profit(Json(req): Json<ProfitRequest>) -> Json<ProfitResponse> {
    tracing::debug!(
        "{}: US ${} -> JP ¥{}",
        ProfitCalculation::full_name(),
        req.us_price,
        req.jp_listing_price
    );
    Json(ProfitResponse {
        success: true,
        result: ProfitCalculator::from_config().calculate(&req),
    })
}

/// POST /api/shipping/calculate
pub async fn calculate_shipping(Json(req): Json<ShippingRequest>) -> Json<ShippingResponse> {
    Json(ShippingResponse {
        success: true,
        result: ShippingCalculator::new().calculate(&req),
    })
}
