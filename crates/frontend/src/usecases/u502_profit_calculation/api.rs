use crate::shared::api_utils::post_json;
use contracts::usecases::u502_profit_calculation::{
    ProfitRequest, ProfitResponse, ProfitResult, ShippingQuote, ShippingRequest, ShippingResponse,
};

pub async fn calculate_profit(request: &ProfitRequest) -> Result<ProfitResult, String> {
    let response: ProfitResponse = post_json("/api/profit/calculate", request).await?;
    Ok(response.result)
}

pub async fn calculate_shipping(request: &ShippingRequest) -> Result<ShippingQuote, String> {
    let response: ShippingResponse = post_json("/api/shipping/calculate", request).await?;
    Ok(response.result)
}
