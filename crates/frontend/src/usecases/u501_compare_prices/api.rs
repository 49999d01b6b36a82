use crate::shared::api_utils::post_json;
use contracts::usecases::u501_compare_prices::{CompareRequest, CompareResponse};

/// Сравнить цены товара на Amazon JP и Amazon US
pub async fn compare_prices(request: &CompareRequest) -> Result<CompareResponse, String> {
    post_json("/api/compare/us-jp", request).await
}
