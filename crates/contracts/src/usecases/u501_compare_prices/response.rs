use serde::{Deserialize, Serialize};

/// Данные товара на одной площадке
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub asin: String,
    /// false, если товар не найден
    #[serde(default)]
    pub found: bool,
    pub title: Option<String>,
    pub price: Option<f64>,
    /// "JPY" или "USD"
    pub price_currency: String,
    /// Цена в JPY (только для US)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_jpy: Option<f64>,
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub availability: Option<bool>,
}

impl MarketSnapshot {
    pub fn not_found(asin: &str, currency: &str) -> Self {
        Self {
            asin: asin.to_string(),
            price_currency: currency.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceDifference {
    /// JP цена минус US цена в JPY
    pub amount_jpy: Option<f64>,
    pub percent: Option<f64>,
    pub exchange_rate_used: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub success: bool,
    pub jp_amazon: MarketSnapshot,
    pub us_amazon: MarketSnapshot,
    pub price_difference: PriceDifference,
}
