use serde::{Deserialize, Serialize};

/// Разбивка издержек, JPY
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub us_price_jpy: f64,
    pub international_shipping_cost: f64,
    pub domestic_shipping_cost: f64,
    pub customs_fee: f64,
    pub consumption_tax: f64,
    pub transfer_fee: f64,
    pub customs_clearance_fee: f64,
    pub amazon_fee: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitResult {
    pub profit_amount: f64,
    /// Процент от цены продажи
    pub profit_rate: f64,
    pub total_cost: f64,
    pub jp_listing_price: f64,
    pub cost_breakdown: CostBreakdown,
    pub exchange_rate_used: f64,
}

/// Оценка стоимости международной доставки
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingQuote {
    pub shipping_cost: f64,
    pub provider: String,
    pub estimated_days: u32,
    pub service_type: String,
    pub chargeable_weight_kg: f64,
    pub volumetric_weight_kg: f64,
    pub actual_weight_kg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitResponse {
    pub success: bool,
    pub result: ProfitResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingResponse {
    pub success: bool,
    pub result: ShippingQuote,
}
