use serde::{Deserialize, Serialize};

use crate::shared::Dimensions;

fn default_true() -> bool {
    true
}

/// Запрос расчёта прибыли. Незаданные издержки берутся из настроек сервера.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitRequest {
    /// Закупочная цена, USD
    #[serde(default)]
    pub us_price: f64,
    /// Цена продажи на Amazon JP, JPY
    #[serde(default)]
    pub jp_listing_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions_cm: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international_shipping_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domestic_shipping_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customs_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customs_clearance_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_fee_override: Option<f64>,
    /// Оценить международную доставку по весу и габаритам, если стоимость не задана
    #[serde(default = "default_true")]
    pub calculate_shipping: bool,
}

impl Default for ProfitRequest {
    fn default() -> Self {
        Self {
            us_price: 0.0,
            jp_listing_price: 0.0,
            weight_kg: None,
            dimensions_cm: None,
            international_shipping_cost: None,
            domestic_shipping_cost: None,
            customs_fee: None,
            transfer_fee: None,
            customs_clearance_fee: None,
            exchange_rate: None,
            amazon_fee_override: None,
            calculate_shipping: true,
        }
    }
}

/// Служба международной доставки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingProvider {
    MadBeast,
    ImportCom,
    Other,
}

impl ShippingProvider {
    pub fn code(&self) -> &'static str {
        match self {
            ShippingProvider::MadBeast => "mad_beast",
            ShippingProvider::ImportCom => "import_com",
            ShippingProvider::Other => "other",
        }
    }

    /// Неизвестные значения считаются `Other`
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "mad_beast" => ShippingProvider::MadBeast,
            "import_com" => ShippingProvider::ImportCom,
            _ => ShippingProvider::Other,
        }
    }
}

fn default_destination() -> String {
    "JP".to_string()
}

fn default_source() -> String {
    "US".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRequest {
    #[serde(default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub dimensions_cm: Dimensions,
    #[serde(default = "default_destination")]
    pub destination_country: String,
    #[serde(default = "default_source")]
    pub source_country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl Default for ShippingRequest {
    fn default() -> Self {
        Self {
            weight_kg: 0.0,
            dimensions_cm: Dimensions::default(),
            destination_country: default_destination(),
            source_country: default_source(),
            provider: None,
        }
    }
}

impl ShippingRequest {
    pub fn provider(&self) -> ShippingProvider {
        self.provider
            .as_deref()
            .map(ShippingProvider::from_code)
            .unwrap_or(ShippingProvider::MadBeast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_request_defaults() {
        let req: ProfitRequest =
            serde_json::from_str(r#"{"us_price": 20, "jp_listing_price": 9800}"#).unwrap();
        assert!(req.calculate_shipping);
        assert_eq!(req.weight_kg, None);
        assert_eq!(req, ProfitRequest { us_price: 20.0, jp_listing_price: 9800.0, ..Default::default() });
    }

    #[test]
    fn test_shipping_provider_parsing() {
        let req: ShippingRequest = serde_json::from_str(r#"{"weight_kg": 1.5}"#).unwrap();
        assert_eq!(req.destination_country, "JP");
        assert_eq!(req.provider(), ShippingProvider::MadBeast);
        assert_eq!(ShippingProvider::from_code("Import_Com"), ShippingProvider::ImportCom);
        assert_eq!(ShippingProvider::from_code("dhl"), ShippingProvider::Other);
    }
}
