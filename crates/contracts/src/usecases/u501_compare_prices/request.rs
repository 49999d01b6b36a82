use serde::{Deserialize, Serialize};

/// Курс USD/JPY по умолчанию для сравнения
pub const DEFAULT_EXCHANGE_RATE: f64 = 150.0;

/// Запрос на сравнение цен
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompareRequest {
    /// ASIN на Amazon JP (обязательный)
    #[serde(default)]
    pub asin: String,

    /// ASIN на Amazon US, если отличается от JP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_asin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
}

impl CompareRequest {
    pub fn rate(&self) -> f64 {
        self.exchange_rate
            .filter(|r| *r > 0.0)
            .unwrap_or(DEFAULT_EXCHANGE_RATE)
    }

    /// ASIN для поиска на Amazon US
    pub fn us_lookup_asin(&self) -> &str {
        self.us_asin
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.asin.trim())
    }
}
