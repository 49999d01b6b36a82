use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::request::MonitorSettings;
use crate::enums::listing_status::ListingStatus;
use crate::enums::stock_status::StockStatus;

/// Изменения, внесённые проверкой одного листинга
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingUpdates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<StockStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jp_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_stock_status: Option<StockStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_stopped_reason: Option<String>,
}

impl ListingUpdates {
    pub fn is_empty(&self) -> bool {
        *self == ListingUpdates::default()
    }

    pub fn auto_stopped(&self) -> bool {
        self.auto_stopped_reason.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub success: bool,
    pub listing_id: String,
    pub updates: ListingUpdates,
}

/// Итог проверки всех активных листингов
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAllSummary {
    pub total: usize,
    pub checked: usize,
    pub updated: usize,
    pub auto_stopped: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAllResponse {
    pub success: bool,
    pub result: CheckAllSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub success: bool,
    pub monitoring: bool,
    /// Количество активных листингов
    pub monitored_count: u64,
    pub last_check_at: Option<DateTime<Utc>>,
    pub last_summary: Option<CheckAllSummary>,
    pub settings: MonitorSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_serialize_only_changed_fields() {
        let updates = ListingUpdates {
            status: Some(ListingStatus::Paused),
            auto_stopped_reason: Some("Out of stock".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&updates).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "paused", "auto_stopped_reason": "Out of stock"})
        );
        assert!(updates.auto_stopped());
        assert!(ListingUpdates::default().is_empty());
    }
}
