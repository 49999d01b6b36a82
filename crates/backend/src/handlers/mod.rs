pub mod a001_listing;
pub mod a002_blacklist;
pub mod health;
pub mod u501_compare_prices;
pub mod u502_profit_calculation;
pub mod u503_stock_monitor;

use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

/// Ошибка API: статус и тело `{"error": "..."}`
pub type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// 500 с записью причины в лог
pub fn internal_error(context: &str, e: anyhow::Error) -> ApiError {
    tracing::error!("{}: {:#}", context, e);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
