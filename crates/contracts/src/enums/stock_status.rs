use serde::{Deserialize, Serialize};

/// Наличие товара на стороне Amazon JP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    Unavailable,
    #[default]
    Unknown,
}

impl StockStatus {
    pub fn code(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::Unavailable => "unavailable",
            StockStatus::Unknown => "unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In stock",
            StockStatus::OutOfStock => "Out of stock",
            StockStatus::Unavailable => "Unavailable",
            StockStatus::Unknown => "Unknown",
        }
    }

    pub fn all() -> Vec<StockStatus> {
        vec![
            StockStatus::InStock,
            StockStatus::OutOfStock,
            StockStatus::Unavailable,
            StockStatus::Unknown,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "in_stock" => Some(StockStatus::InStock),
            "out_of_stock" => Some(StockStatus::OutOfStock),
            "unavailable" => Some(StockStatus::Unavailable),
            "unknown" => Some(StockStatus::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
