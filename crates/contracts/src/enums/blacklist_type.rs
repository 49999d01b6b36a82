use serde::{Deserialize, Serialize};

/// Тип правила блэклиста
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlacklistType {
    Asin,
    Manufacturer,
    Keyword,
    Category,
    Brand,
}

impl BlacklistType {
    pub fn code(&self) -> &'static str {
        match self {
            BlacklistType::Asin => "asin",
            BlacklistType::Manufacturer => "manufacturer",
            BlacklistType::Keyword => "keyword",
            BlacklistType::Category => "category",
            BlacklistType::Brand => "brand",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BlacklistType::Asin => "ASIN",
            BlacklistType::Manufacturer => "Manufacturer",
            BlacklistType::Keyword => "Keyword",
            BlacklistType::Category => "Category",
            BlacklistType::Brand => "Brand",
        }
    }

    pub fn all() -> Vec<BlacklistType> {
        vec![
            BlacklistType::Asin,
            BlacklistType::Brand,
            BlacklistType::Manufacturer,
            BlacklistType::Keyword,
            BlacklistType::Category,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "asin" => Some(BlacklistType::Asin),
            "manufacturer" => Some(BlacklistType::Manufacturer),
            "keyword" => Some(BlacklistType::Keyword),
            "category" => Some(BlacklistType::Category),
            "brand" => Some(BlacklistType::Brand),
            _ => None,
        }
    }
}

impl std::fmt::Display for BlacklistType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
