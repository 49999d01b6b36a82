use serde::{Deserialize, Serialize};

/// Статус листинга на Amazon JP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Stopped,
    Error,
}

impl ListingStatus {
    /// Код статуса (совпадает с сериализованным значением)
    pub fn code(&self) -> &'static str {
        match self {
            ListingStatus::Draft => "draft",
            ListingStatus::Active => "active",
            ListingStatus::Paused => "paused",
            ListingStatus::Stopped => "stopped",
            ListingStatus::Error => "error",
        }
    }

    /// Человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            ListingStatus::Draft => "Draft",
            ListingStatus::Active => "Active",
            ListingStatus::Paused => "Paused",
            ListingStatus::Stopped => "Stopped",
            ListingStatus::Error => "Error",
        }
    }

    pub fn all() -> Vec<ListingStatus> {
        vec![
            ListingStatus::Draft,
            ListingStatus::Active,
            ListingStatus::Paused,
            ListingStatus::Stopped,
            ListingStatus::Error,
        ]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "draft" => Some(ListingStatus::Draft),
            "active" => Some(ListingStatus::Active),
            "paused" => Some(ListingStatus::Paused),
            "stopped" => Some(ListingStatus::Stopped),
            "error" => Some(ListingStatus::Error),
            _ => None,
        }
    }

    /// Список допустимых кодов через запятую (для сообщений об ошибках)
    pub fn codes_joined() -> String {
        Self::all()
            .iter()
            .map(|s| s.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_accepts_mixed_case() {
        assert_eq!(ListingStatus::from_code(" Active "), Some(ListingStatus::Active));
        assert_eq!(ListingStatus::from_code("archived"), None);
    }

    #[test]
    fn test_serde_uses_snake_case_codes() {
        let json = serde_json::to_string(&ListingStatus::Paused).unwrap();
        assert_eq!(json, "\"paused\"");
        let back: ListingStatus = serde_json::from_str("\"stopped\"").unwrap();
        assert_eq!(back, ListingStatus::Stopped);
    }

    #[test]
    fn test_codes_joined() {
        assert_eq!(
            ListingStatus::codes_joined(),
            "draft, active, paused, stopped, error"
        );
    }
}
