use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::AggregateId;
use crate::enums::blacklist_type::BlacklistType;
use crate::enums::severity::Severity;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор записи черного списка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlacklistEntryId(pub Uuid);

impl BlacklistEntryId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for BlacklistEntryId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(BlacklistEntryId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Правило черного списка. `value` хранится в нижнем регистре без пробелов по краям.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub id: BlacklistEntryId,
    #[serde(rename = "type")]
    pub entry_type: BlacklistType,
    pub value: String,
    #[serde(default)]
    pub reason: String,
    pub severity: Severity,
    /// true для записей, добавленных системой при первом запуске
    pub auto_detected: bool,
    pub created_at: DateTime<Utc>,
}

impl BlacklistEntry {
    pub fn new_for_insert(
        entry_type: BlacklistType,
        value: &str,
        reason: &str,
        severity: Severity,
        auto_detected: bool,
    ) -> Self {
        Self {
            id: BlacklistEntryId::new_v4(),
            entry_type,
            value: normalize_value(value),
            reason: reason.trim().to_string(),
            severity,
            auto_detected,
            created_at: Utc::now(),
        }
    }
}

pub fn normalize_value(value: &str) -> String {
    value.trim().to_lowercase()
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Форма добавления записи. Тип и критичность приходят строками и проверяются на сервере.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlacklistEntryDto {
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

/// Данные товара для проверки по черному списку
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlacklistCheckRequest {
    #[serde(default)]
    pub asin: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
}

/// Совпавшее правило
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlacklistMatch {
    #[serde(rename = "type")]
    pub entry_type: BlacklistType,
    pub value: String,
    pub severity: Severity,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlacklistCheckResult {
    pub is_blocked: bool,
    pub severity: Severity,
    pub reasons: Vec<String>,
    pub matches: Vec<BlacklistMatch>,
}

impl BlacklistCheckResult {
    pub fn allowed() -> Self {
        Self {
            is_blocked: false,
            severity: Severity::Low,
            reasons: Vec::new(),
            matches: Vec::new(),
        }
    }
}

// ============================================================================
// API envelopes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistListResponse {
    pub success: bool,
    pub entries: Vec<BlacklistEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistEntryResponse {
    pub success: bool,
    pub entry: BlacklistEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistCheckResponse {
    pub success: bool,
    pub result: BlacklistCheckResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_uses_type_on_the_wire() {
        let entry = BlacklistEntry::new_for_insert(
            BlacklistType::Brand,
            "  Dyson ",
            "restricted brand",
            Severity::High,
            false,
        );
        assert_eq!(entry.value, "dyson");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "brand");
        assert_eq!(value["severity"], "high");
        assert!(value.get("entry_type").is_none());
    }

    #[test]
    fn test_dto_accepts_partial_body() {
        let dto: BlacklistEntryDto = serde_json::from_str(r#"{"type":"asin","value":"B0X"}"#).unwrap();
        assert_eq!(dto.entry_type.as_deref(), Some("asin"));
        assert_eq!(dto.severity, None);
    }
}
