use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use crate::enums::listing_status::ListingStatus;
use crate::enums::stock_status::StockStatus;
use crate::shared::Dimensions;

/// Минимальная прибыль по умолчанию, JPY
pub const DEFAULT_MINIMUM_PROFIT_THRESHOLD: f64 = 3000.0;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор листинга
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub Uuid);

impl ListingId {
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

impl AggregateId for ListingId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ListingId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Листинг: товар с Amazon US, выставленный на Amazon JP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub asin: String,
    pub jp_asin: Option<String>,
    pub us_asin: Option<String>,
    #[serde(default)]
    pub title: String,

    // Цены: jp_price и listing_price в JPY, us_price в USD
    pub jp_price: f64,
    pub us_price: f64,
    pub listing_price: f64,
    pub profit_amount: f64,
    /// Процент прибыли от цены продажи
    pub profit_rate: f64,

    pub status: ListingStatus,
    pub stock_status: StockStatus,
    pub shipping_available: bool,
    pub last_checked: Option<DateTime<Utc>>,
    pub risk_score: f64,

    pub category: Option<String>,
    pub manufacturer: Option<String>,
    /// Вес в граммах
    pub weight: Option<f64>,
    pub dimensions: Option<Dimensions>,

    // Издержки, JPY
    pub international_shipping_cost: f64,
    pub domestic_shipping_cost: f64,
    pub customs_fee: f64,
    pub transfer_fee: f64,
    pub amazon_fee: f64,
    pub minimum_profit_threshold: f64,

    pub source_url: Option<String>,
    pub notes: Option<String>,

    #[serde(flatten)]
    pub metadata: EntityMetadata,
}

impl Listing {
    /// Создать новый листинг для вставки в БД
    pub fn new_for_insert(dto: &ListingDto) -> Self {
        let asin = normalize_asin(&dto.asin);
        let jp_asin = non_empty(&dto.jp_asin)
            .map(|s| normalize_asin(&s))
            .unwrap_or_else(|| asin.clone());

        Self {
            id: ListingId::new_v4(),
            asin,
            jp_asin: Some(jp_asin),
            us_asin: non_empty(&dto.us_asin).map(|s| normalize_asin(&s)),
            title: dto.title.trim().to_string(),
            jp_price: dto.jp_price,
            us_price: dto.us_price,
            listing_price: dto.listing_price,
            profit_amount: 0.0,
            profit_rate: 0.0,
            status: ListingStatus::Draft,
            stock_status: StockStatus::Unknown,
            shipping_available: true,
            last_checked: None,
            risk_score: 0.0,
            category: non_empty(&dto.category),
            manufacturer: non_empty(&dto.manufacturer),
            weight: dto.weight,
            dimensions: dto.dimensions,
            international_shipping_cost: 0.0,
            domestic_shipping_cost: 0.0,
            customs_fee: 0.0,
            transfer_fee: 0.0,
            amazon_fee: 0.0,
            minimum_profit_threshold: dto.minimum_profit_threshold,
            source_url: non_empty(&dto.source_url),
            notes: non_empty(&dto.notes),
            metadata: EntityMetadata::new(),
        }
    }

    /// ASIN для запроса к Amazon JP
    pub fn jp_lookup_asin(&self) -> &str {
        self.jp_asin
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.asin)
    }

    /// Применить частичное обновление. Пустые строки очищают необязательные поля.
    pub fn apply_patch(&mut self, patch: &ListingPatch) {
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(v) = patch.jp_price {
            self.jp_price = v;
        }
        if let Some(v) = patch.us_price {
            self.us_price = v;
        }
        if let Some(v) = patch.listing_price {
            self.listing_price = v;
        }
        if let Some(v) = patch.profit_amount {
            self.profit_amount = v;
        }
        if let Some(v) = patch.profit_rate {
            self.profit_rate = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.stock_status {
            self.stock_status = v;
        }
        if let Some(v) = patch.shipping_available {
            self.shipping_available = v;
        }
        if patch.category.is_some() {
            self.category = non_empty(&patch.category);
        }
        if patch.manufacturer.is_some() {
            self.manufacturer = non_empty(&patch.manufacturer);
        }
        if let Some(v) = patch.weight {
            self.weight = Some(v);
        }
        if let Some(v) = patch.dimensions {
            self.dimensions = Some(v);
        }
        if let Some(v) = patch.international_shipping_cost {
            self.international_shipping_cost = v;
        }
        if let Some(v) = patch.domestic_shipping_cost {
            self.domestic_shipping_cost = v;
        }
        if let Some(v) = patch.customs_fee {
            self.customs_fee = v;
        }
        if let Some(v) = patch.transfer_fee {
            self.transfer_fee = v;
        }
        if let Some(v) = patch.amazon_fee {
            self.amazon_fee = v;
        }
        if let Some(v) = patch.minimum_profit_threshold {
            self.minimum_profit_threshold = v;
        }
        if patch.source_url.is_some() {
            self.source_url = non_empty(&patch.source_url);
        }
        if patch.notes.is_some() {
            self.notes = non_empty(&patch.notes);
        }
        if let Some(v) = patch.risk_score {
            self.risk_score = v;
        }
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.asin.trim().is_empty() {
            return Err("ASIN is required".into());
        }
        if self.jp_price < 0.0 || self.us_price < 0.0 || self.listing_price < 0.0 {
            return Err("Prices must not be negative".into());
        }
        Ok(())
    }
}

impl AggregateRoot for Listing {
    type Id = ListingId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn code(&self) -> &str {
        &self.asin
    }

    fn description(&self) -> &str {
        &self.title
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "listing"
    }

    fn element_name() -> &'static str {
        "Listing"
    }

    fn list_name() -> &'static str {
        "Listings"
    }
}

/// ASIN хранится без пробелов и в верхнем регистре
pub fn normalize_asin(value: &str) -> String {
    value.trim().to_uppercase()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ============================================================================
// Forms / DTOs
// ============================================================================

fn default_threshold() -> f64 {
    DEFAULT_MINIMUM_PROFIT_THRESHOLD
}

fn default_true() -> bool {
    true
}

/// DTO для создания листинга (форма и импорт)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDto {
    #[serde(default)]
    pub asin: String,
    #[serde(default)]
    pub jp_asin: Option<String>,
    #[serde(default)]
    pub us_asin: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub jp_price: f64,
    #[serde(default)]
    pub us_price: f64,
    #[serde(default)]
    pub listing_price: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_threshold")]
    pub minimum_profit_threshold: f64,
    /// Проверять по черному списку и на дубликаты
    #[serde(default = "default_true")]
    pub validate: bool,
    /// Номер строки в исходном файле импорта (с 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_row: Option<usize>,
}

impl Default for ListingDto {
    fn default() -> Self {
        Self {
            asin: String::new(),
            jp_asin: None,
            us_asin: None,
            title: String::new(),
            jp_price: 0.0,
            us_price: 0.0,
            listing_price: 0.0,
            category: None,
            manufacturer: None,
            weight: None,
            dimensions: None,
            source_url: None,
            notes: None,
            minimum_profit_threshold: DEFAULT_MINIMUM_PROFIT_THRESHOLD,
            validate: true,
            source_row: None,
        }
    }
}

impl ListingDto {
    /// Ошибки полей формы. Пустой список означает, что данные корректны.
    pub fn field_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.asin.trim().is_empty() {
            errors.push("ASIN is required".to_string());
        }
        for (name, value) in [
            ("jp_price", self.jp_price),
            ("us_price", self.us_price),
            ("listing_price", self.listing_price),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{} must be a non-negative number", name));
            }
        }
        errors
    }
}

/// Частичное обновление листинга (PUT /api/listings/:id)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jp_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub us_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<StockStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international_shipping_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domestic_shipping_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customs_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_profit_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
}

// ============================================================================
// API envelopes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingListResponse {
    pub success: bool,
    pub listings: Vec<Listing>,
    pub count: usize,
}

/// Ответ на чтение, создание и обновление одного листинга
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing: Option<Listing>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ListingResponse {
    pub fn ok(listing: Listing) -> Self {
        Self {
            success: true,
            listing: Some(listing),
            errors: Vec::new(),
        }
    }

    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            success: false,
            listing: None,
            errors,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkUpdateRequest {
    #[serde(default)]
    pub listing_ids: Vec<String>,
    /// Код статуса; проверяется на сервере
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateResponse {
    pub success: bool,
    pub updated_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub listing_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    pub success: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub items: Vec<ListingDto>,
    #[serde(default = "default_true")]
    pub validate: bool,
}

/// Отклонённая строка импорта: номер строки исходного файла, с 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub row: usize,
    pub asin: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResult {
    pub total: usize,
    pub created: usize,
    pub rejected: Vec<RejectedRow>,
}

/// Пара листингов, которые правила дубликатов считают одним товаром
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub listing1_id: String,
    pub listing2_id: String,
    pub reason: String,
    pub match_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateListResponse {
    pub success: bool,
    pub duplicates: Vec<DuplicatePair>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(asin: &str) -> ListingDto {
        ListingDto {
            asin: asin.to_string(),
            title: "  Widget  ".to_string(),
            jp_price: 5000.0,
            us_price: 20.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_for_insert_normalizes_and_defaults() {
        let listing = Listing::new_for_insert(&dto(" b0abc12345 "));
        assert_eq!(listing.asin, "B0ABC12345");
        assert_eq!(listing.jp_asin.as_deref(), Some("B0ABC12345"));
        assert_eq!(listing.us_asin, None);
        assert_eq!(listing.title, "Widget");
        assert_eq!(listing.status, ListingStatus::Draft);
        assert_eq!(listing.stock_status, StockStatus::Unknown);
        assert!(listing.shipping_available);
        assert_eq!(listing.minimum_profit_threshold, 3000.0);
        assert_eq!(listing.jp_lookup_asin(), "B0ABC12345");
    }

    #[test]
    fn test_dto_defaults_from_json() {
        let dto: ListingDto = serde_json::from_str(r#"{"asin":"B0ABC12345"}"#).unwrap();
        assert!(dto.validate);
        assert_eq!(dto.minimum_profit_threshold, 3000.0);
        assert!(dto.field_errors().is_empty());

        let empty: ListingDto = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.field_errors(), vec!["ASIN is required".to_string()]);
    }

    #[test]
    fn test_field_errors_reject_negative_prices() {
        let mut d = dto("B0ABC12345");
        d.us_price = -1.0;
        assert_eq!(
            d.field_errors(),
            vec!["us_price must be a non-negative number".to_string()]
        );
    }

    #[test]
    fn test_apply_patch_touches_only_given_fields() {
        let mut listing = Listing::new_for_insert(&dto("B0ABC12345"));
        listing.category = Some("toys".into());
        let patch = ListingPatch {
            listing_price: Some(9800.0),
            status: Some(ListingStatus::Active),
            category: Some("  ".into()),
            ..Default::default()
        };
        listing.apply_patch(&patch);
        assert_eq!(listing.listing_price, 9800.0);
        assert_eq!(listing.status, ListingStatus::Active);
        assert_eq!(listing.category, None);
        assert_eq!(listing.jp_price, 5000.0);
    }

    #[test]
    fn test_listing_serializes_flat_timestamps() {
        let listing = Listing::new_for_insert(&dto("B0ABC12345"));
        let value = serde_json::to_value(&listing).unwrap();
        assert!(value.get("created_at").is_some());
        assert_eq!(value["status"], "draft");
        assert_eq!(value["id"], listing.id.as_string());
        assert_eq!(Listing::full_name(), "a001_listing");
    }
}
