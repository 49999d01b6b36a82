use crate::shared::api_utils::{get_json, post_json, put_json};
use contracts::domain::a001_listing::{Listing, ListingDto, ListingPatch, ListingResponse};
use contracts::domain::common::AggregateId;
use contracts::enums::listing_status::ListingStatus;
use contracts::enums::stock_status::StockStatus;
use contracts::shared::Dimensions;
use contracts::usecases::u502_profit_calculation::ProfitRequest;

/// Состояние формы листинга. Строковые поля хранятся без `Option`,
/// пустая строка означает "не задано".
#[derive(Debug, Clone, PartialEq)]
pub struct ListingForm {
    pub id: Option<String>,
    pub asin: String,
    pub jp_asin: String,
    pub us_asin: String,
    pub title: String,
    pub jp_price: f64,
    pub us_price: f64,
    pub listing_price: f64,
    pub profit_amount: f64,
    pub profit_rate: f64,
    pub status: ListingStatus,
    pub stock_status: StockStatus,
    pub category: String,
    pub manufacturer: String,
    /// Граммы
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub international_shipping_cost: f64,
    pub domestic_shipping_cost: f64,
    pub customs_fee: f64,
    pub transfer_fee: f64,
    pub amazon_fee: f64,
    pub minimum_profit_threshold: f64,
    pub source_url: String,
    pub notes: String,
    pub validate: bool,
}

impl Default for ListingForm {
    fn default() -> Self {
        ListingDto::default().into()
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl From<Listing> for ListingForm {
    fn from(l: Listing) -> Self {
        Self {
            id: Some(l.id.as_string()),
            asin: l.asin.clone(),
            jp_asin: text(&l.jp_asin),
            us_asin: text(&l.us_asin),
            title: l.title.clone(),
            jp_price: l.jp_price,
            us_price: l.us_price,
            listing_price: l.listing_price,
            profit_amount: l.profit_amount,
            profit_rate: l.profit_rate,
            status: l.status,
            stock_status: l.stock_status,
            category: text(&l.category),
            manufacturer: text(&l.manufacturer),
            weight: l.weight,
            length: l.dimensions.map(|d| d.length),
            width: l.dimensions.map(|d| d.width),
            height: l.dimensions.map(|d| d.height),
            international_shipping_cost: l.international_shipping_cost,
            domestic_shipping_cost: l.domestic_shipping_cost,
            customs_fee: l.customs_fee,
            transfer_fee: l.transfer_fee,
            amazon_fee: l.amazon_fee,
            minimum_profit_threshold: l.minimum_profit_threshold,
            source_url: text(&l.source_url),
            notes: text(&l.notes),
            validate: true,
        }
    }
}

/// Черновик из другой страницы (например, из сравнения цен)
impl From<ListingDto> for ListingForm {
    fn from(dto: ListingDto) -> Self {
        Self {
            id: None,
            asin: dto.asin,
            jp_asin: text(&dto.jp_asin),
            us_asin: text(&dto.us_asin),
            title: dto.title,
            jp_price: dto.jp_price,
            us_price: dto.us_price,
            listing_price: dto.listing_price,
            profit_amount: 0.0,
            profit_rate: 0.0,
            status: ListingStatus::Draft,
            stock_status: StockStatus::Unknown,
            category: text(&dto.category),
            manufacturer: text(&dto.manufacturer),
            weight: dto.weight,
            length: dto.dimensions.map(|d| d.length),
            width: dto.dimensions.map(|d| d.width),
            height: dto.dimensions.map(|d| d.height),
            international_shipping_cost: 0.0,
            domestic_shipping_cost: 0.0,
            customs_fee: 0.0,
            transfer_fee: 0.0,
            amazon_fee: 0.0,
            minimum_profit_threshold: dto.minimum_profit_threshold,
            source_url: text(&dto.source_url),
            notes: text(&dto.notes),
            validate: dto.validate,
        }
    }
}

impl ListingForm {
    /// Габариты задаются только все три сразу
    pub fn dimensions(&self) -> Option<Dimensions> {
        match (self.length, self.width, self.height) {
            (Some(length), Some(width), Some(height)) => Some(Dimensions {
                length,
                width,
                height,
            }),
            _ => None,
        }
    }

    pub fn to_dto(&self) -> ListingDto {
        ListingDto {
            asin: self.asin.trim().to_string(),
            jp_asin: non_empty(&self.jp_asin),
            us_asin: non_empty(&self.us_asin),
            title: self.title.trim().to_string(),
            jp_price: self.jp_price,
            us_price: self.us_price,
            listing_price: self.listing_price,
            category: non_empty(&self.category),
            manufacturer: non_empty(&self.manufacturer),
            weight: self.weight,
            dimensions: self.dimensions(),
            source_url: non_empty(&self.source_url),
            notes: non_empty(&self.notes),
            minimum_profit_threshold: self.minimum_profit_threshold,
            validate: self.validate,
            source_row: None,
        }
    }

    /// Патч для PUT. Пустые строки передаются как есть и очищают поле на сервере.
    pub fn to_patch(&self) -> ListingPatch {
        ListingPatch {
            title: Some(self.title.trim().to_string()),
            jp_price: Some(self.jp_price),
            us_price: Some(self.us_price),
            listing_price: Some(self.listing_price),
            status: Some(self.status),
            category: Some(self.category.trim().to_string()),
            manufacturer: Some(self.manufacturer.trim().to_string()),
            weight: self.weight,
            dimensions: self.dimensions(),
            international_shipping_cost: Some(self.international_shipping_cost),
            domestic_shipping_cost: Some(self.domestic_shipping_cost),
            customs_fee: Some(self.customs_fee),
            transfer_fee: Some(self.transfer_fee),
            amazon_fee: Some(self.amazon_fee),
            minimum_profit_threshold: Some(self.minimum_profit_threshold),
            source_url: Some(self.source_url.trim().to_string()),
            notes: Some(self.notes.trim().to_string()),
            ..ListingPatch::default()
        }
    }

    /// Запрос предварительного расчёта прибыли. Нулевые издержки
    /// не передаются, сервер подставит свои значения.
    pub fn to_profit_request(&self) -> ProfitRequest {
        let positive = |v: f64| (v > 0.0).then_some(v);
        let sale_price = if self.listing_price > 0.0 {
            self.listing_price
        } else {
            self.jp_price
        };
        ProfitRequest {
            us_price: self.us_price,
            jp_listing_price: sale_price,
            weight_kg: self.weight.map(|g| g / 1000.0),
            dimensions_cm: self.dimensions(),
            international_shipping_cost: positive(self.international_shipping_cost),
            domestic_shipping_cost: positive(self.domestic_shipping_cost),
            customs_fee: positive(self.customs_fee),
            transfer_fee: positive(self.transfer_fee),
            amazon_fee_override: positive(self.amazon_fee),
            ..ProfitRequest::default()
        }
    }
}

pub async fn fetch_by_id(id: &str) -> Result<Listing, String> {
    let resp: ListingResponse = get_json(&format!("/api/listings/{}", id)).await?;
    resp.listing.ok_or_else(|| "Листинг не найден".to_string())
}

pub async fn create(dto: &ListingDto) -> Result<Listing, String> {
    let resp: ListingResponse = post_json("/api/listings", dto).await?;
    match resp.listing {
        Some(listing) if resp.success => Ok(listing),
        _ => Err(resp.errors.join("; ")),
    }
}

pub async fn update(id: &str, patch: &ListingPatch) -> Result<Listing, String> {
    let resp: ListingResponse = put_json(&format!("/api/listings/{}", id), patch).await?;
    resp.listing.ok_or_else(|| "Сервер не вернул листинг".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_drops_blank_optionals() {
        let form = ListingForm {
            asin: " B000000001 ".to_string(),
            us_asin: "  ".to_string(),
            category: "Toys".to_string(),
            length: Some(10.0),
            width: Some(5.0),
            ..ListingForm::default()
        };
        let dto = form.to_dto();
        assert_eq!(dto.asin, "B000000001");
        assert_eq!(dto.us_asin, None);
        assert_eq!(dto.category.as_deref(), Some("Toys"));
        // без высоты габариты не передаются
        assert_eq!(dto.dimensions, None);
        assert!(dto.validate);
    }

    #[test]
    fn test_patch_clears_optional_text() {
        let form = ListingForm {
            notes: String::new(),
            status: ListingStatus::Paused,
            ..ListingForm::default()
        };
        let patch = form.to_patch();
        assert_eq!(patch.notes.as_deref(), Some(""));
        assert_eq!(patch.status, Some(ListingStatus::Paused));
        assert_eq!(patch.stock_status, None);
    }

    #[test]
    fn test_profit_request_uses_listing_price_and_kg() {
        let form = ListingForm {
            us_price: 20.0,
            jp_price: 9000.0,
            listing_price: 9800.0,
            weight: Some(1500.0),
            customs_fee: 0.0,
            transfer_fee: 300.0,
            ..ListingForm::default()
        };
        let req = form.to_profit_request();
        assert_eq!(req.jp_listing_price, 9800.0);
        assert_eq!(req.weight_kg, Some(1.5));
        assert_eq!(req.customs_fee, None);
        assert_eq!(req.transfer_fee, Some(300.0));

        let no_sale_price = ListingForm {
            listing_price: 0.0,
            ..form
        };
        assert_eq!(no_sale_price.to_profit_request().jp_listing_price, 9000.0);
    }
}
