use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::catalog::{CatalogItem, CatalogProvider, Marketplace};
use super::error::CatalogError;
use super::signer::{self, Credentials, SignatureInput};
use crate::shared::config::AmazonConfig;

const SERVICE: &str = "ProductAdvertisingAPI";
const GET_ITEMS_PATH: &str = "/paapi5/getitems";
const GET_ITEMS_TARGET: &str = "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.GetItems";
const MAX_FEATURES: usize = 5;

/// PA-API допускает 1 запрос в секунду
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);
/// Повторы после первой попытки (429 / 5xx / сеть)
const MAX_RETRIES: u32 = 2;
const RETRY_DELAY_BASE: Duration = Duration::from_secs(1);
const RETRY_DELAY_MAX: Duration = Duration::from_secs(5);

const RESOURCES: [&str; 5] = [
    "ItemInfo.Title",
    "ItemInfo.Features",
    "Offers.Listings.Price",
    "Offers.Listings.Availability.Type",
    "Images.Primary.Large",
];

/// ASIN: ровно 10 символов A-Z / 0-9
pub fn is_valid_asin(asin: &str) -> bool {
    asin.len() == 10
        && asin
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// HTTP-клиент Amazon Product Advertising API 5.0
pub struct PaapiClient {
    client: reqwest::Client,
    access_key: String,
    secret_key: String,
    partner_tag: String,
    /// Момент последнего запроса; общий для всех маркетплейсов
    last_request: Mutex<Option<Instant>>,
}

/// Пауза перед повтором номер `retry` (с нуля): 2с, 4с, далее не больше 5с
pub fn backoff_delay(retry: u32) -> Duration {
    RETRY_DELAY_BASE
        .saturating_mul(2u32.saturating_pow(retry.saturating_add(1)))
        .min(RETRY_DELAY_MAX)
}

/// Сколько ждать до следующего запроса, чтобы не превысить лимит
fn throttle_delay(last: Option<Instant>, now: Instant) -> Option<Duration> {
    let elapsed = now.saturating_duration_since(last?);
    (elapsed < MIN_REQUEST_INTERVAL).then(|| MIN_REQUEST_INTERVAL - elapsed)
}

impl PaapiClient {
    pub fn new(config: &AmazonConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            partner_tag: config.partner_tag.clone(),
            last_request: Mutex::new(None),
        })
    }

    /// Ждёт своей очереди; запросы идут не чаще `MIN_REQUEST_INTERVAL`
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(wait) = throttle_delay(*last, Instant::now()) {
            tokio::time::sleep(wait).await;
        }
        *last = Some(Instant::now());
    }

    /// GetItems с повтором при 429 / 5xx
    async fn get_item(
        &self,
        marketplace: Marketplace,
        asin: &str,
    ) -> Result<Option<CatalogItem>, CatalogError> {
        let mut retry = 0;
        loop {
            self.throttle().await;
            match self.request_item(marketplace, asin).await {
                Err(e) if retry < MAX_RETRIES && e.is_retryable() => {
                    let delay = backoff_delay(retry);
                    retry += 1;
                    tracing::warn!(
                        "PA-API lookup of {} failed ({}), retry {}/{} in {:?}",
                        asin,
                        e,
                        retry,
                        MAX_RETRIES,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    /// POST /paapi5/getitems для одного ASIN, одна попытка
    async fn request_item(
        &self,
        marketplace: Marketplace,
        asin: &str,
    ) -> Result<Option<CatalogItem>, CatalogError> {
        let body = GetItemsRequest {
            item_ids: vec![asin.to_string()],
            partner_tag: &self.partner_tag,
            partner_type: "Associates",
            marketplace: marketplace.domain(),
            resources: RESOURCES.to_vec(),
        };
        let payload =
            serde_json::to_string(&body).map_err(|e| CatalogError::Signing(e.to_string()))?;

        let now = chrono::Utc::now();
        let headers = [
            ("content-encoding", "amz-1.0".to_string()),
            ("content-type", "application/json; charset=utf-8".to_string()),
            ("host", marketplace.host().to_string()),
            ("x-amz-date", now.format("%Y%m%dT%H%M%SZ").to_string()),
            ("x-amz-target", GET_ITEMS_TARGET.to_string()),
        ];
        let authorization = signer::authorization_header(
            &Credentials {
                access_key: &self.access_key,
                secret_key: &self.secret_key,
            },
            &SignatureInput {
                method: "POST",
                path: GET_ITEMS_PATH,
                region: marketplace.region(),
                service: SERVICE,
                headers: &headers,
                payload: &payload,
                timestamp: now,
            },
        )?;

        let url = format!("https://{}{}", marketplace.host(), GET_ITEMS_PATH);
        let mut request = self.client.post(&url).header("Authorization", authorization);
        for (name, value) in headers.iter().filter(|(name, _)| *name != "host") {
            request = request.header(*name, value);
        }

        tracing::debug!("PA-API GetItems {} on {}", asin, marketplace.domain());
        let response = request.body(payload).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GetItemsResponse>(&text)
                .ok()
                .and_then(|r| r.errors.into_iter().next())
                .map(|e| format!("{}: {}", e.code, e.message))
                .unwrap_or(text);
            tracing::error!("PA-API request failed with status {}: {}", status, message);
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GetItemsResponse = serde_json::from_str(&text).map_err(|e| {
            CatalogError::Api {
                status: status.as_u16(),
                message: format!("Failed to parse PA-API JSON: {}", e),
            }
        })?;
        Ok(item_from_response(parsed, marketplace, &self.partner_tag))
    }
}

#[async_trait]
impl CatalogProvider for PaapiClient {
    async fn lookup(
        &self,
        marketplace: Marketplace,
        asin: &str,
    ) -> anyhow::Result<Option<CatalogItem>> {
        let asin = asin.trim().to_uppercase();
        if !is_valid_asin(&asin) {
            tracing::warn!("Invalid ASIN format: '{}'", asin);
            return Ok(None);
        }
        Ok(self.get_item(marketplace, &asin).await?)
    }
}

/// Ответ без товаров (ItemsNotFound) даёт `None`
fn item_from_response(
    response: GetItemsResponse,
    marketplace: Marketplace,
    partner_tag: &str,
) -> Option<CatalogItem> {
    let item = response.items_result?.items.into_iter().next()?;

    let info = item.item_info.unwrap_or_default();
    let listing = item
        .offers
        .and_then(|o| o.listings.into_iter().next())
        .unwrap_or_default();
    let features: Vec<String> = info
        .features
        .map(|f| f.display_values)
        .unwrap_or_default()
        .into_iter()
        .take(MAX_FEATURES)
        .collect();

    let url = item
        .detail_page_url
        .unwrap_or_else(|| format!("https://{}/dp/{}", marketplace.domain(), item.asin));

    Some(CatalogItem {
        title: info.title.map(|t| t.display_value),
        price: listing.price.as_ref().map(|p| p.amount),
        currency: listing
            .price
            .and_then(|p| p.currency)
            .unwrap_or_else(|| marketplace.currency().to_string()),
        availability: listing
            .availability
            .and_then(|a| a.availability_type)
            .is_some_and(|t| t == "Now"),
        image_url: item
            .images
            .and_then(|i| i.primary)
            .and_then(|p| p.large)
            .map(|l| l.url),
        url: Some(with_partner_tag(&url, partner_tag)),
        description: (!features.is_empty()).then(|| features.join(" ")),
        asin: item.asin,
    })
}

/// Добавляет `tag=` в ссылку на товар, если его нет
fn with_partner_tag(url: &str, partner_tag: &str) -> String {
    if partner_tag.is_empty() || url.contains("tag=") {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}tag={}", url, separator, partner_tag)
}

// ============================================================================
// PA-API DTO
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct GetItemsRequest<'a> {
    item_ids: Vec<String>,
    partner_tag: &'a str,
    partner_type: &'a str,
    marketplace: &'a str,
    resources: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetItemsResponse {
    #[serde(default)]
    items_result: Option<ItemsResult>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemsResult {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Item {
    #[serde(rename = "ASIN")]
    asin: String,
    #[serde(rename = "DetailPageURL")]
    detail_page_url: Option<String>,
    item_info: Option<ItemInfo>,
    offers: Option<Offers>,
    images: Option<Images>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ItemInfo {
    title: Option<DisplayValue>,
    features: Option<DisplayValues>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DisplayValue {
    display_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DisplayValues {
    #[serde(default)]
    display_values: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Offers {
    #[serde(default)]
    listings: Vec<OfferListing>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OfferListing {
    price: Option<Price>,
    availability: Option<Availability>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Price {
    amount: f64,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Availability {
    #[serde(rename = "Type")]
    availability_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Images {
    primary: Option<ImageSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ImageSet {
    large: Option<Image>,
}

#[derive(Debug, Deserialize)]
struct Image {
    #[serde(rename = "URL")]
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asin_format() {
        assert!(is_valid_asin("B08N5WRWNW"));
        assert!(is_valid_asin("4063842762"));
        assert!(!is_valid_asin("b08n5wrwnw"));
        assert!(!is_valid_asin("B08N5WRWN"));
        assert!(!is_valid_asin("B08N5-RWNW"));
    }

    #[test]
    fn test_item_mapping() {
        let json = r#"{
            "ItemsResult": {"Items": [{
                "ASIN": "B08N5WRWNW",
                "DetailPageURL": "https://www.amazon.co.jp/dp/B08N5WRWNW",
                "ItemInfo": {
                    "Title": {"DisplayValue": "Echo Dot"},
                    "Features": {"DisplayValues": ["a", "b", "c", "d", "e", "f"]}
                },
                "Offers": {"Listings": [{
                    "Price": {"Amount": 5980.0, "Currency": "JPY"},
                    "Availability": {"Type": "Now"}
                }]},
                "Images": {"Primary": {"Large": {"URL": "https://m.media-amazon.com/x.jpg"}}}
            }]}
        }"#;
        let response: GetItemsResponse = serde_json::from_str(json).unwrap();
        let item = item_from_response(response, Marketplace::Jp, "shop-22").unwrap();

        assert_eq!(item.asin, "B08N5WRWNW");
        assert_eq!(item.title.as_deref(), Some("Echo Dot"));
        assert_eq!(item.price, Some(5980.0));
        assert_eq!(item.currency, "JPY");
        assert!(item.availability);
        assert_eq!(item.description.as_deref(), Some("a b c d e"));
        assert_eq!(
            item.url.as_deref(),
            Some("https://www.amazon.co.jp/dp/B08N5WRWNW?tag=shop-22")
        );
        assert_eq!(item.image_url.as_deref(), Some("https://m.media-amazon.com/x.jpg"));
    }

    #[test]
    fn test_missing_items_is_not_found() {
        let json = r#"{"Errors": [{"Code": "InvalidParameterValue", "Message": "not accessible"}]}"#;
        let response: GetItemsResponse = serde_json::from_str(json).unwrap();
        assert!(item_from_response(response, Marketplace::Us, "").is_none());
    }

    #[test]
    fn test_sparse_item_uses_marketplace_defaults() {
        let json = r#"{"ItemsResult": {"Items": [{"ASIN": "B000000001",
            "Offers": {"Listings": [{"Availability": {"Type": "OutOfStock"}}]}}]}}"#;
        let response: GetItemsResponse = serde_json::from_str(json).unwrap();
        let item = item_from_response(response, Marketplace::Us, "").unwrap();
        assert_eq!(item.currency, "USD");
        assert_eq!(item.price, None);
        assert!(!item.availability);
        assert_eq!(item.url.as_deref(), Some("https://www.amazon.com/dp/B000000001"));
        assert!(item.description.is_none());
    }

    #[test]
    fn test_backoff_schedule_is_capped() {
        assert_eq!(backoff_delay(0), Duration::from_secs(2));
        assert_eq!(backoff_delay(1), Duration::from_secs(4));
        assert_eq!(backoff_delay(2), Duration::from_secs(5));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn test_throttle_keeps_one_request_per_second() {
        let now = Instant::now();
        assert_eq!(throttle_delay(None, now), None);
        assert_eq!(throttle_delay(Some(now), now), Some(MIN_REQUEST_INTERVAL));
        let earlier = now - Duration::from_millis(300);
        assert_eq!(throttle_delay(Some(earlier), now), Some(Duration::from_millis(700)));
        let long_ago = now - Duration::from_secs(2);
        assert_eq!(throttle_delay(Some(long_ago), now), None);
    }

    #[tokio::test]
    async fn test_back_to_back_requests_are_spaced() {
        let client = PaapiClient::new(&AmazonConfig::default()).unwrap();
        let started = Instant::now();
        client.throttle().await;
        client.throttle().await;
        assert!(started.elapsed() >= MIN_REQUEST_INTERVAL);
    }

    #[test]
    fn test_partner_tag_not_duplicated() {
        assert_eq!(
            with_partner_tag("https://www.amazon.com/dp/X?tag=a-20", "b-20"),
            "https://www.amazon.com/dp/X?tag=a-20"
        );
        assert_eq!(
            with_partner_tag("https://www.amazon.com/dp/X?th=1", "b-20"),
            "https://www.amazon.com/dp/X?th=1&tag=b-20"
        );
    }
}
