use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_compare_prices::{
    ComparePrices, CompareRequest, CompareResponse, MarketSnapshot, PriceDifference,
};

use crate::shared::amazon::{CatalogItem, CatalogProvider, Marketplace};
use crate::shared::pricing::round2;

/// Сравнить товар на Amazon JP и Amazon US
pub async fn compare(
    catalog: &dyn CatalogProvider,
    request: &CompareRequest,
) -> anyhow::Result<CompareResponse> {
    let jp_asin = request.asin.trim().to_uppercase();
    if jp_asin.is_empty() {
        anyhow::bail!("ASIN is required");
    }
    let us_asin = request.us_lookup_asin().to_uppercase();
    let rate = request.rate();

    tracing::info!(
        "{}: comparing JP {} / US {}",
        ComparePrices::full_name(),
        jp_asin,
        us_asin
    );

    let jp_item = lookup(catalog, Marketplace::Jp, &jp_asin).await;
    let us_item = lookup(catalog, Marketplace::Us, &us_asin).await;

    let jp_amazon = snapshot(&jp_asin, Marketplace::Jp, jp_item, rate);
    let us_amazon = snapshot(&us_asin, Marketplace::Us, us_item, rate);
    let price_difference = price_difference(jp_amazon.price, us_amazon.price, rate);

    Ok(CompareResponse {
        success: true,
        jp_amazon,
        us_amazon,
        price_difference,
    })
}

/// Ошибка каталога трактуется как "не найдено"
async fn lookup(
    catalog: &dyn CatalogProvider,
    marketplace: Marketplace,
    asin: &str,
) -> Option<CatalogItem> {
    match catalog.lookup(marketplace, asin).await {
        Ok(item) => item,
        Err(e) => {
            tracing::warn!("Lookup of {} on {} failed: {}", asin, marketplace.domain(), e);
            None
        }
    }
}

fn snapshot(
    asin: &str,
    marketplace: Marketplace,
    item: Option<CatalogItem>,
    rate: f64,
) -> MarketSnapshot {
    let Some(item) = item else {
        return MarketSnapshot::not_found(asin, marketplace.currency());
    };

    let price_jpy = match marketplace {
        Marketplace::Us => item.price.map(|p| round2(p * rate)),
        Marketplace::Jp => None,
    };

    MarketSnapshot {
        asin: asin.to_string(),
        found: true,
        title: item.title,
        price: item.price,
        price_currency: item.currency,
        price_jpy,
        image_url: item.image_url,
        url: item.url,
        description: item.description,
        availability: Some(item.availability),
    }
}

/// Разница JP - US в JPY. Без одной из цен разница не определена.
pub fn price_difference(jp_price: Option<f64>, us_price: Option<f64>, rate: f64) -> PriceDifference {
    let (amount_jpy, percent) = match (jp_price, us_price) {
        (Some(jp), Some(us)) => {
            let us_price_jpy = us * rate;
            let amount = jp - us_price_jpy;
            let percent = if us_price_jpy != 0.0 {
                amount / us_price_jpy * 100.0
            } else {
                0.0
            };
            (Some(round2(amount)), Some(round2(percent)))
        }
        _ => (None, None),
    };

    PriceDifference {
        amount_jpy,
        percent,
        exchange_rate_used: rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StubCatalog;

    #[async_trait]
    impl CatalogProvider for StubCatalog {
        async fn lookup(
            &self,
            marketplace: Marketplace,
            asin: &str,
        ) -> anyhow::Result<Option<CatalogItem>> {
            match (marketplace, asin) {
                (Marketplace::Jp, "B000000001") => Ok(Some(CatalogItem {
                    asin: asin.to_string(),
                    title: Some("JP title".to_string()),
                    price: Some(4500.0),
                    currency: "JPY".to_string(),
                    availability: true,
                    ..Default::default()
                })),
                (Marketplace::Us, "B000000001") | (Marketplace::Us, "B0000000US") => {
                    Ok(Some(CatalogItem {
                        asin: asin.to_string(),
                        price: Some(20.0),
                        currency: "USD".to_string(),
                        ..Default::default()
                    }))
                }
                (_, "B00000FAIL") => anyhow::bail!("throttled"),
                _ => Ok(None),
            }
        }
    }

    #[tokio::test]
    async fn test_compare_both_found() {
        let req = CompareRequest {
            asin: " b000000001 ".to_string(),
            ..Default::default()
        };
        let res = compare(&StubCatalog, &req).await.unwrap();
        assert!(res.jp_amazon.found);
        assert_eq!(res.jp_amazon.asin, "B000000001");
        assert_eq!(res.us_amazon.price_jpy, Some(3000.0));
        assert_eq!(res.us_amazon.availability, Some(false));
        assert_eq!(res.price_difference.amount_jpy, Some(1500.0));
        assert_eq!(res.price_difference.percent, Some(50.0));
        assert_eq!(res.price_difference.exchange_rate_used, 150.0);
    }

    #[tokio::test]
    async fn test_compare_missing_side_has_no_difference() {
        let req = CompareRequest {
            asin: "B000000002".to_string(),
            us_asin: Some("B0000000US".to_string()),
            exchange_rate: Some(100.0),
        };
        let res = compare(&StubCatalog, &req).await.unwrap();
        assert!(!res.jp_amazon.found);
        assert_eq!(res.jp_amazon.asin, "B000000002");
        assert_eq!(res.jp_amazon.price_currency, "JPY");
        assert_eq!(res.us_amazon.asin, "B0000000US");
        assert_eq!(res.us_amazon.price_jpy, Some(2000.0));
        assert_eq!(res.price_difference.amount_jpy, None);
        assert_eq!(res.price_difference.percent, None);
        assert_eq!(res.price_difference.exchange_rate_used, 100.0);
    }

    #[tokio::test]
    async fn test_compare_lookup_error_is_not_found() {
        let req = CompareRequest {
            asin: "B00000FAIL".to_string(),
            ..Default::default()
        };
        let res = compare(&StubCatalog, &req).await.unwrap();
        assert!(!res.jp_amazon.found);
        assert!(!res.us_amazon.found);
    }

    #[tokio::test]
    async fn test_compare_requires_asin() {
        let err = compare(&StubCatalog, &CompareRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "ASIN is required");
    }

    #[test]
    fn test_zero_us_price_gives_zero_percent() {
        let diff = price_difference(Some(1000.0), Some(0.0), 150.0);
        assert_eq!(diff.amount_jpy, Some(1000.0));
        assert_eq!(diff.percent, Some(0.0));
    }
}
