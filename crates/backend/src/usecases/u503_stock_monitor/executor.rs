use chrono::Utc;
use contracts::domain::a001_listing::aggregate::Listing;
use contracts::enums::listing_status::ListingStatus;
use contracts::enums::stock_status::StockStatus;
use contracts::usecases::u502_profit_calculation::ProfitRequest;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u503_stock_monitor::{
    CheckAllSummary, CheckOutcome, ListingUpdates, MonitorSettings, MonitorStatus, StockMonitor,
};
use uuid::Uuid;

use super::settings::{self, LastRun};
use crate::domain::a001_listing;
use crate::shared::amazon::{self, CatalogItem, CatalogProvider, Marketplace};
use crate::shared::pricing::ProfitCalculator;

/// Результат запроса к одной площадке
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarketCheck {
    /// `None`, если каталог вернул ошибку
    pub stock_status: Option<StockStatus>,
    pub price: Option<f64>,
}

impl MarketCheck {
    pub fn from_item(item: Option<&CatalogItem>) -> Self {
        match item {
            Some(item) => Self {
                stock_status: Some(if item.availability {
                    StockStatus::InStock
                } else {
                    StockStatus::OutOfStock
                }),
                price: item.price,
            },
            None => Self {
                stock_status: Some(StockStatus::Unavailable),
                price: None,
            },
        }
    }
}

async fn check_market(catalog: &dyn CatalogProvider, marketplace: Marketplace, asin: &str) -> MarketCheck {
    match catalog.lookup(marketplace, asin).await {
        Ok(item) => MarketCheck::from_item(item.as_ref()),
        Err(e) => {
            tracing::warn!("Stock check of {} on {} failed: {}", asin, marketplace.domain(), e);
            MarketCheck::default()
        }
    }
}

/// Применяет результаты проверки к листингу и возвращает список изменений
pub fn plan_updates(
    listing: &mut Listing,
    jp: MarketCheck,
    us: Option<MarketCheck>,
    settings: &MonitorSettings,
    calculator: &ProfitCalculator,
) -> ListingUpdates {
    let mut updates = ListingUpdates::default();

    if let Some(stock_status) = jp.stock_status {
        updates.stock_status = Some(stock_status);
        listing.stock_status = stock_status;
    }
    if settings.auto_update_prices {
        if let Some(price) = jp.price.filter(|p| *p > 0.0) {
            updates.jp_price = Some(price);
            listing.jp_price = price;
        }
    }

    if let Some(us) = us {
        updates.us_stock_status = us.stock_status;
        if let Some(price) = us.price.filter(|p| *p > 0.0) {
            updates.us_price = Some(price);
            listing.us_price = price;
        }
    }

    let prices_changed = updates.jp_price.is_some() || updates.us_price.is_some();
    if prices_changed && listing.us_price > 0.0 && listing.listing_price > 0.0 {
        let result = calculator.calculate(&profit_request(listing));
        updates.profit_amount = Some(result.profit_amount);
        updates.profit_rate = Some(result.profit_rate);
        updates.amazon_fee = Some(result.cost_breakdown.amazon_fee);
        listing.profit_amount = result.profit_amount;
        listing.profit_rate = result.profit_rate;
        listing.amazon_fee = result.cost_breakdown.amazon_fee;
    }

    if listing.status == ListingStatus::Active {
        let reason = if settings.auto_stop_on_out_of_stock
            && listing.stock_status == StockStatus::OutOfStock
        {
            Some("Out of stock".to_string())
        } else if settings.auto_stop_low_profit
            && listing.profit_amount < listing.minimum_profit_threshold
        {
            Some(format!(
                "Profit below threshold ({:.1} < {:.1})",
                listing.profit_amount, listing.minimum_profit_threshold
            ))
        } else {
            None
        };

        if let Some(reason) = reason {
            listing.status = ListingStatus::Paused;
            updates.status = Some(ListingStatus::Paused);
            updates.auto_stopped_reason = Some(reason);
        }
    }

    updates
}

/// Пересчёт прибыли по сохранённым издержкам, без оценки доставки
fn profit_request(listing: &Listing) -> ProfitRequest {
    ProfitRequest {
        us_price: listing.us_price,
        jp_listing_price: listing.listing_price,
        weight_kg: listing.weight.filter(|w| *w > 0.0).map(|w| w / 1000.0),
        dimensions_cm: listing.dimensions,
        international_shipping_cost: Some(listing.international_shipping_cost),
        domestic_shipping_cost: Some(listing.domestic_shipping_cost),
        customs_fee: Some(listing.customs_fee),
        transfer_fee: Some(listing.transfer_fee),
        calculate_shipping: false,
        ..Default::default()
    }
}

/// Проверить один листинг. `None` - листинг не найден.
pub async fn check_listing(id: Uuid) -> anyhow::Result<Option<CheckOutcome>> {
    let Some(mut listing) = a001_listing::service::get_by_id(id).await? else {
        return Ok(None);
    };
    let settings = settings::load_settings().await?;
    let catalog = amazon::provider();
    let updates = run_check(catalog.as_ref(), &mut listing, &settings).await?;

    Ok(Some(CheckOutcome {
        success: true,
        listing_id: id.to_string(),
        updates,
    }))
}

async fn run_check(
    catalog: &dyn CatalogProvider,
    listing: &mut Listing,
    settings: &MonitorSettings,
) -> anyhow::Result<ListingUpdates> {
    let jp = check_market(catalog, Marketplace::Jp, listing.jp_lookup_asin()).await;

    let us_asin = listing.us_asin.clone().filter(|s| !s.is_empty());
    let us = match us_asin {
        Some(asin) if settings.auto_update_prices => {
            Some(check_market(catalog, Marketplace::Us, &asin).await)
        }
        _ => None,
    };

    let updates = plan_updates(listing, jp, us, settings, &ProfitCalculator::from_config());
    listing.last_checked = Some(Utc::now());
    a001_listing::service::save(listing).await?;

    if let Some(reason) = &updates.auto_stopped_reason {
        tracing::info!("Listing {} ({}) auto-stopped: {}", listing.asin, listing.id.0, reason);
    }
    Ok(updates)
}

/// Проверить все активные листинги последовательно
pub async fn check_all() -> anyhow::Result<CheckAllSummary> {
    let listings = a001_listing::service::list_active().await?;
    let settings = settings::load_settings().await?;
    let catalog = amazon::provider();

    let mut summary = CheckAllSummary {
        total: listings.len(),
        ..Default::default()
    };
    tracing::info!(
        "{}: checking {} active listings",
        StockMonitor::full_name(),
        summary.total
    );

    for mut listing in listings {
        match run_check(catalog.as_ref(), &mut listing, &settings).await {
            Ok(updates) => {
                summary.checked += 1;
                if !updates.is_empty() {
                    summary.updated += 1;
                }
                if updates.auto_stopped() {
                    summary.auto_stopped += 1;
                }
            }
            Err(e) => {
                tracing::error!("Error checking listing {}: {}", listing.id.0, e);
                summary.errors += 1;
            }
        }
    }

    settings::save_last_run(&LastRun {
        at: Utc::now(),
        summary,
    })
    .await?;
    tracing::info!(
        "Stock check finished: checked {}, updated {}, auto-stopped {}, errors {}",
        summary.checked,
        summary.updated,
        summary.auto_stopped,
        summary.errors
    );
    Ok(summary)
}

pub async fn status() -> anyhow::Result<MonitorStatus> {
    let settings = settings::load_settings().await?;
    let last_run = settings::load_last_run().await?;
    Ok(MonitorStatus {
        success: true,
        monitoring: settings.monitoring,
        monitored_count: a001_listing::service::count_active().await?,
        last_check_at: last_run.map(|r| r.at),
        last_summary: last_run.map(|r| r.summary),
        settings,
    })
}

/// Сохранить настройки; интервал проверяется до записи
pub async fn update_settings(new_settings: MonitorSettings) -> anyhow::Result<MonitorStatus> {
    new_settings.validate().map_err(anyhow::Error::msg)?;
    settings::save_settings(&new_settings).await?;
    tracing::info!(
        "Monitor settings updated: monitoring={}, interval={}h",
        new_settings.monitoring,
        new_settings.check_interval_hours
    );
    status().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_listing::aggregate::ListingDto;

    fn active_listing() -> Listing {
        let mut listing = Listing::new_for_insert(&ListingDto {
            asin: "B000000001".to_string(),
            us_asin: Some("B000000001".to_string()),
            us_price: 20.0,
            listing_price: 9800.0,
            ..Default::default()
        });
        listing.status = ListingStatus::Active;
        listing.profit_amount = 5000.0;
        listing
    }

    fn found(price: f64, available: bool) -> MarketCheck {
        MarketCheck::from_item(Some(&CatalogItem {
            price: Some(price),
            availability: available,
            ..Default::default()
        }))
    }

    #[test]
    fn test_out_of_stock_pauses_active_listing() {
        let mut listing = active_listing();
        let updates = plan_updates(
            &mut listing,
            found(0.0, false),
            None,
            &MonitorSettings::default(),
            &ProfitCalculator::default(),
        );
        assert_eq!(updates.stock_status, Some(StockStatus::OutOfStock));
        assert_eq!(updates.jp_price, None);
        assert_eq!(updates.status, Some(ListingStatus::Paused));
        assert_eq!(updates.auto_stopped_reason.as_deref(), Some("Out of stock"));
        assert_eq!(listing.status, ListingStatus::Paused);
    }

    #[test]
    fn test_price_change_recalculates_profit() {
        let mut listing = active_listing();
        let updates = plan_updates(
            &mut listing,
            found(4500.0, true),
            Some(found(20.0, true)),
            &MonitorSettings::default(),
            &ProfitCalculator::default(),
        );
        assert_eq!(updates.jp_price, Some(4500.0));
        assert_eq!(updates.us_price, Some(20.0));
        assert_eq!(updates.us_stock_status, Some(StockStatus::InStock));
        // сохранённая пошлина 0 не заменяется ставкой по умолчанию
        assert_eq!(updates.profit_amount, Some(2530.0));
        assert_eq!(updates.amazon_fee, Some(1470.0));
        assert_eq!(listing.profit_rate, 25.82);
        assert_eq!(
            updates.auto_stopped_reason.as_deref(),
            Some("Profit below threshold (2530.0 < 3000.0)")
        );
    }

    #[test]
    fn test_stored_customs_fee_is_used() {
        let mut listing = active_listing();
        listing.customs_fee = 400.0;
        listing.minimum_profit_threshold = 2000.0;
        let updates = plan_updates(
            &mut listing,
            found(4500.0, true),
            Some(found(20.0, true)),
            &MonitorSettings::default(),
            &ProfitCalculator::default(),
        );
        // 3000 + 400 + 340 + 500 + 2000 = 6240
        assert_eq!(updates.profit_amount, Some(2090.0));
        assert_eq!(updates.status, None);

        listing.minimum_profit_threshold = 2500.0;
        let updates = plan_updates(
            &mut listing,
            found(4400.0, true),
            None,
            &MonitorSettings::default(),
            &ProfitCalculator::default(),
        );
        assert_eq!(
            updates.auto_stopped_reason.as_deref(),
            Some("Profit below threshold (2090.0 < 2500.0)")
        );
    }

    #[test]
    fn test_auto_stop_disabled_keeps_status() {
        let mut listing = active_listing();
        let settings = MonitorSettings {
            auto_stop_on_out_of_stock: false,
            auto_stop_low_profit: false,
            ..Default::default()
        };
        let updates = plan_updates(
            &mut listing,
            found(4500.0, false),
            None,
            &settings,
            &ProfitCalculator::default(),
        );
        assert_eq!(updates.status, None);
        assert_eq!(listing.status, ListingStatus::Active);
    }

    #[test]
    fn test_draft_listing_is_never_paused() {
        let mut listing = active_listing();
        listing.status = ListingStatus::Draft;
        let updates = plan_updates(
            &mut listing,
            MarketCheck::from_item(None),
            None,
            &MonitorSettings::default(),
            &ProfitCalculator::default(),
        );
        assert_eq!(updates.stock_status, Some(StockStatus::Unavailable));
        assert!(!updates.auto_stopped());
        assert_eq!(listing.status, ListingStatus::Draft);
    }

    #[test]
    fn test_failed_lookup_changes_nothing() {
        let mut listing = active_listing();
        let updates = plan_updates(
            &mut listing,
            MarketCheck::default(),
            None,
            &MonitorSettings::default(),
            &ProfitCalculator::default(),
        );
        assert!(updates.is_empty());
        assert_eq!(listing.stock_status, StockStatus::Unknown);
    }

    #[test]
    fn test_price_updates_respect_setting() {
        let mut listing = active_listing();
        let settings = MonitorSettings {
            auto_update_prices: false,
            ..Default::default()
        };
        let updates = plan_updates(
            &mut listing,
            found(4500.0, true),
            None,
            &settings,
            &ProfitCalculator::default(),
        );
        assert_eq!(updates.jp_price, None);
        assert_eq!(updates.profit_amount, None);
        assert_eq!(listing.jp_price, 0.0);
    }
}
