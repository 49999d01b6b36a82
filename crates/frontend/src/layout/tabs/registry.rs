//! Реестр контента табов: ключ таба → View.

use super::tab_labels::*;
use crate::domain::a001_listing::ui::details::ListingDetails;
use crate::domain::a001_listing::ui::list::ListingList;
use crate::domain::a002_blacklist::ui::BlacklistPage;
use crate::layout::global_context::AppGlobalContext;
use crate::usecases::u501_compare_prices::ComparePricesView;
use crate::usecases::u502_profit_calculation::ProfitCalculatorView;
use crate::usecases::u503_stock_monitor::StockMonitorView;
use leptos::logging::log;
use leptos::prelude::*;

/// Рендерит контент таба по его ключу.
///
/// `tabs_store` нужен detail-формам, чтобы закрыть свой таб после сохранения.
pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    let key_for_close = key.to_string();
    let on_close = Callback::new(move |_| tabs_store.close_tab(&key_for_close));

    match key {
        LISTINGS => view! { <ListingList /> }.into_any(),
        LISTING_NEW => view! { <ListingDetails id=None on_close=on_close /> }.into_any(),
        k if k.starts_with(LISTING_DETAIL_PREFIX) => {
            let id = k.trim_start_matches(LISTING_DETAIL_PREFIX).to_string();
            view! { <ListingDetails id=Some(id) on_close=on_close /> }.into_any()
        }
        BLACKLIST => view! { <BlacklistPage /> }.into_any(),
        COMPARE_PRICES => view! { <ComparePricesView /> }.into_any(),
        PROFIT_CALCULATOR => view! { <ProfitCalculatorView /> }.into_any(),
        STOCK_MONITOR => view! { <StockMonitorView /> }.into_any(),
        _ => {
            log!("unknown tab key: {}", key);
            view! { <div class="placeholder">{"Страница не найдена"}</div> }.into_any()
        }
    }
}
