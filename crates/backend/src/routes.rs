use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/health", get(handlers::health::health))
        // A001 Listings
        .route(
            "/api/listings",
            get(handlers::a001_listing::list).post(handlers::a001_listing::create),
        )
        .route(
            "/api/listings/duplicates",
            get(handlers::a001_listing::duplicates),
        )
        .route(
            "/api/listings/bulk-update",
            post(handlers::a001_listing::bulk_update),
        )
        .route(
            "/api/listings/bulk-delete",
            post(handlers::a001_listing::bulk_delete),
        )
        .route("/api/listings/import", post(handlers::a001_listing::import))
        .route(
            "/api/listings/:id",
            get(handlers::a001_listing::get_by_id)
                .put(handlers::a001_listing::update)
                .delete(handlers::a001_listing::delete),
        )
        // A002 Blacklist
        .route(
            "/api/blacklist",
            get(handlers::a002_blacklist::list_all).post(handlers::a002_blacklist::create),
        )
        .route("/api/blacklist/check", post(handlers::a002_blacklist::check))
        .route(
            "/api/blacklist/:id",
            axum::routing::delete(handlers::a002_blacklist::delete),
        )
        // UseCase u501: US / JP price comparison
        .route(
            "/api/compare/us-jp",
            post(handlers::u501_compare_prices::compare),
        )
        // UseCase u502: profit and shipping calculators
        .route(
            "/api/profit/calculate",
            post(handlers::u502_profit_calculation::calculate_profit),
        )
        .route(
            "/api/shipping/calculate",
            post(handlers::u502_profit_calculation::calculate_shipping),
        )
        // UseCase u503: stock monitor
        .route(
            "/api/monitor/status",
            get(handlers::u503_stock_monitor::status),
        )
        .route(
            "/api/monitor/settings",
            put(handlers::u503_stock_monitor::update_settings),
        )
        .route(
            "/api/monitor/check-all",
            post(handlers::u503_stock_monitor::check_all),
        )
        .route(
            "/api/monitor/check/:id",
            post(handlers::u503_stock_monitor::check_listing),
        )
}
