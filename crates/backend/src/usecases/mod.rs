pub mod u501_compare_prices;
pub mod u503_stock_monitor;
