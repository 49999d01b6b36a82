pub mod common;
pub mod u501_compare_prices;
pub mod u502_profit_calculation;
pub mod u503_stock_monitor;
