pub mod blacklist_type;
pub mod listing_status;
pub mod severity;
pub mod stock_status;
