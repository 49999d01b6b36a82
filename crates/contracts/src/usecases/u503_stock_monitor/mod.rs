pub mod request;
pub mod response;

pub use request::MonitorSettings;
pub use response::{CheckAllResponse, CheckAllSummary, CheckOutcome, ListingUpdates, MonitorStatus};

use crate::usecases::common::UseCaseMetadata;

pub struct StockMonitor;

impl UseCaseMetadata for StockMonitor {
    fn usecase_index() -> &'static str {
        "u503"
    }

    fn usecase_name() -> &'static str {
        "stock_monitor"
    }

    fn display_name() -> &'static str {
        "Stock monitor"
    }

    fn description() -> &'static str {
        "Периодическая проверка наличия и цен активных листингов"
    }
}
