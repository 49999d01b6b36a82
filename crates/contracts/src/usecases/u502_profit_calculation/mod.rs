pub mod request;
pub mod response;

pub use request::{ProfitRequest, ShippingProvider, ShippingRequest};
pub use response::{CostBreakdown, ProfitResponse, ProfitResult, ShippingQuote, ShippingResponse};

use crate::usecases::common::UseCaseMetadata;

pub struct ProfitCalculation;

impl UseCaseMetadata for ProfitCalculation {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "profit_calculation"
    }

    fn display_name() -> &'static str {
        "Profit calculator"
    }

    fn description() -> &'static str {
        "Расчёт прибыли с учётом доставки, пошлин, налога и комиссий Amazon"
    }
}
