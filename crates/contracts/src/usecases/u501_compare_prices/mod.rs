pub mod request;
pub mod response;

pub use request::CompareRequest;
pub use response::{CompareResponse, MarketSnapshot, PriceDifference};

use crate::usecases::common::UseCaseMetadata;

pub struct ComparePrices;

impl UseCaseMetadata for ComparePrices {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "compare_prices"
    }

    fn display_name() -> &'static str {
        "Compare US / JP prices"
    }

    fn description() -> &'static str {
        "Сравнение цены товара на Amazon JP и Amazon US по ASIN"
    }
}
