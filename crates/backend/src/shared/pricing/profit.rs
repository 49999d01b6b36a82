use contracts::usecases::u502_profit_calculation::{CostBreakdown, ProfitRequest, ProfitResult};

use super::round2;
use super::shipping::ShippingCalculator;
use crate::shared::config::{config, PricingConfig};

/// Пошлина от стоимости товара в JPY
const CUSTOMS_RATE: f64 = 0.05;
/// Потребительский налог Японии
const CONSUMPTION_TAX_RATE: f64 = 0.10;

/// Калькулятор прибыли листинга (все суммы в JPY, кроме `us_price`)
#[derive(Debug, Clone)]
pub struct ProfitCalculator {
    usd_to_jpy_rate: f64,
    transfer_fee: f64,
    customs_clearance_fee: f64,
    referral_fee_rate: f64,
    closing_fee: f64,
}

impl ProfitCalculator {
    pub fn new(pricing: &PricingConfig) -> Self {
        Self {
            usd_to_jpy_rate: pricing.usd_to_jpy_rate,
            transfer_fee: pricing.transfer_fee,
            customs_clearance_fee: pricing.customs_clearance_fee,
            referral_fee_rate: pricing.amazon_referral_fee_rate,
            closing_fee: pricing.amazon_closing_fee,
        }
    }

    /// Калькулятор с параметрами из конфигурации процесса
    pub fn from_config() -> Self {
        Self::new(&config().pricing)
    }

    pub fn calculate(&self, req: &ProfitRequest) -> ProfitResult {
        let rate = req
            .exchange_rate
            .filter(|r| *r > 0.0)
            .unwrap_or(self.usd_to_jpy_rate);
        let us_price_jpy = req.us_price * rate;

        let international = match req.international_shipping_cost {
            Some(cost) => cost,
            None if req.calculate_shipping => match (req.weight_kg, req.dimensions_cm) {
                (Some(weight), Some(dims)) if weight > 0.0 => {
                    ShippingCalculator::estimate(weight, &dims).shipping_cost
                }
                _ => 0.0,
            },
            None => 0.0,
        };
        let domestic = req.domestic_shipping_cost.unwrap_or(0.0);
        let customs_fee = req
            .customs_fee
            .unwrap_or(us_price_jpy * CUSTOMS_RATE);
        let transfer_fee = req
            .transfer_fee
            .filter(|v| *v > 0.0)
            .unwrap_or(self.transfer_fee);
        let clearance_fee = req
            .customs_clearance_fee
            .filter(|v| *v > 0.0)
            .unwrap_or(self.customs_clearance_fee);

        let consumption_tax = (us_price_jpy + international + customs_fee) * CONSUMPTION_TAX_RATE;
        let amazon_fee = req
            .amazon_fee_override
            .unwrap_or(req.jp_listing_price * self.referral_fee_rate + self.closing_fee);

        let total_cost = us_price_jpy
            + international
            + domestic
            + customs_fee
            + consumption_tax
            + transfer_fee
            + clearance_fee;
        let profit_amount = req.jp_listing_price - total_cost - amazon_fee;
        let profit_rate = if req.jp_listing_price > 0.0 {
            profit_amount / req.jp_listing_price * 100.0
        } else {
            0.0
        };

        ProfitResult {
            profit_amount: round2(profit_amount),
            profit_rate: round2(profit_rate),
            total_cost: round2(total_cost),
            jp_listing_price: req.jp_listing_price,
            cost_breakdown: CostBreakdown {
                us_price_jpy: round2(us_price_jpy),
                international_shipping_cost: round2(international),
                domestic_shipping_cost: round2(domestic),
                customs_fee: round2(customs_fee),
                consumption_tax: round2(consumption_tax),
                transfer_fee: round2(transfer_fee),
                customs_clearance_fee: round2(clearance_fee),
                amazon_fee: round2(amazon_fee),
            },
            exchange_rate_used: rate,
        }
    }

    pub fn is_profitable(profit_amount: f64, minimum_profit_threshold: f64) -> bool {
        profit_amount >= minimum_profit_threshold
    }
}

impl Default for ProfitCalculator {
    fn default() -> Self {
        Self::new(&PricingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::Dimensions;

    fn base() -> ProfitRequest {
        ProfitRequest {
            us_price: 20.0,
            jp_listing_price: 9800.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_costs() {
        let result = ProfitCalculator::default().calculate(&base());
        let b = &result.cost_breakdown;
        assert_eq!(b.us_price_jpy, 3000.0);
        assert_eq!(b.international_shipping_cost, 0.0);
        assert_eq!(b.customs_fee, 150.0);
        assert_eq!(b.consumption_tax, 315.0);
        assert_eq!(b.transfer_fee, 500.0);
        assert_eq!(b.customs_clearance_fee, 2000.0);
        assert_eq!(b.amazon_fee, 1470.0);
        assert_eq!(result.total_cost, 5965.0);
        assert_eq!(result.profit_amount, 2365.0);
        assert_eq!(result.profit_rate, 24.13);
        assert_eq!(result.exchange_rate_used, 150.0);
    }

    #[test]
    fn test_cheap_item_total_rounds_half_up() {
        let req = ProfitRequest {
            us_price: 0.10,
            ..base()
        };
        let result = ProfitCalculator::default().calculate(&req);
        assert_eq!(result.total_cost, 2517.33);
    }

    #[test]
    fn test_shipping_estimated_from_weight_and_dimensions() {
        let req = ProfitRequest {
            weight_kg: Some(3.5),
            dimensions_cm: Some(Dimensions::new(30.0, 20.0, 10.0)),
            ..base()
        };
        let result = ProfitCalculator::default().calculate(&req);
        assert_eq!(result.cost_breakdown.international_shipping_cost, 3500.0);

        let no_estimate = ProfitRequest {
            calculate_shipping: false,
            ..req
        };
        let result = ProfitCalculator::default().calculate(&no_estimate);
        assert_eq!(result.cost_breakdown.international_shipping_cost, 0.0);
    }

    #[test]
    fn test_overrides_and_zero_fees_fall_back() {
        let req = ProfitRequest {
            exchange_rate: Some(100.0),
            international_shipping_cost: Some(1200.0),
            customs_fee: Some(0.0),
            transfer_fee: Some(0.0),
            customs_clearance_fee: Some(1000.0),
            amazon_fee_override: Some(500.0),
            ..base()
        };
        let result = ProfitCalculator::default().calculate(&req);
        let b = &result.cost_breakdown;
        assert_eq!(b.us_price_jpy, 2000.0);
        assert_eq!(b.customs_fee, 0.0);
        assert_eq!(b.transfer_fee, 500.0);
        assert_eq!(b.customs_clearance_fee, 1000.0);
        assert_eq!(b.consumption_tax, 320.0);
        assert_eq!(b.amazon_fee, 500.0);
        assert_eq!(result.exchange_rate_used, 100.0);
    }

    #[test]
    fn test_zero_listing_price_has_zero_rate() {
        let req = ProfitRequest {
            jp_listing_price: 0.0,
            ..base()
        };
        let result = ProfitCalculator::default().calculate(&req);
        assert_eq!(result.profit_rate, 0.0);
        assert!(result.profit_amount < 0.0);
        assert!(!ProfitCalculator::is_profitable(result.profit_amount, 3000.0));
        assert!(ProfitCalculator::is_profitable(3000.0, 3000.0));
    }
}
