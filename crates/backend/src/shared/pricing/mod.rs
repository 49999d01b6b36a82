pub mod profit;
pub mod shipping;

pub use profit::ProfitCalculator;
pub use shipping::ShippingCalculator;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Округление до 0.01 с округлением половины от нуля.
/// Округляется кратчайшая десятичная запись числа, а не его двоичное значение.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| (value * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(1.125), 1.13);
        assert_eq!(round2(-1.125), -1.13);
        assert_eq!(round2(24.132653), 24.13);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_round2_uses_decimal_representation() {
        // 2517.325 и 1.005 хранятся в f64 чуть ниже середины
        assert_eq!(round2(2517.325), 2517.33);
        assert_eq!(round2(1.005), 1.01);
        // а это значение чуть выше, но в десятичной записи до середины не дотягивает
        assert_eq!(round2(1746.5349999999999), 1746.53);
        assert!(round2(f64::NAN).is_nan());
    }
}
