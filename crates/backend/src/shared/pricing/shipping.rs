use contracts::shared::Dimensions;
use contracts::usecases::u502_profit_calculation::{ShippingProvider, ShippingQuote, ShippingRequest};

/// Делитель объёмного веса (см³ на кг)
const VOLUMETRIC_DIVISOR: f64 = 5000.0;
/// Тариф оценки, JPY за кг
const RATE_PER_KG: f64 = 1000.0;
/// Минимальная стоимость отправки, JPY
const MINIMUM_CHARGE: f64 = 2000.0;

/// Расчёт международной доставки US -> JP.
///
/// У служб доставки нет подключённого API, поэтому для любой службы
/// возвращается оценка по весу с провайдером `estimated`.
#[derive(Debug, Clone, Default)]
pub struct ShippingCalculator;

impl ShippingCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(&self, req: &ShippingRequest) -> ShippingQuote {
        match req.provider() {
            ShippingProvider::MadBeast | ShippingProvider::ImportCom => {
                tracing::debug!(
                    "No API configured for shipping provider '{}', using estimate",
                    req.provider().code()
                );
            }
            ShippingProvider::Other => {}
        }
        Self::estimate(req.weight_kg, &req.dimensions_cm)
    }

    /// Оценка: max(фактический, объёмный вес) * тариф, но не меньше минимума
    pub fn estimate(weight_kg: f64, dimensions: &Dimensions) -> ShippingQuote {
        let volumetric_weight_kg = dimensions.volume_cm3() / VOLUMETRIC_DIVISOR;
        let chargeable_weight_kg = weight_kg.max(volumetric_weight_kg);
        let shipping_cost = MINIMUM_CHARGE.max(chargeable_weight_kg * RATE_PER_KG);

        ShippingQuote {
            shipping_cost,
            provider: "estimated".to_string(),
            estimated_days: 7,
            service_type: "standard".to_string(),
            chargeable_weight_kg,
            volumetric_weight_kg,
            actual_weight_kg: weight_kg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_charge_applies() {
        let quote = ShippingCalculator::estimate(0.5, &Dimensions::new(10.0, 10.0, 10.0));
        assert_eq!(quote.shipping_cost, 2000.0);
        assert_eq!(quote.volumetric_weight_kg, 0.2);
        assert_eq!(quote.chargeable_weight_kg, 0.5);
    }

    #[test]
    fn test_volumetric_weight_wins() {
        let quote = ShippingCalculator::estimate(1.0, &Dimensions::new(50.0, 40.0, 30.0));
        assert_eq!(quote.volumetric_weight_kg, 12.0);
        assert_eq!(quote.shipping_cost, 12000.0);
    }

    #[test]
    fn test_every_provider_resolves_to_estimate() {
        let calc = ShippingCalculator::new();
        for provider in [Some("mad_beast"), Some("import_com"), Some("dhl"), None] {
            let req = ShippingRequest {
                weight_kg: 3.5,
                provider: provider.map(String::from),
                ..Default::default()
            };
            let quote = calc.calculate(&req);
            assert_eq!(quote.provider, "estimated");
            assert_eq!(quote.shipping_cost, 3500.0);
            assert_eq!(quote.estimated_days, 7);
            assert_eq!(quote.service_type, "standard");
        }
    }
}
