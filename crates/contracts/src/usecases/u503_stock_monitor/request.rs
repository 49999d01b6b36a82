use serde::{Deserialize, Serialize};

pub const MIN_CHECK_INTERVAL_HOURS: u32 = 1;
pub const MAX_CHECK_INTERVAL_HOURS: u32 = 168;

/// Настройки мониторинга (сохраняются в sys_monitor_settings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Фоновая проверка включена
    pub monitoring: bool,
    /// Целое число часов; дробные и отрицательные значения отсекает `validate`
    pub check_interval_hours: f64,
    pub auto_stop_on_out_of_stock: bool,
    pub auto_update_prices: bool,
    pub auto_stop_low_profit: bool,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            monitoring: true,
            check_interval_hours: 24.0,
            auto_stop_on_out_of_stock: true,
            auto_update_prices: true,
            auto_stop_low_profit: true,
        }
    }
}

impl MonitorSettings {
    pub fn validate(&self) -> Result<(), String> {
        let hours = self.check_interval_hours;
        let in_range = hours >= f64::from(MIN_CHECK_INTERVAL_HOURS)
            && hours <= f64::from(MAX_CHECK_INTERVAL_HOURS);
        if !in_range || hours.fract() != 0.0 {
            return Err(format!(
                "check_interval_hours must be a whole number between {} and {}",
                MIN_CHECK_INTERVAL_HOURS, MAX_CHECK_INTERVAL_HOURS
            ));
        }
        Ok(())
    }

    /// Интервал в часах; для непроверенных значений ограничен допустимым диапазоном
    pub fn interval_hours(&self) -> i64 {
        let hours = self.check_interval_hours;
        if hours.is_nan() {
            return i64::from(MAX_CHECK_INTERVAL_HOURS);
        }
        hours.trunc().clamp(
            f64::from(MIN_CHECK_INTERVAL_HOURS),
            f64::from(MAX_CHECK_INTERVAL_HOURS),
        ) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_bounds() {
        let mut s = MonitorSettings::default();
        assert!(s.validate().is_ok());
        s.check_interval_hours = 168.0;
        assert!(s.validate().is_ok());
        s.check_interval_hours = 0.0;
        assert!(s.validate().is_err());
        s.check_interval_hours = 169.0;
        assert_eq!(
            s.validate().unwrap_err(),
            "check_interval_hours must be a whole number between 1 and 168"
        );
    }

    #[test]
    fn test_negative_and_fractional_intervals_reach_validation() {
        for raw in ["-1", "1.5", "0"] {
            let json = format!(
                r#"{{"monitoring":true,"check_interval_hours":{},"auto_stop_on_out_of_stock":true,"auto_update_prices":true,"auto_stop_low_profit":true}}"#,
                raw
            );
            let settings: MonitorSettings = serde_json::from_str(&json).unwrap();
            assert!(settings.validate().is_err(), "{}", raw);
        }
    }

    #[test]
    fn test_integer_json_is_accepted() {
        let json = r#"{"monitoring":false,"check_interval_hours":12,"auto_stop_on_out_of_stock":true,"auto_update_prices":true,"auto_stop_low_profit":true}"#;
        let settings: MonitorSettings = serde_json::from_str(json).unwrap();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.interval_hours(), 12);
    }

    #[test]
    fn test_interval_hours_is_clamped() {
        let mut s = MonitorSettings::default();
        assert_eq!(s.interval_hours(), 24);
        s.check_interval_hours = -5.0;
        assert_eq!(s.interval_hours(), 1);
        s.check_interval_hours = 1e9;
        assert_eq!(s.interval_hours(), 168);
    }
}
