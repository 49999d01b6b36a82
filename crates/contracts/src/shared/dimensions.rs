use serde::{Deserialize, Serialize};

/// Габариты товара в сантиметрах
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Объём в кубических сантиметрах
    pub fn volume_cm3(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Все три стороны заданы и положительны
    pub fn is_complete(&self) -> bool {
        self.length > 0.0 && self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_and_completeness() {
        let d = Dimensions::new(30.0, 20.0, 10.0);
        assert_eq!(d.volume_cm3(), 6000.0);
        assert!(d.is_complete());
        assert!(!Dimensions::new(30.0, 0.0, 10.0).is_complete());
    }
}
