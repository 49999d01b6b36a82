//! Заголовки табов: единственный источник правды для ключей и подписей.

pub const LISTINGS: &str = "a001_listing";
pub const LISTING_NEW: &str = "a001_listing_new";
pub const LISTING_DETAIL_PREFIX: &str = "a001_listing_detail_";
pub const BLACKLIST: &str = "a002_blacklist";
pub const COMPARE_PRICES: &str = "u501_compare_prices";
pub const PROFIT_CALCULATOR: &str = "u502_profit_calculator";
pub const STOCK_MONITOR: &str = "u503_stock_monitor";

/// Подпись таба для ключа. Для detail-табов возвращает подпись сущности.
/// Fallback: пустая строка.
pub fn tab_label_for_key(key: &str) -> &'static str {
    match key {
        LISTINGS => "Листинги",
        LISTING_NEW => "Новый листинг",
        BLACKLIST => "Чёрный список",
        COMPARE_PRICES => "Сравнение US↔JP",
        PROFIT_CALCULATOR => "Калькулятор прибыли",
        STOCK_MONITOR => "Мониторинг",
        k if k.starts_with(LISTING_DETAIL_PREFIX) => "Листинг",
        _ => "",
    }
}

pub fn listing_detail_key(id: &str) -> String {
    format!("{}{}", LISTING_DETAIL_PREFIX, id)
}

/// Заголовок detail-таба: «<сущность> · <идентификатор>»
pub fn detail_tab_label(entity_label: &str, identifier: &str) -> String {
    format!("{} · {}", entity_label, identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_have_labels() {
        for key in [
            LISTINGS,
            LISTING_NEW,
            BLACKLIST,
            COMPARE_PRICES,
            PROFIT_CALCULATOR,
            STOCK_MONITOR,
        ] {
            assert!(!tab_label_for_key(key).is_empty(), "{key}");
        }
        assert_eq!(tab_label_for_key("unknown"), "");
    }

    #[test]
    fn test_detail_keys() {
        let key = listing_detail_key("abc");
        assert_eq!(key, "a001_listing_detail_abc");
        assert_eq!(tab_label_for_key(&key), "Листинг");
        assert_eq!(detail_tab_label("Листинг", "B0TEST0001"), "Листинг · B0TEST0001");
    }
}
