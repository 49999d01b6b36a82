//! Форматирование чисел и дат для таблиц и карточек

use chrono::{DateTime, Utc};

/// Число с разделителем тысяч (пробел) и заданным количеством знаков после точки
///
/// ```ignore
/// assert_eq!(format_number(1234.567, 2), "1 234.57");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, c) in integer_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 && c != '-' {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    match decimal_part {
        Some(d) => format!("{}.{}", grouped, d),
        None => grouped,
    }
}

/// Сумма в иенах: `¥9 800`
pub fn format_yen(value: f64) -> String {
    format!("¥{}", format_number(value, 0))
}

/// Сумма в долларах: `$20.00`
pub fn format_usd(value: f64) -> String {
    format!("${}", format_number(value, 2))
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Время UTC: `2024-03-15 14:02:26`
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_optional_timestamp(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(format_timestamp).unwrap_or_else(|| "-".to_string())
}

/// Разбор числа из поля ввода: пустая строка даёт `None`,
/// пробелы-разделители и десятичная запятая допускаются
pub fn parse_number(value: &str) -> Option<f64> {
    let normalized = value.trim().replace(' ', "").replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number(" 12,5 "), Some(12.5));
        assert_eq!(parse_number("9 800"), Some(9800.0));
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234.567, 0), "1 235");
        assert_eq!(format_number(1234.567, 2), "1 234.57");
        assert_eq!(format_number(0.0, 2), "0.00");
        assert_eq!(format_number(-1234.0, 0), "-1 234");
        assert_eq!(format_number(-123.0, 0), "-123");
    }

    #[test]
    fn test_currency_helpers() {
        assert_eq!(format_yen(9800.0), "¥9 800");
        assert_eq!(format_usd(20.0), "$20.00");
        assert_eq!(format_percent(24.134), "24.13%");
    }

    #[test]
    fn test_timestamps() {
        let dt = DateTime::parse_from_rfc3339("2024-03-15T14:02:26Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_timestamp(&dt), "2024-03-15 14:02:26");
        assert_eq!(format_optional_timestamp(None), "-");
    }
}
