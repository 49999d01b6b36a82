//! Импорт листингов из CSV/JSON и колонки CSV-экспорта.
//!
//! Разбор выполняется на клиенте до отправки `POST /api/listings/import`,
//! поэтому модуль не зависит от сервера и полностью покрыт тестами.

use serde_json::{Map, Value};

use super::aggregate::{Listing, ListingDto};
use crate::shared::Dimensions;

/// Формат входного файла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

/// Ошибка разбора конкретной строки (номер строки данных, с 1)
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

/// Результат разбора файла
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub format: ImportFormat,
    pub items: Vec<ListingDto>,
    pub errors: Vec<RowError>,
}

impl ImportBatch {
    fn new(format: ImportFormat) -> Self {
        Self {
            format,
            items: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn file_error(format: ImportFormat, message: impl Into<String>) -> Self {
        let mut batch = Self::new(format);
        batch.errors.push(RowError {
            row: 0,
            message: message.into(),
        });
        batch
    }
}

// ============================================================================
// Column mapping
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Asin,
    JpAsin,
    UsAsin,
    Title,
    JpPrice,
    UsPrice,
    ListingPrice,
    Category,
    Manufacturer,
    Weight,
    Length,
    Width,
    Height,
    SourceUrl,
    Notes,
    MinimumProfitThreshold,
}

/// Алиасы заголовков в нормализованном виде (см. `normalize_header`)
const ALIASES: &[(Column, &[&str])] = &[
    (Column::Asin, &["asin"]),
    (Column::JpAsin, &["jp_asin", "asin_jp"]),
    (Column::UsAsin, &["us_asin", "asin_us"]),
    (Column::Title, &["title", "name", "product_name", "product_title"]),
    (Column::JpPrice, &["jp_price", "price_jp", "jpy_price", "amazon_jp_price"]),
    (Column::UsPrice, &["us_price", "price_us", "usd_price", "amazon_us_price"]),
    (Column::ListingPrice, &["listing_price", "price", "sale_price", "selling_price"]),
    (Column::Category, &["category"]),
    (Column::Manufacturer, &["manufacturer", "maker", "brand"]),
    (Column::Weight, &["weight", "weight_g", "weight_grams"]),
    (Column::Length, &["length", "length_cm"]),
    (Column::Width, &["width", "width_cm"]),
    (Column::Height, &["height", "height_cm"]),
    (Column::SourceUrl, &["source_url", "url", "product_url"]),
    (Column::Notes, &["notes", "note", "comment"]),
    (
        Column::MinimumProfitThreshold,
        &["minimum_profit_threshold", "min_profit", "profit_threshold"],
    ),
];

/// `" JP Price (¥)"` -> `"jp_price"`: нижний регистр, всё кроме букв и цифр
/// сворачивается в одиночный `_`.
fn normalize_header(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    for ch in header.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_')
        .trim_end_matches("_jpy")
        .trim_end_matches("_usd")
        .to_string()
}

fn column_for(header: &str) -> Option<Column> {
    let key = normalize_header(header);
    ALIASES
        .iter()
        .find(|(_, names)| names.contains(&key.as_str()))
        .map(|(column, _)| *column)
}

/// Число с разделителем тысяч `,` и префиксом валюты. Пустое значение даёт `None`.
pub fn parse_number(raw: &str) -> Result<Option<f64>, String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '¥' | '￥' | '$' | ' ' | '\u{a0}'))
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| format!("invalid number '{}'", raw.trim()))
}

// ============================================================================
// CSV
// ============================================================================

fn detect_delimiter(header_line: &str) -> u8 {
    let semicolons = header_line.matches(';').count();
    let commas = header_line.matches(',').count();
    let tabs = header_line.matches('\t').count();
    if tabs > semicolons && tabs > commas {
        b'\t'
    } else if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Разбор CSV с заголовком. Строки без ASIN попадают в `errors`.
pub fn parse_csv(text: &str) -> ImportBatch {
    let text = text.trim_start_matches('\u{feff}');
    let header_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if header_line.is_empty() {
        return ImportBatch::file_error(ImportFormat::Csv, "File is empty");
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(header_line))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns: Vec<Option<Column>> = match reader.headers() {
        Ok(headers) => headers.iter().map(column_for).collect(),
        Err(e) => {
            return ImportBatch::file_error(ImportFormat::Csv, format!("Invalid CSV header: {}", e))
        }
    };
    if !columns.contains(&Some(Column::Asin)) {
        return ImportBatch::file_error(ImportFormat::Csv, "Missing required column: asin");
    }

    let mut batch = ImportBatch::new(ImportFormat::Csv);
    let mut row = 0;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                row += 1;
                batch.errors.push(RowError {
                    row,
                    message: format!("Invalid CSV row: {}", e),
                });
                continue;
            }
        };
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        row += 1;

        let mut fields = Map::new();
        for (column, cell) in columns.iter().zip(record.iter()) {
            if let Some(column) = column {
                if !cell.is_empty() {
                    fields.insert(field_name(*column).to_string(), Value::String(cell.to_string()));
                }
            }
        }
        push_row(&mut batch, row, &fields);
    }
    batch
}

// ============================================================================
// JSON
// ============================================================================

/// Разбор JSON: массив объектов либо объект `{"listings": [...]}`
pub fn parse_json(text: &str) -> ImportBatch {
    let value: Value = match serde_json::from_str(text.trim_start_matches('\u{feff}')) {
        Ok(v) => v,
        Err(e) => {
            return ImportBatch::file_error(ImportFormat::Json, format!("Invalid JSON: {}", e))
        }
    };

    let rows = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("listings") {
            Some(Value::Array(items)) => items,
            _ => {
                return ImportBatch::file_error(
                    ImportFormat::Json,
                    "Expected an array or an object with a \"listings\" array",
                )
            }
        },
        _ => {
            return ImportBatch::file_error(
                ImportFormat::Json,
                "Expected an array or an object with a \"listings\" array",
            )
        }
    };

    let mut batch = ImportBatch::new(ImportFormat::Json);
    for (index, item) in rows.into_iter().enumerate() {
        let row = index + 1;
        let Value::Object(mut obj) = item else {
            batch.errors.push(RowError {
                row,
                message: "Row is not an object".into(),
            });
            continue;
        };
        if let Some(Value::Object(dims)) = obj.remove("dimensions") {
            for key in ["length", "width", "height"] {
                if let Some(v) = dims.get(key) {
                    obj.entry(key.to_string()).or_insert_with(|| v.clone());
                }
            }
        }
        push_row(&mut batch, row, &obj);
    }
    batch
}

/// Выбор парсера по расширению файла, иначе по первому символу содержимого
pub fn parse_import(file_name: &str, text: &str) -> ImportBatch {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".json") {
        return parse_json(text);
    }
    if lower.ends_with(".csv") || lower.ends_with(".txt") || lower.ends_with(".tsv") {
        return parse_csv(text);
    }
    let first = text.trim_start_matches('\u{feff}').trim_start().chars().next();
    match first {
        Some('[') | Some('{') => parse_json(text),
        _ => parse_csv(text),
    }
}

// ============================================================================
// Row -> DTO
// ============================================================================

fn field_name(column: Column) -> &'static str {
    match column {
        Column::Asin => "asin",
        Column::JpAsin => "jp_asin",
        Column::UsAsin => "us_asin",
        Column::Title => "title",
        Column::JpPrice => "jp_price",
        Column::UsPrice => "us_price",
        Column::ListingPrice => "listing_price",
        Column::Category => "category",
        Column::Manufacturer => "manufacturer",
        Column::Weight => "weight",
        Column::Length => "length",
        Column::Width => "width",
        Column::Height => "height",
        Column::SourceUrl => "source_url",
        Column::Notes => "notes",
        Column::MinimumProfitThreshold => "minimum_profit_threshold",
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(fields: &Map<String, Value>, key: &str, errors: &mut Vec<String>) -> Option<f64> {
    match fields.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match parse_number(s) {
            Ok(v) => v,
            Err(e) => {
                errors.push(format!("{}: {}", key, e));
                None
            }
        },
        Value::Null => None,
        _ => {
            errors.push(format!("{}: expected a number", key));
            None
        }
    }
}

fn push_row(batch: &mut ImportBatch, row: usize, fields: &Map<String, Value>) {
    let mut errors = Vec::new();
    let asin = text_field(fields, "asin").unwrap_or_default();
    if asin.is_empty() {
        errors.push("ASIN is required".to_string());
    }

    let jp_price = number_field(fields, "jp_price", &mut errors);
    let us_price = number_field(fields, "us_price", &mut errors);
    let listing_price = number_field(fields, "listing_price", &mut errors);
    let weight = number_field(fields, "weight", &mut errors);
    let length = number_field(fields, "length", &mut errors);
    let width = number_field(fields, "width", &mut errors);
    let height = number_field(fields, "height", &mut errors);
    let threshold = number_field(fields, "minimum_profit_threshold", &mut errors);

    if !errors.is_empty() {
        batch.errors.push(RowError {
            row,
            message: errors.join("; "),
        });
        return;
    }

    let dimensions = match (length, width, height) {
        (Some(l), Some(w), Some(h)) => Some(Dimensions::new(l, w, h)),
        _ => None,
    };

    let mut dto = ListingDto {
        asin,
        jp_asin: text_field(fields, "jp_asin"),
        us_asin: text_field(fields, "us_asin"),
        title: text_field(fields, "title").unwrap_or_default(),
        jp_price: jp_price.unwrap_or(0.0),
        us_price: us_price.unwrap_or(0.0),
        listing_price: listing_price.unwrap_or(0.0),
        category: text_field(fields, "category"),
        manufacturer: text_field(fields, "manufacturer"),
        weight,
        dimensions,
        source_url: text_field(fields, "source_url"),
        notes: text_field(fields, "notes"),
        source_row: Some(row),
        ..Default::default()
    };
    if let Some(t) = threshold {
        dto.minimum_profit_threshold = t;
    }
    batch.items.push(dto);
}

// ============================================================================
// Export
// ============================================================================

/// Колонки CSV-экспорта. Имена совпадают с алиасами импорта.
pub fn export_headers() -> Vec<&'static str> {
    vec![
        "asin",
        "jp_asin",
        "us_asin",
        "title",
        "jp_price",
        "us_price",
        "listing_price",
        "profit_amount",
        "profit_rate",
        "status",
        "stock_status",
        "category",
        "manufacturer",
        "weight",
        "length",
        "width",
        "height",
        "source_url",
        "notes",
        "last_checked",
        "created_at",
    ]
}

pub fn export_row(listing: &Listing) -> Vec<String> {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    let num = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    let dims = listing.dimensions;

    vec![
        listing.asin.clone(),
        opt(&listing.jp_asin),
        opt(&listing.us_asin),
        listing.title.clone(),
        listing.jp_price.to_string(),
        listing.us_price.to_string(),
        listing.listing_price.to_string(),
        listing.profit_amount.to_string(),
        listing.profit_rate.to_string(),
        listing.status.code().to_string(),
        listing.stock_status.code().to_string(),
        opt(&listing.category),
        opt(&listing.manufacturer),
        num(listing.weight),
        num(dims.map(|d| d.length)),
        num(dims.map(|d| d.width)),
        num(dims.map(|d| d.height)),
        opt(&listing.source_url),
        opt(&listing.notes),
        listing
            .last_checked
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        listing.metadata.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_aliases() {
        assert_eq!(column_for("ASIN"), Some(Column::Asin));
        assert_eq!(column_for(" JP Price "), Some(Column::JpPrice));
        assert_eq!(column_for("price_jp"), Some(Column::JpPrice));
        assert_eq!(column_for("Price"), Some(Column::ListingPrice));
        assert_eq!(column_for("Weight (g)"), Some(Column::Weight));
        assert_eq!(column_for("US price (USD)"), Some(Column::UsPrice));
        assert_eq!(column_for("unknown"), None);
    }

    #[test]
    fn test_parse_number_cleans_currency_and_thousands() {
        assert_eq!(parse_number("¥12,800"), Ok(Some(12800.0)));
        assert_eq!(parse_number("$19.99"), Ok(Some(19.99)));
        assert_eq!(parse_number("  "), Ok(None));
        assert!(parse_number("abc").is_err());
    }

    #[test]
    fn test_parse_csv_comma_with_bom_and_blank_lines() {
        let text = "\u{feff}ASIN,Title,JP Price,us_price\n\
                    B0ABC12345,Widget,\"¥12,800\",$19.99\n\
                    \n\
                    b0xyz99999,Gadget,5000,25\n";
        let batch = parse_csv(text);
        assert_eq!(batch.format, ImportFormat::Csv);
        assert!(batch.errors.is_empty(), "{:?}", batch.errors);
        assert_eq!(batch.items.len(), 2);
        assert_eq!(batch.items[0].asin, "B0ABC12345");
        assert_eq!(batch.items[0].jp_price, 12800.0);
        assert_eq!(batch.items[0].us_price, 19.99);
        assert_eq!(batch.items[1].title, "Gadget");
    }

    #[test]
    fn test_parse_csv_semicolon_and_missing_asin() {
        let text = "asin;title;price;length;width;height\n\
                    ;No asin;1000;;;\n\
                    B0ABC12345;Boxed;9800;30;20;10\n";
        let batch = parse_csv(text);
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0].source_row, Some(2));
        assert_eq!(batch.items[0].listing_price, 9800.0);
        assert_eq!(batch.items[0].dimensions, Some(Dimensions::new(30.0, 20.0, 10.0)));
        assert_eq!(
            batch.errors,
            vec![RowError {
                row: 1,
                message: "ASIN is required".into()
            }]
        );
    }

    #[test]
    fn test_parse_csv_requires_asin_column() {
        let batch = parse_csv("title,price\nWidget,100\n");
        assert!(batch.items.is_empty());
        assert_eq!(batch.errors[0].message, "Missing required column: asin");
    }

    #[test]
    fn test_parse_json_array_and_wrapped_object() {
        let arr = r#"[{"asin":"B0ABC12345","jp_price":"12,800","dimensions":{"length":1,"width":2,"height":3}}, 5]"#;
        let batch = parse_json(arr);
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0].jp_price, 12800.0);
        assert_eq!(batch.items[0].dimensions, Some(Dimensions::new(1.0, 2.0, 3.0)));
        assert_eq!(batch.errors[0].row, 2);
        assert_eq!(batch.items[0].source_row, Some(1));

        let wrapped = r#"{"listings":[{"asin":"B0ABC12345","us_price":19.5}]}"#;
        let batch = parse_json(wrapped);
        assert_eq!(batch.items[0].us_price, 19.5);

        let bad = parse_json(r#"{"items":[]}"#);
        assert!(bad.items.is_empty());
        assert_eq!(bad.errors.len(), 1);
    }

    #[test]
    fn test_parse_import_dispatch() {
        assert_eq!(parse_import("data.JSON", "[]").format, ImportFormat::Json);
        assert_eq!(parse_import("data.csv", "asin\n").format, ImportFormat::Csv);
        assert_eq!(parse_import("clipboard", "  [{\"asin\":\"X\"}]").format, ImportFormat::Json);
        assert_eq!(parse_import("clipboard", "asin\nX\n").format, ImportFormat::Csv);
    }

    #[test]
    fn test_exported_row_imports_back() {
        let dto = ListingDto {
            asin: "B0ABC12345".into(),
            title: "Widget; large".into(),
            jp_price: 12800.0,
            us_price: 19.99,
            weight: Some(450.0),
            ..Default::default()
        };
        let listing = Listing::new_for_insert(&dto);
        assert_eq!(export_headers().len(), export_row(&listing).len());

        let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(vec![]);
        writer.write_record(export_headers()).unwrap();
        writer.write_record(export_row(&listing)).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let batch = parse_csv(&text);
        assert!(batch.errors.is_empty(), "{:?}", batch.errors);
        assert_eq!(batch.items[0].title, "Widget; large");
        assert_eq!(batch.items[0].jp_price, 12800.0);
        assert_eq!(batch.items[0].weight, Some(450.0));
    }
}
