use contracts::domain::a002_blacklist::aggregate::{
    BlacklistCheckRequest, BlacklistCheckResult, BlacklistEntry, BlacklistMatch,
};
use contracts::enums::blacklist_type::BlacklistType;
use contracts::enums::severity::Severity;

fn normalized(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("").trim().to_lowercase()
}

fn overlaps(entry_value: &str, input: &str) -> bool {
    !entry_value.is_empty() && (input.contains(entry_value) || entry_value.contains(input))
}

fn label(entry: &BlacklistEntry) -> &str {
    if entry.reason.trim().is_empty() {
        &entry.value
    } else {
        &entry.reason
    }
}

fn of_type(
    entries: &[BlacklistEntry],
    entry_type: BlacklistType,
) -> impl Iterator<Item = &BlacklistEntry> {
    entries.iter().filter(move |e| e.entry_type == entry_type)
}

/// Проверка товара по набору правил черного списка
pub fn check_product(req: &BlacklistCheckRequest, entries: &[BlacklistEntry]) -> BlacklistCheckResult {
    let asin = normalized(&req.asin);
    let title = normalized(&req.title);
    let manufacturer = normalized(&req.manufacturer);
    let category = normalized(&req.category);
    let brand = normalized(&req.brand);

    let mut hits: Vec<(String, &BlacklistEntry)> = Vec::new();

    if !asin.is_empty() {
        if let Some(e) = of_type(entries, BlacklistType::Asin).find(|e| e.value == asin) {
            hits.push((format!("ASIN blacklisted: {}", label(e)), e));
        }
    }

    if !manufacturer.is_empty() {
        if let Some(e) =
            of_type(entries, BlacklistType::Manufacturer).find(|e| overlaps(&e.value, &manufacturer))
        {
            hits.push((format!("Manufacturer blacklisted: {}", label(e)), e));
        }
    }

    if !title.is_empty() {
        for e in of_type(entries, BlacklistType::Keyword) {
            if !e.value.is_empty() && title.contains(&e.value) {
                hits.push((format!("Prohibited keyword found: {}", label(e)), e));
            }
        }
    }

    if !category.is_empty() {
        if let Some(e) =
            of_type(entries, BlacklistType::Category).find(|e| overlaps(&e.value, &category))
        {
            hits.push((format!("Restricted category: {}", label(e)), e));
        }
    }

    // Без бренда правила brand применяются к производителю
    let brand_match = if !brand.is_empty() {
        entries
            .iter()
            .filter(|e| {
                matches!(
                    e.entry_type,
                    BlacklistType::Manufacturer | BlacklistType::Brand
                )
            })
            .find(|e| overlaps(&e.value, &brand))
    } else if !manufacturer.is_empty() {
        of_type(entries, BlacklistType::Brand).find(|e| overlaps(&e.value, &manufacturer))
    } else {
        None
    };
    if let Some(e) = brand_match {
        hits.push((format!("Brand blacklisted: {}", label(e)), e));
    }

    if hits.is_empty() {
        return BlacklistCheckResult::allowed();
    }

    let severity = hits
        .iter()
        .map(|(_, e)| e.severity)
        .max()
        .unwrap_or(Severity::Low);

    BlacklistCheckResult {
        is_blocked: true,
        severity,
        reasons: hits.iter().map(|(reason, _)| reason.clone()).collect(),
        matches: hits
            .iter()
            .map(|(_, e)| BlacklistMatch {
                entry_type: e.entry_type,
                value: e.value.clone(),
                severity: e.severity,
                reason: e.reason.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(t: BlacklistType, value: &str, reason: &str, severity: Severity) -> BlacklistEntry {
        BlacklistEntry::new_for_insert(t, value, reason, severity, false)
    }

    fn rules() -> Vec<BlacklistEntry> {
        vec![
            entry(BlacklistType::Asin, "B0BLOCKED1", "", Severity::Low),
            entry(BlacklistType::Manufacturer, "sony", "High-risk manufacturer", Severity::High),
            entry(BlacklistType::Keyword, "battery", "Dangerous goods keyword", Severity::High),
            entry(BlacklistType::Keyword, "lithium", "Dangerous goods keyword", Severity::High),
            entry(BlacklistType::Category, "toys", "Restricted category", Severity::Medium),
            entry(BlacklistType::Brand, "acme", "", Severity::Medium),
        ]
    }

    fn req() -> BlacklistCheckRequest {
        BlacklistCheckRequest::default()
    }

    #[test]
    fn test_empty_request_is_allowed() {
        let result = check_product(&req(), &rules());
        assert_eq!(result, BlacklistCheckResult::allowed());
        assert_eq!(result.severity, Severity::Low);
    }

    #[test]
    fn test_asin_match_uses_value_when_reason_empty() {
        let r = BlacklistCheckRequest {
            asin: Some(" b0blocked1 ".into()),
            ..req()
        };
        let result = check_product(&r, &rules());
        assert!(result.is_blocked);
        assert_eq!(result.reasons, vec!["ASIN blacklisted: b0blocked1"]);
        assert_eq!(result.severity, Severity::Low);
    }

    #[test]
    fn test_keywords_all_reported_and_severity_is_max() {
        let r = BlacklistCheckRequest {
            title: Some("Lithium Battery Pack".into()),
            category: Some("Toys & Games".into()),
            ..req()
        };
        let result = check_product(&r, &rules());
        assert_eq!(
            result.reasons,
            vec![
                "Prohibited keyword found: Dangerous goods keyword",
                "Prohibited keyword found: Dangerous goods keyword",
                "Restricted category: Restricted category",
            ]
        );
        assert_eq!(result.matches.len(), 3);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn test_manufacturer_substring_both_ways() {
        let r = BlacklistCheckRequest {
            manufacturer: Some("Sony Corporation".into()),
            ..req()
        };
        assert_eq!(
            check_product(&r, &rules()).reasons,
            vec!["Manufacturer blacklisted: High-risk manufacturer"]
        );

        let r = BlacklistCheckRequest {
            manufacturer: Some("so".into()),
            ..req()
        };
        assert!(check_product(&r, &rules()).is_blocked);
    }

    #[test]
    fn test_brand_rules() {
        let r = BlacklistCheckRequest {
            brand: Some("ACME Tools".into()),
            ..req()
        };
        assert_eq!(
            check_product(&r, &rules()).reasons,
            vec!["Brand blacklisted: acme"]
        );

        // Бренд проверяется и по производителям
        let r = BlacklistCheckRequest {
            brand: Some("Sony".into()),
            ..req()
        };
        assert_eq!(
            check_product(&r, &rules()).reasons,
            vec!["Brand blacklisted: High-risk manufacturer"]
        );

        // Без бренда правила brand применяются к производителю
        let r = BlacklistCheckRequest {
            manufacturer: Some("Acme".into()),
            ..req()
        };
        let result = check_product(&r, &rules());
        assert_eq!(result.reasons, vec!["Brand blacklisted: acme"]);
        assert_eq!(result.severity, Severity::Medium);
    }
}
