//! Поиск дубликатов листингов: по ASIN, по ссылке на источник и по похожему названию.

use contracts::domain::a001_listing::aggregate::{normalize_asin, DuplicatePair, Listing};
use contracts::domain::common::AggregateId;
use serde::Serialize;

/// Порог похожести названий
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateCheck {
    pub is_duplicate: bool,
    pub reason: Option<String>,
    pub match_type: Option<String>,
    pub matched_listing_id: Option<String>,
    pub similarity: Option<f64>,
}

impl DuplicateCheck {
    fn unique() -> Self {
        Self {
            is_duplicate: false,
            reason: None,
            match_type: None,
            matched_listing_id: None,
            similarity: None,
        }
    }

    fn found(listing: &Listing, match_type: &str, reason: String) -> Self {
        Self {
            is_duplicate: true,
            reason: Some(reason),
            match_type: Some(match_type.to_string()),
            matched_listing_id: Some(listing.id.as_string()),
            similarity: None,
        }
    }
}

/// Проверить товар против существующих листингов. Первое совпадение побеждает.
pub fn check_duplicate(
    asin: &str,
    source_url: Option<&str>,
    title: Option<&str>,
    existing: &[Listing],
) -> DuplicateCheck {
    let asin = normalize_asin(asin);

    if !asin.is_empty() {
        for listing in existing {
            if normalize_asin(&listing.asin) == asin {
                return DuplicateCheck::found(
                    listing,
                    "asin",
                    format!("ASIN already exists: {}", asin),
                );
            }
            if let Some(us_asin) = listing.us_asin.as_deref() {
                if normalize_asin(us_asin) == asin {
                    return DuplicateCheck::found(
                        listing,
                        "us_asin",
                        format!("US ASIN already exists: {}", asin),
                    );
                }
            }
        }
    }

    if let Some(url) = source_url.map(str::trim).filter(|u| !u.is_empty()) {
        for listing in existing {
            if listing.source_url.as_deref().map(str::trim) == Some(url) {
                return DuplicateCheck::found(
                    listing,
                    "source_url",
                    format!("Source URL already exists: {}", url),
                );
            }
        }
    }

    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        for listing in existing {
            let similarity = title_similarity(title, &listing.title);
            if similarity >= SIMILARITY_THRESHOLD {
                let mut check = DuplicateCheck::found(
                    listing,
                    "keyword_similarity",
                    format!(
                        "Similar product title (similarity: {:.2}%)",
                        similarity * 100.0
                    ),
                );
                check.similarity = Some(similarity);
                return check;
            }
        }
    }

    DuplicateCheck::unique()
}

/// Все пары дубликатов в списке (каждая пара один раз)
pub fn find_duplicates(listings: &[Listing]) -> Vec<DuplicatePair> {
    let mut pairs = Vec::new();
    for (i, first) in listings.iter().enumerate() {
        for second in &listings[i + 1..] {
            let check = check_duplicate(
                &first.asin,
                first.source_url.as_deref(),
                Some(&first.title),
                std::slice::from_ref(second),
            );
            if check.is_duplicate {
                pairs.push(DuplicatePair {
                    listing1_id: first.id.as_string(),
                    listing2_id: second.id.as_string(),
                    reason: check.reason.unwrap_or_default(),
                    match_type: check.match_type.unwrap_or_else(|| "unknown".into()),
                });
            }
        }
    }
    pairs
}

/// Похожесть названий 0..=1 без учёта регистра и пробелов по краям
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.trim().to_lowercase().chars().collect();
    let b: Vec<char> = b.trim().to_lowercase().chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let matches = matching_chars(&a, &b);
    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

/// Ratcliff/Obershelp: длина общей подстроки плюс рекурсивно левые и правые остатки
fn matching_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (i, j, k) = longest_common_substring(a, b);
    if k == 0 {
        return 0;
    }
    k + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + k..], &b[j + k..])
}

/// (начало в a, начало в b, длина); при равной длине берётся самое раннее вхождение
fn longest_common_substring(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut prev = vec![0usize; b.len() + 1];
    let mut best = (0, 0, 0);
    for (i, ca) in a.iter().enumerate() {
        let mut cur = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                cur[j + 1] = prev[j] + 1;
                if cur[j + 1] > best.2 {
                    best = (i + 1 - cur[j + 1], j + 1 - cur[j + 1], cur[j + 1]);
                }
            }
        }
        prev = cur;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_listing::aggregate::ListingDto;

    fn listing(asin: &str, title: &str, url: Option<&str>) -> Listing {
        Listing::new_for_insert(&ListingDto {
            asin: asin.into(),
            title: title.into(),
            source_url: url.map(String::from),
            ..Default::default()
        })
    }

    #[test]
    fn test_similarity_matches_difflib_ratio() {
        // difflib.SequenceMatcher(None, "abcd", "bcde").ratio() == 0.75
        assert!((title_similarity("abcd", "bcde") - 0.75).abs() < 1e-9);
        assert_eq!(title_similarity("Same Title", "  same title "), 1.0);
        assert_eq!(title_similarity("", "x"), 0.0);
        assert_eq!(title_similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_asin_match_wins_first() {
        let existing = vec![listing("B0ABC12345", "Other product", Some("https://x"))];
        let check = check_duplicate(" b0abc12345 ", Some("https://x"), Some("Other product"), &existing);
        assert!(check.is_duplicate);
        assert_eq!(check.match_type.as_deref(), Some("asin"));
        assert_eq!(check.reason.as_deref(), Some("ASIN already exists: B0ABC12345"));
        assert_eq!(check.matched_listing_id, Some(existing[0].id.as_string()));
    }

    #[test]
    fn test_us_asin_and_source_url() {
        let mut l = listing("B0JP000001", "Foo", Some("https://shop/item/1"));
        l.us_asin = Some("B0US000001".into());
        let existing = vec![l];

        let check = check_duplicate("B0US000001", None, None, &existing);
        assert_eq!(check.match_type.as_deref(), Some("us_asin"));

        let check = check_duplicate("B0NEW00001", Some("https://shop/item/1"), None, &existing);
        assert_eq!(check.match_type.as_deref(), Some("source_url"));
        assert_eq!(
            check.reason.as_deref(),
            Some("Source URL already exists: https://shop/item/1")
        );
    }

    #[test]
    fn test_similar_title() {
        let existing = vec![listing("B0JP000001", "Sony WH-1000XM5 Wireless Headphones", None)];
        let check = check_duplicate(
            "B0NEW00001",
            None,
            Some("Sony WH-1000XM5 Wireless Headphone"),
            &existing,
        );
        assert!(check.is_duplicate);
        assert_eq!(check.match_type.as_deref(), Some("keyword_similarity"));
        assert!(check.reason.unwrap().starts_with("Similar product title (similarity: 98."));

        let check = check_duplicate("B0NEW00001", None, Some("Kitchen knife set"), &existing);
        assert!(!check.is_duplicate);
    }

    #[test]
    fn test_find_duplicates_pairs() {
        let a = listing("B0AAAAAAAA", "Alpha", None);
        let b = listing("B0BBBBBBBB", "Beta", None);
        let c = listing("b0aaaaaaaa", "Gamma", None);
        let pairs = find_duplicates(&[a.clone(), b, c.clone()]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].listing1_id, a.id.as_string());
        assert_eq!(pairs[0].listing2_id, c.id.as_string());
        assert_eq!(pairs[0].match_type, "asin");
    }
}
