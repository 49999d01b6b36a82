//! Категории страниц внутри табов.
//!
//! Корневой элемент страницы получает `id` вида `{entity}--{category}`
//! (например `a001_listing--list`) и атрибут `data-page-category`.

/// Таблица записей с фильтрами
pub const PAGE_CAT_LIST: &str = "list";

/// Форма одной записи
pub const PAGE_CAT_DETAIL: &str = "detail";

/// Страница действия (поиск, расчёт, запуск проверки)
pub const PAGE_CAT_USECASE: &str = "usecase";

pub const ALL_CATEGORIES: &[&str] = &[PAGE_CAT_LIST, PAGE_CAT_DETAIL, PAGE_CAT_USECASE];

/// `id` страницы имеет вид `{entity}--{category}` с известной категорией
pub fn is_valid_page_id(id: &str) -> bool {
    match id.split_once("--") {
        Some((entity, category)) => !entity.is_empty() && ALL_CATEGORIES.contains(&category),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_ids() {
        assert!(is_valid_page_id("a001_listing--list"));
        assert!(is_valid_page_id("u502_profit_calculation--usecase"));
        assert!(!is_valid_page_id("a001_listing"));
        assert!(!is_valid_page_id("--list"));
        assert!(!is_valid_page_id("a001_listing--dashboard"));
    }
}
