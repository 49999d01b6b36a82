//! Контурные SVG-иконки (набор lucide)

use leptos::prelude::*;

const FALLBACK: &str = r#"<circle cx="12" cy="12" r="10"/><path d="M12 8v4l3 3"/>"#;

/// Размер и содержимое `<svg>` для имени иконки
fn glyph(name: &str) -> Option<(u32, &'static str)> {
    let glyph = match name {
        // меню
        "package" => (
            20,
            r#"<path d="M21 16V8a2 2 0 0 0-1-1.73l-7-4a2 2 0 0 0-2 0l-7 4A2 2 0 0 0 3 8v8a2 2 0 0 0 1 1.73l7 4a2 2 0 0 0 2 0l7-4A2 2 0 0 0 21 16z"/><path d="M3.27 6.96 12 12l8.73-5.04"/><path d="M12 22V12"/>"#,
        ),
        "ban" => (20, r#"<circle cx="12" cy="12" r="10"/><path d="M4.93 4.93l14.14 14.14"/>"#),
        "search" => (20, r#"<circle cx="11" cy="11" r="8"/><path d="M21 21l-4.35-4.35"/>"#),
        "calculator" => (
            20,
            r#"<rect x="4" y="2" width="16" height="20" rx="2"/><path d="M8 6h8"/><path d="M8 12h.01M12 12h.01M16 12h.01M8 16h.01M12 16h.01M16 16h.01"/>"#,
        ),
        "activity" => (20, r#"<polyline points="22 12 18 12 15 21 9 3 6 12 2 12"/>"#),
        "layers" => (
            20,
            r#"<polygon points="12 2 2 7 12 12 22 7 12 2"/><polyline points="2 17 12 22 22 17"/><polyline points="2 12 12 17 22 12"/>"#,
        ),
        // действия
        "plus" => (16, r#"<path d="M12 5v14M5 12h14"/>"#),
        "refresh" => (
            16,
            r#"<polyline points="23 4 23 10 17 10"/><polyline points="1 20 1 14 7 14"/><path d="M3.51 9a9 9 0 0 1 14.85-3.36L23 10M1 14l4.64 4.36A9 9 0 0 0 20.49 15"/>"#,
        ),
        "delete" => (
            16,
            r#"<polyline points="3 6 5 6 21 6"/><path d="M19 6l-1 14a2 2 0 0 1-2 2H8a2 2 0 0 1-2-2L5 6"/><path d="M10 11v6M14 11v6"/><path d="M9 6V4a1 1 0 0 1 1-1h4a1 1 0 0 1 1 1v2"/>"#,
        ),
        "save" => (
            16,
            r#"<path d="M19 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h11l5 5v11a2 2 0 0 1-2 2z"/><polyline points="17 21 17 13 7 13 7 21"/><polyline points="7 3 7 8 15 8"/>"#,
        ),
        "x" => (16, r#"<path d="M18 6L6 18M6 6l12 12"/>"#),
        "download" => (
            16,
            r#"<path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/><polyline points="7 10 12 15 17 10"/><path d="M12 15V3"/>"#,
        ),
        "upload" => (
            16,
            r#"<path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/><polyline points="17 8 12 3 7 8"/><path d="M12 3v12"/>"#,
        ),
        "check" => (16, r#"<polyline points="20 6 9 17 4 12"/>"#),
        "chevron-right" => (16, r#"<polyline points="9 18 15 12 9 6"/>"#),
        // раскладка
        "panel-left" => (18, r#"<rect x="3" y="3" width="18" height="18" rx="2"/><path d="M9 3v18"/>"#),
        "panel-right" => (18, r#"<rect x="3" y="3" width="18" height="18" rx="2"/><path d="M15 3v18"/>"#),
        _ => return None,
    };
    Some(glyph)
}

/// Иконка по имени; для неизвестного имени рисуется нейтральный кружок
pub fn icon(name: &str) -> AnyView {
    if glyph(name).is_none() {
        log::debug!("unknown icon '{}'", name);
    }
    let (size, body) = glyph(name).unwrap_or((20, FALLBACK));
    let size = size.to_string();
    view! {
        <svg
            width=size.clone()
            height=size
            viewBox="0 0 24 24"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            aria-hidden="true"
            inner_html=body
        ></svg>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_and_action_icons_are_known() {
        for name in [
            "package", "ban", "search", "calculator", "activity", "layers", "plus", "refresh",
            "delete", "save", "x", "download", "upload", "check", "chevron-right", "panel-left",
            "panel-right",
        ] {
            assert!(glyph(name).is_some(), "{name}");
        }
        assert_eq!(glyph("settings"), None);
        assert_eq!(glyph("x").map(|(size, _)| size), Some(16));
    }
}
