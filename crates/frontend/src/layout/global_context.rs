use leptos::logging::log;
use leptos::prelude::Effect;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

/// Состояние оболочки: открытые табы, активный таб, видимость панелей
/// и черновики форм, которые одна страница передаёт другой.
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub opened: RwSignal<Vec<Tab>>,
    pub active: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
    pub right_open: RwSignal<bool>,
    pub form_states: RwSignal<HashMap<String, serde_json::Value>>,
}

impl Default for AppGlobalContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppGlobalContext {
    pub fn new() -> Self {
        Self {
            opened: RwSignal::new(vec![]),
            active: RwSignal::new(None),
            left_open: RwSignal::new(true),
            right_open: RwSignal::new(false),
            form_states: RwSignal::new(HashMap::new()),
        }
    }

    pub fn set_form_state(&self, form_key: String, state: serde_json::Value) {
        self.form_states.update(|states| {
            states.insert(form_key, state);
        });
    }

    /// Забирает черновик формы; повторный вызов вернёт None
    pub fn take_form_state(&self, form_key: &str) -> Option<serde_json::Value> {
        let exists = self
            .form_states
            .with_untracked(|states| states.contains_key(form_key));
        if !exists {
            return None;
        }
        let mut taken = None;
        self.form_states.update(|states| taken = states.remove(form_key));
        taken
    }

    /// Синхронизирует активный таб с `?active=` в адресной строке
    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        if let Some(active_key) = active_from_query(&search) {
            let title = crate::layout::tabs::tab_label_for_key(&active_key);
            let title = if title.is_empty() { active_key.as_str() } else { title };
            self.open_tab(&active_key, title);
        }

        let this = *self;
        Effect::new(move |_| {
            let Some(active_key) = this.active.get() else {
                return;
            };
            let new_url = query_for_active(&active_key);
            let current_search = window()
                .and_then(|w| w.location().search().ok())
                .unwrap_or_default();
            if current_search == new_url {
                return;
            }
            if let Some(history) = window().and_then(|w| w.history().ok()) {
                let _ = history.replace_state_with_url(
                    &wasm_bindgen::JsValue::NULL,
                    "",
                    Some(&new_url),
                );
            }
        });
    }

    pub fn open_tab(&self, key: &str, title: &str) {
        let exists = self
            .opened
            .with_untracked(|tabs| tabs.iter().any(|tab| tab.key == key));
        if !exists {
            log!("open_tab: key='{}', title='{}'", key, title);
            self.opened.update(|tabs| {
                tabs.push(Tab {
                    key: key.to_string(),
                    title: title.to_string(),
                    dirty: false,
                })
            });
        }
        self.activate_tab(key);
    }

    pub fn activate_tab(&self, key: &str) {
        self.active.set(Some(key.to_string()));
    }

    pub fn update_tab_title(&self, key: &str, new_title: &str) {
        self.opened.update(|tabs| {
            if let Some(tab) = tabs.iter_mut().find(|t| t.key == key) {
                tab.title = new_title.to_string();
            }
        });
    }

    pub fn set_tab_dirty(&self, key: &str, dirty: bool) {
        let changed = self.opened.with_untracked(|tabs| {
            tabs.iter().any(|t| t.key == key && t.dirty != dirty)
        });
        if changed {
            self.opened.update(|tabs| {
                if let Some(tab) = tabs.iter_mut().find(|t| t.key == key) {
                    tab.dirty = dirty;
                }
            });
        }
    }

    /// Закрывает таб; если он был активным, активным становится последний открытый
    pub fn close_tab(&self, key: &str) {
        log!("close_tab: key='{}'", key);
        self.opened.update(|tabs| tabs.retain(|tab| tab.key != key));
        if self
            .active
            .with_untracked(|active| active.as_deref() == Some(key))
        {
            let next_active = self
                .opened
                .with_untracked(|tabs| tabs.last().map(|t| t.key.clone()));
            self.active.set(next_active);
        }
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
    }

    pub fn toggle_right(&self) {
        self.right_open.update(|val| *val = !*val);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub title: String,
    /// Форма в табе изменена и не сохранена
    pub dirty: bool,
}

/// Ключ активного таба из строки запроса (`?active=a001_listing`)
pub fn active_from_query(search: &str) -> Option<String> {
    let params: HashMap<String, String> =
        serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
    params.get("active").filter(|k| !k.is_empty()).cloned()
}

pub fn query_for_active(active_key: &str) -> String {
    let params = HashMap::from([("active".to_string(), active_key.to_string())]);
    format!("?{}", serde_qs::to_string(&params).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_from_query() {
        assert_eq!(
            active_from_query("?active=a002_blacklist"),
            Some("a002_blacklist".to_string())
        );
        assert_eq!(active_from_query(""), None);
        assert_eq!(active_from_query("?active="), None);
        assert_eq!(active_from_query("?other=1"), None);
    }

    #[test]
    fn test_query_round_trip_for_detail_key() {
        let key = "a001_listing_detail_7f1c2a9e-0000-4000-8000-000000000001";
        let query = query_for_active(key);
        assert_eq!(active_from_query(&query), Some(key.to_string()));
    }
}
