/// Утилиты для списков: сортировка, индикаторы заголовков, поле фильтра
use leptos::prelude::*;
use std::cmp::Ordering;
use wasm_bindgen::JsCast;

/// Trait для строк таблицы, поддерживающих сортировку
pub trait Sortable {
    /// Сравнивает два объекта по указанному полю
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Сортирует список по указанному полю
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Сравнение строк без учёта регистра
pub fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Сравнение чисел; NaN считается равным
pub fn cmp_number(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

pub fn get_sort_class(current_field: &str, field: &str) -> &'static str {
    if current_field == field {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

/// Подтверждение через диалог браузера; без window считается отказом
pub fn confirm_action(message: &str) -> bool {
    web_sys::window()
        .map(|win| win.confirm_with_message(message).unwrap_or(false))
        .unwrap_or(false)
}

/// Поле ввода фильтра с debounce 300 мс и кнопкой очистки
#[component]
pub fn SearchInput(
    /// Текущее значение фильтра
    #[prop(into)]
    value: Signal<String>,
    /// Вызывается после паузы ввода
    #[prop(into)]
    on_change: Callback<String>,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Поиск...".to_string()
    } else {
        placeholder
    };

    let (input_value, set_input_value) = signal(value.get_untracked());
    let debounce_timeout = StoredValue::new(None::<i32>);

    let handle_input_change = move |new_value: String| {
        set_input_value.set(new_value.clone());

        let Some(window) = web_sys::window() else {
            on_change.run(new_value);
            return;
        };
        if let Some(timeout_id) = debounce_timeout.get_value() {
            window.clear_timeout_with_handle(timeout_id);
        }

        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move || {
            on_change.run(new_value.clone());
        }) as Box<dyn Fn()>);

        let timeout_id = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref::<js_sys::Function>(),
                300,
            )
            .ok();

        closure.forget();
        debounce_timeout.set_value(timeout_id);
    };

    let clear_filter = move |_| {
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                class="form__input"
                class:search-input--active=move || !value.get().trim().is_empty()
                placeholder=placeholder
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input_change(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" on:click=clear_filter title="Очистить">
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        price: f64,
    }

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "name" => cmp_text(self.name, other.name),
                "price" => cmp_number(self.price, other.price),
                _ => Ordering::Equal,
            }
        }
    }

    #[test]
    fn test_sort_list_both_directions() {
        let mut rows = vec![
            Row { name: "beta", price: 2.0 },
            Row { name: "Alpha", price: 3.0 },
            Row { name: "gamma", price: 1.0 },
        ];

        sort_list(&mut rows, "name", true);
        assert_eq!(rows[0].name, "Alpha");

        sort_list(&mut rows, "price", false);
        let prices: Vec<f64> = rows.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_unknown_field_keeps_order() {
        let mut rows = vec![Row { name: "b", price: 1.0 }, Row { name: "a", price: 2.0 }];
        sort_list(&mut rows, "missing", true);
        assert_eq!(rows[0].name, "b");
    }

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator("asin", "asin", true), " ▲");
        assert_eq!(get_sort_indicator("asin", "asin", false), " ▼");
        assert_eq!(get_sort_indicator("asin", "title", true), " ⇅");
    }
}
