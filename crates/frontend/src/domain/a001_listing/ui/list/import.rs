//! Импорт листингов из CSV/JSON.
//!
//! Файл читается и разбирается в браузере, на сервер уходят только
//! корректно разобранные строки.

use crate::shared::api_utils::post_json;
use crate::shared::components::ErrorBanner;
use crate::shared::icons::icon;
use contracts::domain::a001_listing::transfer::{parse_import, ImportBatch, ImportFormat};
use contracts::domain::a001_listing::{ImportRequest, ImportResult};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlInputElement;

fn format_label(format: ImportFormat) -> &'static str {
    match format {
        ImportFormat::Csv => "CSV",
        ImportFormat::Json => "JSON",
    }
}

#[component]
pub fn ImportPanel(on_imported: Callback<()>, on_close: Callback<()>) -> impl IntoView {
    let (batch, set_batch) = signal::<Option<ImportBatch>>(None);
    let (file_name, set_file_name) = signal(String::new());
    let (validate, set_validate) = signal(true);
    let (result, set_result) = signal::<Option<ImportResult>>(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (is_uploading, set_is_uploading) = signal(false);

    let on_file_change = move |ev: leptos::ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let name = file.name();
        set_result.set(None);
        set_error.set(None);

        spawn_local(async move {
            match JsFuture::from(file.text()).await {
                Ok(value) => {
                    let text = value.as_string().unwrap_or_default();
                    let parsed = parse_import(&name, &text);
                    log::info!(
                        "import file '{}': {} rows parsed, {} rejected",
                        name,
                        parsed.items.len(),
                        parsed.errors.len()
                    );
                    set_file_name.set(name);
                    set_batch.set(Some(parsed));
                }
                Err(e) => set_error.set(Some(format!("Не удалось прочитать файл: {:?}", e))),
            }
        });
    };

    let upload = move |_| {
        let Some(current) = batch.get_untracked() else {
            return;
        };
        if current.items.is_empty() {
            set_error.set(Some("В файле нет строк для импорта".to_string()));
            return;
        }
        let request = ImportRequest {
            items: current.items,
            validate: validate.get_untracked(),
        };
        set_is_uploading.set(true);
        spawn_local(async move {
            match post_json::<_, ImportResult>("/api/listings/import", &request).await {
                Ok(res) => {
                    set_result.set(Some(res));
                    set_batch.set(None);
                    on_imported.run(());
                }
                Err(e) => set_error.set(Some(format!("Ошибка импорта: {}", e))),
            }
            set_is_uploading.set(false);
        });
    };

    view! {
        <div class="card import-panel">
            <div class="card__header">
                <h3>{"Импорт листингов"}</h3>
                <button class="button button--ghost" on:click=move |_| on_close.run(())>
                    {icon("x")}
                </button>
            </div>

            <ErrorBanner message=error />

            <div class="form__group">
                <label class="form__label">{"Файл (.csv или .json)"}</label>
                <input type="file" accept=".csv,.json,text/csv,application/json" on:change=on_file_change />
            </div>
            <div class="form__group form__group--inline">
                <label class="form__label">
                    <input
                        type="checkbox"
                        prop:checked=move || validate.get()
                        on:change=move |ev| set_validate.set(event_target_checked(&ev))
                    />
                    {" Проверять по чёрному списку и на дубликаты"}
                </label>
            </div>

            {move || batch.get().map(|b| {
                let format = format_label(b.format);
                let ready = b.items.len();
                let error_count = b.errors.len();
                let errors = b.errors;
                view! {
                    <div class="import-panel__preview">
                        <p>{format!("{} ({}): готово к загрузке {} строк", file_name.get(), format, ready)}</p>
                        {(error_count > 0).then(|| view! {
                            <p class="text-warning">{format!("Строк с ошибками разбора: {}", error_count)}</p>
                        })}
                        <ul class="import-panel__errors">
                            {errors.into_iter().map(|e| view! {
                                <li>{format!("Строка {}: {}", e.row, e.message)}</li>
                            }).collect_view()}
                        </ul>
                        <button
                            class="button button--primary"
                            on:click=upload
                            disabled=move || is_uploading.get() || ready == 0
                        >
                            {icon("upload")}
                            {move || if is_uploading.get() { "Загрузка..." } else { "Загрузить" }}
                        </button>
                    </div>
                }
            })}

            {move || result.get().map(|r| view! {
                <div class="import-panel__result">
                    <p>{format!("Всего: {}, создано: {}, отклонено: {}", r.total, r.created, r.rejected.len())}</p>
                    <ul class="import-panel__errors">
                        {r.rejected.into_iter().map(|row| view! {
                            <li>{format!("Строка {} ({}): {}", row.row, row.asin, row.errors.join("; "))}</li>
                        }).collect_view()}
                    </ul>
                </div>
            })}
        </div>
    }
}
