use super::list::severity_color;
use crate::shared::api_utils::post_json;
use crate::shared::components::ErrorBanner;
use crate::shared::icons::icon;
use contracts::domain::a002_blacklist::{
    BlacklistCheckRequest, BlacklistCheckResponse, BlacklistCheckResult,
};
use leptos::prelude::*;
use thaw::*;
use wasm_bindgen_futures::spawn_local;

#[derive(Clone, Debug, Default)]
struct CheckForm {
    asin: String,
    title: String,
    manufacturer: String,
    category: String,
    brand: String,
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CheckForm {
    fn is_empty(&self) -> bool {
        [&self.asin, &self.title, &self.manufacturer, &self.category, &self.brand]
            .iter()
            .all(|v| v.trim().is_empty())
    }

    fn to_request(&self) -> BlacklistCheckRequest {
        BlacklistCheckRequest {
            asin: optional(&self.asin),
            title: optional(&self.title),
            manufacturer: optional(&self.manufacturer),
            category: optional(&self.category),
            brand: optional(&self.brand),
        }
    }
}

/// Проверка товара по текущим правилам черного списка
#[component]
pub fn BlacklistCheckPanel() -> impl IntoView {
    let form = RwSignal::new(CheckForm::default());
    let (result, set_result) = signal::<Option<BlacklistCheckResult>>(None);
    let (error, set_error) = signal::<Option<String>>(None);

    let run_check = move |_| {
        let request = form.with_untracked(|f| f.to_request());
        spawn_local(async move {
            match post_json::<_, BlacklistCheckResponse>("/api/blacklist/check", &request).await {
                Ok(resp) => {
                    set_error.set(None);
                    set_result.set(Some(resp.result));
                }
                Err(e) => set_error.set(Some(format!("Ошибка проверки: {}", e))),
            }
        });
    };

    let field = move |label: &'static str,
                      get: fn(&CheckForm) -> String,
                      set: fn(&mut CheckForm, String)| {
        view! {
            <div class="form__group">
                <label class="form__label">{label}</label>
                <input
                    class="form__input"
                    type="text"
                    prop:value=move || form.with(get)
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        form.update(|f| set(f, value));
                        set_result.set(None);
                    }
                />
            </div>
        }
    };

    view! {
        <section class="card">
            <h3 class="card__title">{"Проверить товар"}</h3>
            <ErrorBanner message=error />
            {field("ASIN", |f| f.asin.clone(), |f, v| f.asin = v)}
            {field("Название", |f| f.title.clone(), |f, v| f.title = v)}
            {field("Производитель", |f| f.manufacturer.clone(), |f, v| f.manufacturer = v)}
            {field("Категория", |f| f.category.clone(), |f, v| f.category = v)}
            {field("Бренд", |f| f.brand.clone(), |f, v| f.brand = v)}
            <Button
                appearance=ButtonAppearance::Secondary
                on_click=run_check
                disabled=Signal::derive(move || form.with(|f| f.is_empty()))
            >
                {icon("search")}
                " Проверить"
            </Button>

            {move || result.get().map(|r| {
                if r.is_blocked {
                    view! {
                        <div class="alert alert--error check-result">
                            <Space gap=SpaceGap::Small>
                                <strong>{"Заблокировано"}</strong>
                                <Badge appearance=BadgeAppearance::Filled color=severity_color(r.severity)>
                                    {r.severity.display_name()}
                                </Badge>
                            </Space>
                            <ul>
                                {r.reasons.into_iter().map(|reason| view! { <li>{reason}</li> }).collect_view()}
                            </ul>
                        </div>
                    }.into_any()
                } else {
                    view! {
                        <div class="alert alert--success check-result">
                            {"Совпадений с черным списком нет"}
                        </div>
                    }.into_any()
                }
            })}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_are_not_sent() {
        let form = CheckForm {
            asin: " b000000001 ".to_string(),
            brand: "  ".to_string(),
            ..CheckForm::default()
        };
        assert!(!form.is_empty());
        let req = form.to_request();
        assert_eq!(req.asin.as_deref(), Some("b000000001"));
        assert_eq!(req.brand, None);
        assert!(CheckForm::default().is_empty());
    }
}
