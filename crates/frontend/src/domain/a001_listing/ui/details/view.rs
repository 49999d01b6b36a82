use super::model::ListingForm;
use super::view_model::ListingDetailsVm;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::LISTING_NEW;
use crate::layout::tabs::{detail_tab_label, listing_detail_key};
use crate::shared::components::{ErrorBanner, LoadingIndicator, SuccessBanner};
use crate::shared::format::{format_percent, format_yen, parse_number};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::usecases::u502_profit_calculation::ProfitBreakdown;
use contracts::domain::a001_listing::Listing;
use contracts::domain::common::AggregateId;
use contracts::enums::listing_status::ListingStatus;
use leptos::prelude::*;
use std::rc::Rc;
use thaw::*;

type TextGetter = fn(&ListingForm) -> String;
type TextSetter = fn(&mut ListingForm, String);
type NumberGetter = fn(&ListingForm) -> f64;
type NumberSetter = fn(&mut ListingForm, f64);
type OptionalGetter = fn(&ListingForm) -> Option<f64>;
type OptionalSetter = fn(&mut ListingForm, Option<f64>);

fn text_field(
    vm: ListingDetailsVm,
    label: &'static str,
    locked: bool,
    get: TextGetter,
    set: TextSetter,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input
                class="form__input"
                type="text"
                readonly=locked
                prop:value=move || vm.form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    vm.update_form(|f| set(f, value));
                }
            />
        </div>
    }
}

fn number_field(
    vm: ListingDetailsVm,
    label: &'static str,
    get: NumberGetter,
    set: NumberSetter,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input
                class="form__input form__input--number"
                type="text"
                inputmode="decimal"
                prop:value=move || vm.form.with(get).to_string()
                on:change=move |ev| {
                    let value = parse_number(&event_target_value(&ev)).unwrap_or(0.0);
                    vm.update_form(|f| set(f, value));
                }
            />
        </div>
    }
}

fn optional_number_field(
    vm: ListingDetailsVm,
    label: &'static str,
    get: OptionalGetter,
    set: OptionalSetter,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input
                class="form__input form__input--number"
                type="text"
                inputmode="decimal"
                prop:value=move || vm.form.with(get).map(|v| v.to_string()).unwrap_or_default()
                on:change=move |ev| {
                    let value = parse_number(&event_target_value(&ev));
                    vm.update_form(|f| set(f, value));
                }
            />
        </div>
    }
}

#[component]
pub fn ListingDetails(id: Option<String>, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let vm = ListingDetailsVm::new();
    let is_new = id.is_none();
    let tab_key = id
        .as_deref()
        .map(listing_detail_key)
        .unwrap_or_else(|| LISTING_NEW.to_string());

    if is_new {
        // Черновик может прийти и после открытия таба
        Effect::new(move |_| {
            let has_draft = tabs_store
                .form_states
                .with(|states| states.contains_key(LISTING_NEW));
            if has_draft {
                vm.load_if_needed(None, tabs_store.take_form_state(LISTING_NEW));
            }
        });
    } else {
        vm.load_if_needed(id.clone(), None);
    }

    Effect::new(move |_| {
        let dirty = vm.is_dirty()();
        tabs_store.set_tab_dirty(&tab_key, dirty);
        if !is_new {
            let asin = vm.baseline.with(|f| f.asin.clone());
            if !asin.is_empty() {
                tabs_store.update_tab_title(&tab_key, &detail_tab_label("Листинг", &asin));
            }
        }
    });

    let handle_save = move |_| {
        let on_saved: Rc<dyn Fn(Listing)> = Rc::new(move |listing: Listing| {
            if is_new {
                tabs_store.set_tab_dirty(LISTING_NEW, false);
                on_close.run(());
                tabs_store.open_tab(
                    &listing_detail_key(&listing.id.as_string()),
                    &detail_tab_label("Листинг", &listing.asin),
                );
            }
        });
        vm.save_command(on_saved);
    };

    let title = if is_new {
        "Новый листинг"
    } else {
        "Листинг"
    };

    view! {
        <PageFrame page_id="a001_listing--detail" category=PAGE_CAT_DETAIL>
            <div class="page__header">
                <div class="page__header-left">
                    <h2>
                        {title}
                        {move || {
                            let asin = vm.baseline.with(|f| f.asin.clone());
                            (!is_new && !asin.is_empty()).then(|| format!(" {}", asin))
                        }}
                    </h2>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| vm.preview_profit_command()
                    >
                        {icon("calculator")}
                        " Рассчитать прибыль"
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=handle_save
                        disabled=Signal::derive(move || !vm.is_form_valid()() || vm.is_saving.get())
                    >
                        {icon("save")}
                        {move || if vm.is_saving.get() { " Сохранение..." } else { " Сохранить" }}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| on_close.run(())
                    >
                        {icon("x")}
                        " Закрыть"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <ErrorBanner message=vm.error />
                <SuccessBanner message=vm.notice />

                <Show when=move || vm.is_loading.get()>
                    <LoadingIndicator />
                </Show>

                <div class="details-grid">
                    <section class="card">
                        <h3 class="card__title">{"Товар"}</h3>
                        {text_field(vm, "ASIN", !is_new, |f| f.asin.clone(), |f, v| f.asin = v)}
                        {text_field(vm, "ASIN на Amazon JP", !is_new, |f| f.jp_asin.clone(), |f, v| f.jp_asin = v)}
                        {text_field(vm, "ASIN на Amazon US", !is_new, |f| f.us_asin.clone(), |f, v| f.us_asin = v)}
                        {text_field(vm, "Название", false, |f| f.title.clone(), |f, v| f.title = v)}
                        {text_field(vm, "Категория", false, |f| f.category.clone(), |f, v| f.category = v)}
                        {text_field(vm, "Производитель", false, |f| f.manufacturer.clone(), |f, v| f.manufacturer = v)}
                        {text_field(vm, "Ссылка на источник", false, |f| f.source_url.clone(), |f, v| f.source_url = v)}
                        <div class="form__group">
                            <label class="form__label">{"Заметки"}</label>
                            <textarea
                                class="form__textarea"
                                prop:value=move || vm.form.with(|f| f.notes.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    vm.update_form(|f| f.notes = value);
                                }
                            />
                        </div>
                    </section>

                    <section class="card">
                        <h3 class="card__title">{"Цены"}</h3>
                        {number_field(vm, "Цена на Amazon JP, ¥", |f| f.jp_price, |f, v| f.jp_price = v)}
                        {number_field(vm, "Цена на Amazon US, $", |f| f.us_price, |f, v| f.us_price = v)}
                        {number_field(vm, "Цена продажи, ¥", |f| f.listing_price, |f, v| f.listing_price = v)}
                        {number_field(vm, "Минимальная прибыль, ¥", |f| f.minimum_profit_threshold, |f, v| f.minimum_profit_threshold = v)}

                        <Show when=move || !is_new>
                            <div class="form__group">
                                <label class="form__label">{"Статус"}</label>
                                <select
                                    class="form__select"
                                    prop:value=move || vm.form.with(|f| f.status.code())
                                    on:change=move |ev| {
                                        if let Some(status) = ListingStatus::from_code(&event_target_value(&ev)) {
                                            vm.update_form(|f| f.status = status);
                                        }
                                    }
                                >
                                    {ListingStatus::all().into_iter().map(|s| view! {
                                        <option value=s.code()>{s.display_name()}</option>
                                    }).collect_view()}
                                </select>
                            </div>
                            <dl class="details-summary">
                                <dt>{"Наличие"}</dt>
                                <dd>{move || vm.form.with(|f| f.stock_status.display_name())}</dd>
                                <dt>{"Прибыль"}</dt>
                                <dd>{move || vm.baseline.with(|f| format_yen(f.profit_amount))}</dd>
                                <dt>{"Маржа"}</dt>
                                <dd>{move || vm.baseline.with(|f| format_percent(f.profit_rate))}</dd>
                            </dl>
                        </Show>
                    </section>

                    <section class="card">
                        <h3 class="card__title">{"Издержки, ¥"}</h3>
                        {number_field(vm, "Международная доставка", |f| f.international_shipping_cost, |f, v| f.international_shipping_cost = v)}
                        {number_field(vm, "Доставка по Японии", |f| f.domestic_shipping_cost, |f, v| f.domestic_shipping_cost = v)}
                        {number_field(vm, "Таможенная пошлина", |f| f.customs_fee, |f, v| f.customs_fee = v)}
                        {number_field(vm, "Комиссия за перевод", |f| f.transfer_fee, |f, v| f.transfer_fee = v)}
                        {number_field(vm, "Комиссия Amazon", |f| f.amazon_fee, |f, v| f.amazon_fee = v)}
                    </section>

                    <section class="card">
                        <h3 class="card__title">{"Вес и габариты"}</h3>
                        {optional_number_field(vm, "Вес, г", |f| f.weight, |f, v| f.weight = v)}
                        {optional_number_field(vm, "Длина, см", |f| f.length, |f, v| f.length = v)}
                        {optional_number_field(vm, "Ширина, см", |f| f.width, |f, v| f.width = v)}
                        {optional_number_field(vm, "Высота, см", |f| f.height, |f, v| f.height = v)}
                        <Show when=move || is_new>
                            <label class="form__label">
                                <input
                                    type="checkbox"
                                    prop:checked=move || vm.form.with(|f| f.validate)
                                    on:change=move |ev| {
                                        let checked = event_target_checked(&ev);
                                        vm.update_form(|f| f.validate = checked);
                                    }
                                />
                                {" Проверять по чёрному списку и на дубликаты"}
                            </label>
                        </Show>
                    </section>
                </div>

                {move || vm.profit_preview.get().map(|result| view! {
                    <section class="card">
                        <h3 class="card__title">{"Предварительный расчёт"}</h3>
                        <ProfitBreakdown result=result />
                    </section>
                })}
            </div>
        </PageFrame>
    }
}
