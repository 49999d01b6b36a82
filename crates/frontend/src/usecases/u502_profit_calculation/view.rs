use super::api;
use crate::shared::components::ErrorBanner;
use crate::shared::format::{format_number, format_percent, format_yen, parse_number};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_USECASE;
use contracts::shared::Dimensions;
use contracts::usecases::u502_profit_calculation::{
    CostBreakdown, ProfitRequest, ProfitResult, ShippingProvider, ShippingQuote, ShippingRequest,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Строки разбивки издержек в порядке отображения
pub fn breakdown_rows(b: &CostBreakdown) -> Vec<(&'static str, f64)> {
    vec![
        ("Закупка (US → JPY)", b.us_price_jpy),
        ("Международная доставка", b.international_shipping_cost),
        ("Доставка по Японии", b.domestic_shipping_cost),
        ("Таможенная пошлина", b.customs_fee),
        ("Потребительский налог", b.consumption_tax),
        ("Комиссия за перевод", b.transfer_fee),
        ("Таможенное оформление", b.customs_clearance_fee),
        ("Комиссия Amazon", b.amazon_fee),
    ]
}

/// Итог расчёта прибыли с разбивкой издержек
#[component]
pub fn ProfitBreakdown(result: ProfitResult) -> impl IntoView {
    let profit_class = if result.profit_amount < 0.0 {
        "profit-summary__value text-danger"
    } else {
        "profit-summary__value text-success"
    };
    view! {
        <div class="profit-summary">
            <div class="profit-summary__item">
                <span class="profit-summary__label">{"Прибыль"}</span>
                <span class=profit_class>{format_yen(result.profit_amount)}</span>
            </div>
            <div class="profit-summary__item">
                <span class="profit-summary__label">{"Маржа"}</span>
                <span class="profit-summary__value">{format_percent(result.profit_rate)}</span>
            </div>
            <div class="profit-summary__item">
                <span class="profit-summary__label">{"Цена продажи"}</span>
                <span class="profit-summary__value">{format_yen(result.jp_listing_price)}</span>
            </div>
            <div class="profit-summary__item">
                <span class="profit-summary__label">{"Всего издержек"}</span>
                <span class="profit-summary__value">{format_yen(result.total_cost)}</span>
            </div>
        </div>
        <table class="table__data table--compact">
            <tbody>
                {breakdown_rows(&result.cost_breakdown).into_iter().map(|(label, value)| view! {
                    <tr class="table__row">
                        <td class="table__cell">{label}</td>
                        <td class="table__cell table__cell--number">{format_yen(value)}</td>
                    </tr>
                }).collect_view()}
            </tbody>
        </table>
        <p class="text-muted">{format!("Курс USD/JPY: {}", result.exchange_rate_used)}</p>
    }
}

/// Поля формы расчёта прибыли в том виде, как их ввёл пользователь
#[derive(Clone, Debug, Default)]
struct ProfitForm {
    us_price: String,
    jp_listing_price: String,
    weight_kg: String,
    length: String,
    width: String,
    height: String,
    international_shipping_cost: String,
    domestic_shipping_cost: String,
    customs_fee: String,
    transfer_fee: String,
    customs_clearance_fee: String,
    exchange_rate: String,
    amazon_fee_override: String,
}

fn dimensions_from(length: &str, width: &str, height: &str) -> Option<Dimensions> {
    Some(Dimensions {
        length: parse_number(length)?,
        width: parse_number(width)?,
        height: parse_number(height)?,
    })
}

impl ProfitForm {
    fn to_request(&self, calculate_shipping: bool) -> Result<ProfitRequest, String> {
        let us_price = parse_number(&self.us_price)
            .filter(|v| *v > 0.0)
            .ok_or("Укажите цену на Amazon US")?;
        let jp_listing_price = parse_number(&self.jp_listing_price)
            .filter(|v| *v > 0.0)
            .ok_or("Укажите цену продажи на Amazon JP")?;
        Ok(ProfitRequest {
            us_price,
            jp_listing_price,
            weight_kg: parse_number(&self.weight_kg),
            dimensions_cm: dimensions_from(&self.length, &self.width, &self.height),
            international_shipping_cost: parse_number(&self.international_shipping_cost),
            domestic_shipping_cost: parse_number(&self.domestic_shipping_cost),
            customs_fee: parse_number(&self.customs_fee),
            transfer_fee: parse_number(&self.transfer_fee),
            customs_clearance_fee: parse_number(&self.customs_clearance_fee),
            exchange_rate: parse_number(&self.exchange_rate),
            amazon_fee_override: parse_number(&self.amazon_fee_override),
            calculate_shipping,
        })
    }
}

#[derive(Clone, Debug)]
struct ShippingForm {
    weight_kg: String,
    length: String,
    width: String,
    height: String,
    provider: String,
}

impl Default for ShippingForm {
    fn default() -> Self {
        Self {
            weight_kg: String::new(),
            length: String::new(),
            width: String::new(),
            height: String::new(),
            provider: ShippingProvider::MadBeast.code().to_string(),
        }
    }
}

impl ShippingForm {
    fn to_request(&self) -> Result<ShippingRequest, String> {
        let weight_kg = parse_number(&self.weight_kg)
            .filter(|v| *v > 0.0)
            .ok_or("Укажите вес")?;
        Ok(ShippingRequest {
            weight_kg,
            dimensions_cm: dimensions_from(&self.length, &self.width, &self.height)
                .unwrap_or_default(),
            provider: Some(self.provider.clone()),
            ..ShippingRequest::default()
        })
    }
}

type ProfitGetter = fn(&ProfitForm) -> String;
type ProfitSetter = fn(&mut ProfitForm, String);

fn profit_input(
    form: RwSignal<ProfitForm>,
    label: &'static str,
    get: ProfitGetter,
    set: ProfitSetter,
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input
                class="form__input form__input--number"
                type="text"
                inputmode="decimal"
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        </div>
    }
}

fn shipping_input(
    form: RwSignal<ShippingForm>,
    label: &'static str,
    get: fn(&ShippingForm) -> String,
    set: fn(&mut ShippingForm, String),
) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label">{label}</label>
            <input
                class="form__input form__input--number"
                type="text"
                inputmode="decimal"
                prop:value=move || form.with(get)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
            />
        </div>
    }
}

#[component]
fn ShippingQuoteCard(quote: ShippingQuote) -> impl IntoView {
    view! {
        <dl class="details-summary">
            <dt>{"Стоимость"}</dt>
            <dd>{format_yen(quote.shipping_cost)}</dd>
            <dt>{"Служба"}</dt>
            <dd>{format!("{} ({})", quote.provider, quote.service_type)}</dd>
            <dt>{"Срок"}</dt>
            <dd>{format!("{} дн.", quote.estimated_days)}</dd>
            <dt>{"Фактический вес"}</dt>
            <dd>{format!("{} кг", format_number(quote.actual_weight_kg, 2))}</dd>
            <dt>{"Объёмный вес"}</dt>
            <dd>{format!("{} кг", format_number(quote.volumetric_weight_kg, 2))}</dd>
            <dt>{"Оплачиваемый вес"}</dt>
            <dd>{format!("{} кг", format_number(quote.chargeable_weight_kg, 2))}</dd>
        </dl>
    }
}

#[component]
pub fn ProfitCalculatorView() -> impl IntoView {
    let profit_form = RwSignal::new(ProfitForm::default());
    let (calculate_shipping, set_calculate_shipping) = signal(true);
    let (profit_result, set_profit_result) = signal::<Option<ProfitResult>>(None);
    let (profit_error, set_profit_error) = signal::<Option<String>>(None);

    let shipping_form = RwSignal::new(ShippingForm::default());
    let (quote, set_quote) = signal::<Option<ShippingQuote>>(None);
    let (shipping_error, set_shipping_error) = signal::<Option<String>>(None);

    let calculate = move |_| {
        let request = match profit_form.with_untracked(|f| f.to_request(calculate_shipping.get_untracked())) {
            Ok(r) => r,
            Err(e) => {
                set_profit_error.set(Some(e));
                return;
            }
        };
        set_profit_error.set(None);
        spawn_local(async move {
            match api::calculate_profit(&request).await {
                Ok(result) => set_profit_result.set(Some(result)),
                Err(e) => set_profit_error.set(Some(format!("Ошибка расчёта: {}", e))),
            }
        });
    };

    let estimate_shipping = move |_| {
        let request = match shipping_form.with_untracked(|f| f.to_request()) {
            Ok(r) => r,
            Err(e) => {
                set_shipping_error.set(Some(e));
                return;
            }
        };
        set_shipping_error.set(None);
        spawn_local(async move {
            match api::calculate_shipping(&request).await {
                Ok(q) => set_quote.set(Some(q)),
                Err(e) => set_shipping_error.set(Some(format!("Ошибка расчёта доставки: {}", e))),
            }
        });
    };

    view! {
        <PageFrame page_id="u502_profit_calculation--usecase" category=PAGE_CAT_USECASE>
            <div class="page__header">
                <div class="page__header-left">
                    <h2>{"Калькулятор прибыли"}</h2>
                </div>
            </div>

            <div class="page__content">
                <div class="details-grid">
                    <section class="card">
                        <h3 class="card__title">{"Прибыль"}</h3>
                        <ErrorBanner message=profit_error />
                        {profit_input(profit_form, "Цена на Amazon US, $", |f| f.us_price.clone(), |f, v| f.us_price = v)}
                        {profit_input(profit_form, "Цена продажи на Amazon JP, ¥", |f| f.jp_listing_price.clone(), |f, v| f.jp_listing_price = v)}
                        {profit_input(profit_form, "Вес, кг", |f| f.weight_kg.clone(), |f, v| f.weight_kg = v)}
                        {profit_input(profit_form, "Длина, см", |f| f.length.clone(), |f, v| f.length = v)}
                        {profit_input(profit_form, "Ширина, см", |f| f.width.clone(), |f, v| f.width = v)}
                        {profit_input(profit_form, "Высота, см", |f| f.height.clone(), |f, v| f.height = v)}
                        <label class="form__label">
                            <input
                                type="checkbox"
                                prop:checked=move || calculate_shipping.get()
                                on:change=move |ev| set_calculate_shipping.set(event_target_checked(&ev))
                            />
                            {" Оценить доставку по весу и габаритам"}
                        </label>

                        <details class="form__advanced">
                            <summary>{"Издержки и курс (необязательно)"}</summary>
                            {profit_input(profit_form, "Международная доставка, ¥", |f| f.international_shipping_cost.clone(), |f, v| f.international_shipping_cost = v)}
                            {profit_input(profit_form, "Доставка по Японии, ¥", |f| f.domestic_shipping_cost.clone(), |f, v| f.domestic_shipping_cost = v)}
                            {profit_input(profit_form, "Таможенная пошлина, ¥", |f| f.customs_fee.clone(), |f, v| f.customs_fee = v)}
                            {profit_input(profit_form, "Комиссия за перевод, ¥", |f| f.transfer_fee.clone(), |f, v| f.transfer_fee = v)}
                            {profit_input(profit_form, "Таможенное оформление, ¥", |f| f.customs_clearance_fee.clone(), |f, v| f.customs_clearance_fee = v)}
                            {profit_input(profit_form, "Комиссия Amazon, ¥", |f| f.amazon_fee_override.clone(), |f, v| f.amazon_fee_override = v)}
                            {profit_input(profit_form, "Курс USD/JPY", |f| f.exchange_rate.clone(), |f, v| f.exchange_rate = v)}
                        </details>

                        <button class="button button--primary" on:click=calculate>
                            {icon("calculator")}
                            {"Рассчитать"}
                        </button>

                        {move || profit_result.get().map(|result| view! { <ProfitBreakdown result=result /> })}
                    </section>

                    <section class="card">
                        <h3 class="card__title">{"Доставка US → JP"}</h3>
                        <ErrorBanner message=shipping_error />
                        {shipping_input(shipping_form, "Вес, кг", |f| f.weight_kg.clone(), |f, v| f.weight_kg = v)}
                        {shipping_input(shipping_form, "Длина, см", |f| f.length.clone(), |f, v| f.length = v)}
                        {shipping_input(shipping_form, "Ширина, см", |f| f.width.clone(), |f, v| f.width = v)}
                        {shipping_input(shipping_form, "Высота, см", |f| f.height.clone(), |f, v| f.height = v)}
                        <div class="form__group">
                            <label class="form__label">{"Служба доставки"}</label>
                            <select
                                class="form__select"
                                prop:value=move || shipping_form.with(|f| f.provider.clone())
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    shipping_form.update(|f| f.provider = value);
                                }
                            >
                                <option value=ShippingProvider::MadBeast.code()>{"MadBeast"}</option>
                                <option value=ShippingProvider::ImportCom.code()>{"Import.com"}</option>
                                <option value=ShippingProvider::Other.code()>{"Другая"}</option>
                            </select>
                        </div>
                        <button class="button button--secondary" on:click=estimate_shipping>
                            {icon("package")}
                            {"Рассчитать доставку"}
                        </button>

                        {move || quote.get().map(|q| view! { <ShippingQuoteCard quote=q /> })}
                    </section>
                </div>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_form_requires_prices() {
        let form = ProfitForm {
            us_price: "20".to_string(),
            ..ProfitForm::default()
        };
        assert_eq!(
            form.to_request(true).unwrap_err(),
            "Укажите цену продажи на Amazon JP"
        );
    }

    #[test]
    fn test_profit_form_to_request() {
        let form = ProfitForm {
            us_price: "20".to_string(),
            jp_listing_price: "9 800".to_string(),
            weight_kg: "1,5".to_string(),
            length: "30".to_string(),
            width: "20".to_string(),
            height: "10".to_string(),
            customs_fee: "".to_string(),
            exchange_rate: "145".to_string(),
            ..ProfitForm::default()
        };
        let req = form.to_request(false).unwrap();
        assert_eq!(req.us_price, 20.0);
        assert_eq!(req.jp_listing_price, 9800.0);
        assert_eq!(req.weight_kg, Some(1.5));
        assert_eq!(req.dimensions_cm, Some(Dimensions::new(30.0, 20.0, 10.0)));
        assert_eq!(req.customs_fee, None);
        assert_eq!(req.exchange_rate, Some(145.0));
        assert!(!req.calculate_shipping);
    }

    #[test]
    fn test_partial_dimensions_are_dropped() {
        assert_eq!(dimensions_from("30", "", "10"), None);
    }

    #[test]
    fn test_shipping_form_to_request() {
        let form = ShippingForm {
            weight_kg: "2".to_string(),
            ..ShippingForm::default()
        };
        let req = form.to_request().unwrap();
        assert_eq!(req.weight_kg, 2.0);
        assert_eq!(req.dimensions_cm, Dimensions::default());
        assert_eq!(req.destination_country, "JP");
        assert_eq!(req.provider(), ShippingProvider::MadBeast);

        assert!(ShippingForm::default().to_request().is_err());
    }

    #[test]
    fn test_breakdown_rows_cover_all_costs() {
        let b = CostBreakdown {
            us_price_jpy: 3000.0,
            amazon_fee: 980.0,
            ..CostBreakdown::default()
        };
        let rows = breakdown_rows(&b);
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].1, 3000.0);
        assert_eq!(rows[7], ("Комиссия Amazon", 980.0));
    }
}
