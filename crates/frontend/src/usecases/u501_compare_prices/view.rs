use super::api;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::LISTING_NEW;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::components::ErrorBanner;
use crate::shared::format::{format_percent, format_usd, format_yen};
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_USECASE;
use contracts::domain::a001_listing::ListingDto;
use contracts::usecases::u501_compare_prices::request::DEFAULT_EXCHANGE_RATE;
use contracts::usecases::u501_compare_prices::{CompareRequest, CompareResponse, MarketSnapshot};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Черновик листинга по результату сравнения
pub fn draft_from_comparison(resp: &CompareResponse) -> ListingDto {
    let jp = &resp.jp_amazon;
    let us = &resp.us_amazon;
    let jp_price = jp.price.unwrap_or(0.0);
    ListingDto {
        asin: jp.asin.clone(),
        us_asin: (us.asin != jp.asin).then(|| us.asin.clone()),
        title: jp.title.clone().or_else(|| us.title.clone()).unwrap_or_default(),
        jp_price,
        us_price: us.price.unwrap_or(0.0),
        listing_price: jp_price,
        source_url: us.url.clone(),
        ..ListingDto::default()
    }
}

fn snapshot_price(snapshot: &MarketSnapshot) -> String {
    match (snapshot.price, snapshot.price_currency.as_str()) {
        (Some(price), "USD") => format_usd(price),
        (Some(price), _) => format_yen(price),
        (None, _) => "-".to_string(),
    }
}

fn availability_label(availability: Option<bool>) -> &'static str {
    match availability {
        Some(true) => "В наличии",
        Some(false) => "Нет в наличии",
        None => "Неизвестно",
    }
}

fn availability_color(availability: Option<bool>) -> BadgeColor {
    match availability {
        Some(true) => BadgeColor::Success,
        Some(false) => BadgeColor::Danger,
        None => BadgeColor::Informative,
    }
}

#[component]
fn MarketCard(title: &'static str, snapshot: MarketSnapshot) -> impl IntoView {
    if !snapshot.found {
        return view! {
            <div class="card market-card market-card--missing">
                <h3 class="card__title">{title}</h3>
                <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Warning>
                    {format!("Товар {} не найден", snapshot.asin)}
                </Badge>
            </div>
        }
        .into_any();
    }

    let price = snapshot_price(&snapshot);
    view! {
        <div class="card market-card">
            <h3 class="card__title">{title}</h3>
            {snapshot.image_url.clone().map(|src| view! {
                <img class="market-card__image" src=src alt="" />
            })}
            <p class="market-card__name">{snapshot.title.clone().unwrap_or_default()}</p>
            <dl class="details-summary">
                <dt>{"ASIN"}</dt>
                <dd>{snapshot.asin.clone()}</dd>
                <dt>{"Цена"}</dt>
                <dd>{price}</dd>
                {snapshot.price_jpy.map(|jpy| view! {
                    <dt>{"Цена в иенах"}</dt>
                    <dd>{format_yen(jpy)}</dd>
                })}
                <dt>{"Наличие"}</dt>
                <dd>
                    <Badge appearance=BadgeAppearance::Tint color=availability_color(snapshot.availability)>
                        {availability_label(snapshot.availability)}
                    </Badge>
                </dd>
            </dl>
            {snapshot.url.clone().map(|href| view! {
                <a class="market-card__link" href=href target="_blank" rel="noopener">{"Открыть на Amazon"}</a>
            })}
        </div>
    }
    .into_any()
}

#[component]
pub fn ComparePricesView() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let asin = RwSignal::new(String::new());
    let us_asin = RwSignal::new(String::new());
    let rate = RwSignal::new(DEFAULT_EXCHANGE_RATE.to_string());
    let (result, set_result) = signal::<Option<CompareResponse>>(None);
    let (error, set_error) = signal::<Option<String>>(None);
    let (is_loading, set_is_loading) = signal(false);

    let run_compare = move || {
        let asin_value = asin.get_untracked().trim().to_string();
        if asin_value.is_empty() {
            set_error.set(Some("Укажите ASIN".to_string()));
            return;
        }
        let us_value = us_asin.get_untracked().trim().to_string();
        let request = CompareRequest {
            asin: asin_value,
            us_asin: (!us_value.is_empty()).then_some(us_value),
            exchange_rate: rate.get_untracked().trim().replace(',', ".").parse::<f64>().ok(),
        };

        set_error.set(None);
        set_is_loading.set(true);
        spawn_local(async move {
            match api::compare_prices(&request).await {
                Ok(resp) => set_result.set(Some(resp)),
                Err(e) => {
                    set_result.set(None);
                    set_error.set(Some(format!("Ошибка сравнения: {}", e)));
                }
            }
            set_is_loading.set(false);
        });
    };

    let add_as_listing = move |_| {
        let Some(resp) = result.get_untracked() else {
            return;
        };
        match serde_json::to_value(draft_from_comparison(&resp)) {
            Ok(draft) => {
                tabs_store.set_form_state(LISTING_NEW.to_string(), draft);
                tabs_store.open_tab(LISTING_NEW, tab_label_for_key(LISTING_NEW));
            }
            Err(e) => set_error.set(Some(format!("Не удалось подготовить листинг: {}", e))),
        }
    };

    view! {
        <PageFrame page_id="u501_compare_prices--usecase" category=PAGE_CAT_USECASE>
            <div class="page__header">
                <div class="page__header-left">
                    <h2>{"Сравнение цен US ↔ JP"}</h2>
                </div>
            </div>

            <div class="page__content">
                <ErrorBanner message=error />

                <Flex class="filter-bar" align=FlexAlign::End gap=FlexGap::Medium>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"ASIN (JP)"</Label>
                        <Input value=asin placeholder="B0XXXXXXXX" />
                    </Flex>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"ASIN (US)"</Label>
                        <Input value=us_asin placeholder="если отличается" />
                    </Flex>
                    <Flex vertical=true gap=FlexGap::Small>
                        <Label>"Курс USD/JPY"</Label>
                        <Input value=rate />
                    </Flex>
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| run_compare()
                        disabled=Signal::derive(move || is_loading.get() || asin.get().trim().is_empty())
                    >
                        {icon("search")}
                        {move || if is_loading.get() { " Поиск..." } else { " Сравнить" }}
                    </Button>
                </Flex>

                <Show when=move || is_loading.get()>
                    <Space gap=SpaceGap::Small>
                        <Spinner />
                        <span>{"Запрашиваем Amazon JP и US..."}</span>
                    </Space>
                </Show>

                {move || result.get().map(|resp| {
                    let diff = resp.price_difference.clone();
                    let diff_class = match diff.amount_jpy {
                        Some(v) if v > 0.0 => "price-diff price-diff--positive",
                        Some(v) if v < 0.0 => "price-diff price-diff--negative",
                        _ => "price-diff",
                    };
                    view! {
                        <div class="compare-grid">
                            <MarketCard title="Amazon JP" snapshot=resp.jp_amazon.clone() />
                            <MarketCard title="Amazon US" snapshot=resp.us_amazon.clone() />
                        </div>
                        <div class=diff_class>
                            <span>{"Разница (JP − US): "}</span>
                            <strong>{diff.amount_jpy.map(format_yen).unwrap_or_else(|| "-".to_string())}</strong>
                            <span>{diff.percent.map(|p| format!(" ({})", format_percent(p))).unwrap_or_default()}</span>
                            <span class="price-diff__rate">{format!(" по курсу {}", diff.exchange_rate_used)}</span>
                        </div>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=add_as_listing
                            disabled=!resp.jp_amazon.found
                        >
                            {icon("plus")}
                            " Добавить как листинг"
                        </Button>
                    }
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u501_compare_prices::PriceDifference;

    fn response() -> CompareResponse {
        CompareResponse {
            success: true,
            jp_amazon: MarketSnapshot {
                asin: "B000000001".to_string(),
                found: true,
                title: Some("Widget JP".to_string()),
                price: Some(9800.0),
                price_currency: "JPY".to_string(),
                ..MarketSnapshot::default()
            },
            us_amazon: MarketSnapshot {
                asin: "B000000002".to_string(),
                found: true,
                title: Some("Widget".to_string()),
                price: Some(20.0),
                price_currency: "USD".to_string(),
                price_jpy: Some(3000.0),
                url: Some("https://www.amazon.com/dp/B000000002".to_string()),
                ..MarketSnapshot::default()
            },
            price_difference: PriceDifference {
                amount_jpy: Some(6800.0),
                percent: Some(226.67),
                exchange_rate_used: 150.0,
            },
        }
    }

    #[test]
    fn test_draft_from_comparison() {
        let draft = draft_from_comparison(&response());
        assert_eq!(draft.asin, "B000000001");
        assert_eq!(draft.us_asin.as_deref(), Some("B000000002"));
        assert_eq!(draft.title, "Widget JP");
        assert_eq!(draft.jp_price, 9800.0);
        assert_eq!(draft.us_price, 20.0);
        assert_eq!(draft.listing_price, 9800.0);
        assert!(draft.validate);
    }

    #[test]
    fn test_same_asin_is_not_duplicated() {
        let mut resp = response();
        resp.us_amazon.asin = "B000000001".to_string();
        assert_eq!(draft_from_comparison(&resp).us_asin, None);
    }

    #[test]
    fn test_snapshot_price_currency() {
        let resp = response();
        assert_eq!(snapshot_price(&resp.us_amazon), "$20.00");
        assert_eq!(snapshot_price(&MarketSnapshot::default()), "-");
    }
}
