pub mod import;
pub mod state;

use self::import::ImportPanel;
use self::state::{create_state, ListingListState};
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::{LISTINGS, LISTING_NEW};
use crate::layout::tabs::{detail_tab_label, listing_detail_key};
use crate::shared::api_utils::{delete, get_json, post_empty, post_json};
use crate::shared::components::{
    EmptyState, ErrorBanner, LoadingIndicator, SuccessBanner, TableCheckbox,
};
use crate::shared::export::{export_to_excel, ExcelExportable};
use crate::shared::format::{format_percent, format_timestamp, format_usd, format_yen};
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_number, cmp_text, confirm_action, get_sort_class, get_sort_indicator, sort_list,
    SearchInput, Sortable,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use chrono::{DateTime, Utc};
use contracts::domain::a001_listing::transfer::{export_headers, export_row};
use contracts::domain::a001_listing::{
    BulkDeleteRequest, BulkDeleteResponse, BulkUpdateRequest, BulkUpdateResponse,
    DuplicateListResponse, DuplicatePair, Listing, ListingListResponse,
};
use contracts::domain::common::AggregateId;
use contracts::enums::listing_status::ListingStatus;
use contracts::enums::stock_status::StockStatus;
use contracts::usecases::u503_stock_monitor::CheckOutcome;
use leptos::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use thaw::*;
use wasm_bindgen_futures::spawn_local;

#[derive(Clone, Debug)]
pub struct ListingRow {
    pub id: String,
    pub asin: String,
    pub title: String,
    pub jp_price: f64,
    pub us_price: f64,
    pub listing_price: f64,
    pub profit_amount: f64,
    pub profit_rate: f64,
    pub status: ListingStatus,
    pub stock_status: StockStatus,
    pub category: String,
    pub created_at: DateTime<Utc>,
    source: Listing,
}

impl From<Listing> for ListingRow {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id.as_string(),
            asin: l.asin.clone(),
            title: l.title.clone(),
            jp_price: l.jp_price,
            us_price: l.us_price,
            listing_price: l.listing_price,
            profit_amount: l.profit_amount,
            profit_rate: l.profit_rate,
            status: l.status,
            stock_status: l.stock_status,
            category: l.category.clone().unwrap_or_default(),
            created_at: l.metadata.created_at,
            source: l,
        }
    }
}

impl Sortable for ListingRow {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "asin" => cmp_text(&self.asin, &other.asin),
            "title" => cmp_text(&self.title, &other.title),
            "jp_price" => cmp_number(self.jp_price, other.jp_price),
            "us_price" => cmp_number(self.us_price, other.us_price),
            "listing_price" => cmp_number(self.listing_price, other.listing_price),
            "profit_amount" => cmp_number(self.profit_amount, other.profit_amount),
            "profit_rate" => cmp_number(self.profit_rate, other.profit_rate),
            "status" => self.status.code().cmp(other.status.code()),
            "stock_status" => self.stock_status.code().cmp(other.stock_status.code()),
            "category" => cmp_text(&self.category, &other.category),
            "created_at" => self.created_at.cmp(&other.created_at),
            _ => Ordering::Equal,
        }
    }
}

impl ExcelExportable for ListingRow {
    fn headers() -> Vec<&'static str> {
        export_headers()
    }

    fn to_csv_row(&self) -> Vec<String> {
        export_row(&self.source)
    }
}

fn status_color(status: ListingStatus) -> BadgeColor {
    match status {
        ListingStatus::Active => BadgeColor::Success,
        ListingStatus::Draft => BadgeColor::Informative,
        ListingStatus::Paused => BadgeColor::Warning,
        ListingStatus::Stopped => BadgeColor::Subtle,
        ListingStatus::Error => BadgeColor::Danger,
    }
}

fn stock_color(stock: StockStatus) -> BadgeColor {
    match stock {
        StockStatus::InStock => BadgeColor::Success,
        StockStatus::OutOfStock | StockStatus::Unavailable => BadgeColor::Danger,
        StockStatus::Unknown => BadgeColor::Subtle,
    }
}

/// Путь списка с учётом фильтров
pub fn listings_path(state: &ListingListState) -> String {
    let mut params = Vec::new();
    if !state.status_filter.is_empty() {
        params.push(format!("status={}", urlencoding::encode(&state.status_filter)));
    }
    let category = state.category_filter.trim();
    if !category.is_empty() {
        params.push(format!("category={}", urlencoding::encode(category)));
    }
    if params.is_empty() {
        "/api/listings".to_string()
    } else {
        format!("/api/listings?{}", params.join("&"))
    }
}

/// Краткий итог ручной проверки листинга
pub fn describe_check(asin: &str, outcome: &CheckOutcome) -> String {
    let updates = &outcome.updates;
    if let Some(reason) = &updates.auto_stopped_reason {
        return format!("{}: листинг остановлен ({})", asin, reason);
    }
    if updates.is_empty() {
        return format!("{}: изменений нет", asin);
    }
    let mut parts = Vec::new();
    if let Some(stock) = updates.stock_status {
        parts.push(format!("наличие JP: {}", stock.display_name()));
    }
    if let Some(price) = updates.jp_price {
        parts.push(format!("цена JP: {}", format_yen(price)));
    }
    if let Some(price) = updates.us_price {
        parts.push(format!("цена US: {}", format_usd(price)));
    }
    if let Some(profit) = updates.profit_amount {
        parts.push(format!("прибыль: {}", format_yen(profit)));
    }
    if parts.is_empty() {
        format!("{}: данные обновлены", asin)
    } else {
        format!("{}: {}", asin, parts.join(", "))
    }
}

#[component]
#[allow(non_snake_case)]
pub fn ListingList() -> impl IntoView {
    let tabs_store =
        use_context::<AppGlobalContext>().expect("AppGlobalContext not found in context");
    let state = create_state();
    let (items, set_items) = signal::<Vec<ListingRow>>(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let (is_loading, set_is_loading) = signal(false);
    let (selected, set_selected) = signal::<HashSet<String>>(HashSet::new());
    let (bulk_status, set_bulk_status) = signal(ListingStatus::Active.code().to_string());
    let (show_import, set_show_import) = signal(false);
    let (duplicates, set_duplicates) = signal::<Option<Vec<DuplicatePair>>>(None);

    let fetch = move || {
        let path = listings_path(&state.get_untracked());
        set_is_loading.set(true);
        spawn_local(async move {
            match get_json::<ListingListResponse>(&path).await {
                Ok(resp) => {
                    let rows: Vec<ListingRow> = resp.listings.into_iter().map(Into::into).collect();
                    let ids: HashSet<String> = rows.iter().map(|r| r.id.clone()).collect();
                    set_selected.update(|s| s.retain(|id| ids.contains(id)));
                    set_items.set(rows);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
            set_is_loading.set(false);
        });
    };

    // Перечитываем список при каждом возврате на таб
    Effect::new(move |_| {
        if tabs_store.active.get().as_deref() == Some(LISTINGS) {
            fetch();
        }
    });

    let on_status_filter = move |value: String| {
        state.update(|s| s.status_filter = value);
        fetch();
    };

    let on_category_filter = Callback::new(move |value: String| {
        state.update(|s| s.category_filter = value);
        fetch();
    });

    let toggle_select = move |id: String, checked: bool| {
        set_selected.update(|s| {
            if checked {
                s.insert(id);
            } else {
                s.remove(&id);
            }
        });
    };

    let toggle_sort = move |field: &'static str| {
        move |_| {
            state.update(|s| {
                if s.sort_field == field {
                    s.sort_ascending = !s.sort_ascending;
                } else {
                    s.sort_field = field.to_string();
                    s.sort_ascending = true;
                }
            });
        }
    };

    let sorted_items = move || {
        let mut rows = items.get();
        let s = state.get();
        sort_list(&mut rows, &s.sort_field, s.sort_ascending);
        rows
    };

    let sort_header = move |field: &'static str, label: &'static str| {
        view! {
            <th class="table__header-cell table__header-cell--sortable" on:click=toggle_sort(field)>
                {label}
                <span class=move || get_sort_class(&state.get().sort_field, field)>
                    {move || get_sort_indicator(&state.get().sort_field, field, state.get().sort_ascending)}
                </span>
            </th>
        }
    };

    let open_details = move |id: String, asin: String| {
        tabs_store.open_tab(&listing_detail_key(&id), &detail_tab_label("Листинг", &asin));
    };

    let apply_bulk_status = move |_| {
        let ids: Vec<String> = selected.get_untracked().into_iter().collect();
        if ids.is_empty() {
            return;
        }
        let request = BulkUpdateRequest {
            listing_ids: ids,
            status: Some(bulk_status.get_untracked()),
        };
        spawn_local(async move {
            match post_json::<_, BulkUpdateResponse>("/api/listings/bulk-update", &request).await {
                Ok(resp) => {
                    set_notice.set(Some(format!("Обновлено листингов: {}", resp.updated_count)));
                    set_selected.set(HashSet::new());
                    fetch();
                }
                Err(e) => set_error.set(Some(format!("Ошибка обновления: {}", e))),
            }
        });
    };

    let delete_selected = move |_| {
        let ids: Vec<String> = selected.get_untracked().into_iter().collect();
        if ids.is_empty() {
            return;
        }
        if !confirm_action(&format!("Удалить выбранные листинги? Количество: {}", ids.len())) {
            return;
        }
        let request = BulkDeleteRequest { listing_ids: ids };
        spawn_local(async move {
            match post_json::<_, BulkDeleteResponse>("/api/listings/bulk-delete", &request).await {
                Ok(resp) => {
                    set_notice.set(Some(format!("Удалено листингов: {}", resp.deleted_count)));
                    set_selected.set(HashSet::new());
                    fetch();
                }
                Err(e) => set_error.set(Some(format!("Ошибка удаления: {}", e))),
            }
        });
    };

    let delete_one = move |id: String, asin: String| {
        if !confirm_action(&format!("Удалить листинг {}?", asin)) {
            return;
        }
        spawn_local(async move {
            match delete(&format!("/api/listings/{}", id)).await {
                Ok(()) => {
                    set_notice.set(Some(format!("Листинг {} удалён", asin)));
                    fetch();
                }
                Err(e) => set_error.set(Some(format!("Ошибка удаления: {}", e))),
            }
        });
    };

    let check_one = move |id: String, asin: String| {
        spawn_local(async move {
            match post_empty::<CheckOutcome>(&format!("/api/monitor/check/{}", id)).await {
                Ok(outcome) => {
                    set_notice.set(Some(describe_check(&asin, &outcome)));
                    fetch();
                }
                Err(e) => set_error.set(Some(format!("Ошибка проверки {}: {}", asin, e))),
            }
        });
    };

    let load_duplicates = move |_| {
        spawn_local(async move {
            match get_json::<DuplicateListResponse>("/api/listings/duplicates").await {
                Ok(resp) => set_duplicates.set(Some(resp.duplicates)),
                Err(e) => set_error.set(Some(format!("Ошибка поиска дубликатов: {}", e))),
            }
        });
    };

    let export_csv = move |_| {
        if let Err(e) = export_to_excel(&sorted_items(), "listings.csv") {
            set_error.set(Some(e));
        }
    };

    let asin_by_id = move |id: &str| {
        items.with(|rows| {
            rows.iter()
                .find(|r| r.id == id)
                .map(|r| r.asin.clone())
                .unwrap_or_else(|| id.to_string())
        })
    };

    view! {
        <PageFrame page_id="a001_listing--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h2>{"Листинги"}</h2>
                    <span class="page__header-count">{move || format!("{} шт.", items.get().len())}</span>
                </div>
                <div class="page__header-right">
                    <button class="button button--primary" on:click=move |_| tabs_store.open_tab(LISTING_NEW, "Новый листинг")>
                        {icon("plus")}
                        {"Новый листинг"}
                    </button>
                    <button class="button button--secondary" on:click=move |_| set_show_import.update(|v| *v = !*v)>
                        {icon("upload")}
                        {"Импорт"}
                    </button>
                    <button class="button button--secondary" on:click=export_csv>
                        {icon("download")}
                        {"Экспорт CSV"}
                    </button>
                    <button class="button button--secondary" on:click=load_duplicates>
                        {icon("layers")}
                        {"Дубликаты"}
                    </button>
                    <button class="button button--secondary" on:click=move |_| fetch()>
                        {icon("refresh")}
                        {"Обновить"}
                    </button>
                </div>
            </div>

            <div class="page__content">
                <ErrorBanner message=error />
                <SuccessBanner message=notice />

                <Show when=move || show_import.get()>
                    <ImportPanel
                        on_imported=Callback::new(move |_| fetch())
                        on_close=Callback::new(move |_| set_show_import.set(false))
                    />
                </Show>

                {move || duplicates.get().map(|pairs| {
                    view! {
                        <div class="card duplicates">
                            <div class="card__header">
                                <h3>{format!("Возможные дубликаты: {}", pairs.len())}</h3>
                                <button class="button button--ghost" on:click=move |_| set_duplicates.set(None)>
                                    {icon("x")}
                                </button>
                            </div>
                            {if pairs.is_empty() {
                                view! { <EmptyState text="Дубликатов не найдено" /> }.into_any()
                            } else {
                                view! {
                                    <ul class="duplicates__list">
                                        {pairs.into_iter().map(|pair| {
                                            let left = asin_by_id(&pair.listing1_id);
                                            let right = asin_by_id(&pair.listing2_id);
                                            view! {
                                                <li>{format!("{} ↔ {} ({}: {})", left, right, pair.match_type, pair.reason)}</li>
                                            }
                                        }).collect_view()}
                                    </ul>
                                }.into_any()
                            }}
                        </div>
                    }
                })}

                <div class="filter-bar">
                    <div class="form__group form__group--inline">
                        <label class="form__label">{"Статус"}</label>
                        <select
                            class="form__select"
                            prop:value=move || state.get().status_filter
                            on:change=move |ev| on_status_filter(event_target_value(&ev))
                        >
                            <option value="">{"Все"}</option>
                            {ListingStatus::all().into_iter().map(|s| view! {
                                <option value=s.code()>{s.display_name()}</option>
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="form__group form__group--inline">
                        <label class="form__label">{"Категория"}</label>
                        <SearchInput
                            value=Signal::derive(move || state.get().category_filter)
                            on_change=on_category_filter
                            placeholder="Категория..."
                        />
                    </div>

                    <div class="filter-bar__bulk">
                        <select
                            class="form__select"
                            prop:value=move || bulk_status.get()
                            on:change=move |ev| set_bulk_status.set(event_target_value(&ev))
                        >
                            {ListingStatus::all().into_iter().map(|s| view! {
                                <option value=s.code()>{s.display_name()}</option>
                            }).collect_view()}
                        </select>
                        <button
                            class="button button--secondary"
                            on:click=apply_bulk_status
                            disabled=move || selected.get().is_empty()
                        >
                            {icon("check")}
                            {move || format!("Сменить статус ({})", selected.get().len())}
                        </button>
                        <button
                            class="button button--secondary"
                            on:click=delete_selected
                            disabled=move || selected.get().is_empty()
                        >
                            {icon("delete")}
                            {move || format!("Удалить ({})", selected.get().len())}
                        </button>
                    </div>
                </div>

                <Show when=move || is_loading.get() && items.get().is_empty()>
                    <LoadingIndicator />
                </Show>

                <Show when=move || !is_loading.get() && items.get().is_empty()>
                    <EmptyState text="Листингов нет. Создайте листинг или импортируйте файл." />
                </Show>

                <Show when=move || !items.get().is_empty()>
                    <div class="table-container">
                        <table class="table__data table--striped">
                            <thead class="table__head">
                                <tr>
                                    <th class="table__header-cell table__header-cell--checkbox">
                                        <input
                                            type="checkbox"
                                            class="table__checkbox"
                                            prop:checked=move || {
                                                let n = items.get().len();
                                                n > 0 && selected.get().len() == n
                                            }
                                            on:change=move |ev| {
                                                if event_target_checked(&ev) {
                                                    let all: HashSet<String> =
                                                        items.get_untracked().iter().map(|r| r.id.clone()).collect();
                                                    set_selected.set(all);
                                                } else {
                                                    set_selected.set(HashSet::new());
                                                }
                                            }
                                        />
                                    </th>
                                    {sort_header("asin", "ASIN")}
                                    {sort_header("title", "Название")}
                                    {sort_header("category", "Категория")}
                                    {sort_header("jp_price", "Цена JP")}
                                    {sort_header("us_price", "Цена US")}
                                    {sort_header("listing_price", "Цена продажи")}
                                    {sort_header("profit_amount", "Прибыль")}
                                    {sort_header("profit_rate", "Маржа")}
                                    {sort_header("status", "Статус")}
                                    {sort_header("stock_status", "Наличие")}
                                    {sort_header("created_at", "Создан")}
                                    <th class="table__header-cell"></th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || sorted_items().into_iter().map(|row| {
                                    let id_for_checkbox = row.id.clone();
                                    let id_for_toggle = row.id.clone();
                                    let id_for_selected = row.id.clone();
                                    let open = (row.id.clone(), row.asin.clone());
                                    let check = (row.id.clone(), row.asin.clone());
                                    let remove = (row.id.clone(), row.asin.clone());
                                    let profit_class = if row.profit_amount < 0.0 {
                                        "table__cell table__cell--number text-danger"
                                    } else {
                                        "table__cell table__cell--number"
                                    };
                                    view! {
                                        <tr
                                            class="table__row"
                                            class:table__row--selected=move || selected.get().contains(&id_for_selected)
                                            on:click=move |_| open_details(open.0.clone(), open.1.clone())
                                        >
                                            <TableCheckbox
                                                checked=Signal::derive(move || selected.get().contains(&id_for_checkbox))
                                                on_change=Callback::new(move |checked| toggle_select(id_for_toggle.clone(), checked))
                                            />
                                            <td class="table__cell table__cell--mono">{row.asin}</td>
                                            <td class="table__cell table__cell--wide">{row.title}</td>
                                            <td class="table__cell">{row.category}</td>
                                            <td class="table__cell table__cell--number">{format_yen(row.jp_price)}</td>
                                            <td class="table__cell table__cell--number">{format_usd(row.us_price)}</td>
                                            <td class="table__cell table__cell--number">{format_yen(row.listing_price)}</td>
                                            <td class=profit_class>{format_yen(row.profit_amount)}</td>
                                            <td class="table__cell table__cell--number">{format_percent(row.profit_rate)}</td>
                                            <td class="table__cell">
                                                <Badge appearance=BadgeAppearance::Tint color=status_color(row.status)>
                                                    {row.status.display_name()}
                                                </Badge>
                                            </td>
                                            <td class="table__cell">
                                                <Badge appearance=BadgeAppearance::Outline color=stock_color(row.stock_status)>
                                                    {row.stock_status.display_name()}
                                                </Badge>
                                            </td>
                                            <td class="table__cell">{format_timestamp(&row.created_at)}</td>
                                            <td class="table__cell table__cell--actions" on:click=|e| e.stop_propagation()>
                                                <button
                                                    class="button button--ghost"
                                                    title="Проверить наличие и цены"
                                                    on:click=move |_| check_one(check.0.clone(), check.1.clone())
                                                >
                                                    {icon("activity")}
                                                </button>
                                                <button
                                                    class="button button--ghost"
                                                    title="Удалить"
                                                    on:click=move |_| delete_one(remove.0.clone(), remove.1.clone())
                                                >
                                                    {icon("delete")}
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    </div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_listing::ListingDto;
    use contracts::usecases::u503_stock_monitor::ListingUpdates;

    fn row(asin: &str, profit: f64) -> ListingRow {
        let dto = ListingDto {
            asin: asin.to_string(),
            ..ListingDto::default()
        };
        let mut listing = Listing::new_for_insert(&dto);
        listing.profit_amount = profit;
        listing.into()
    }

    #[test]
    fn test_listings_path_with_filters() {
        let mut state = ListingListState::default();
        assert_eq!(listings_path(&state), "/api/listings");

        state.status_filter = "active".to_string();
        state.category_filter = " Toys & Games ".to_string();
        assert_eq!(
            listings_path(&state),
            "/api/listings?status=active&category=Toys%20%26%20Games"
        );
    }

    #[test]
    fn test_rows_sort_by_profit() {
        let mut rows = vec![row("B000000001", 500.0), row("B000000002", 3200.0)];
        sort_list(&mut rows, "profit_amount", false);
        assert_eq!(rows[0].asin, "B000000002");
    }

    #[test]
    fn test_row_exports_all_columns() {
        let r = row("B000000003", 0.0);
        assert_eq!(r.to_csv_row().len(), ListingRow::headers().len());
        assert_eq!(r.to_csv_row()[0], "B000000003");
    }

    #[test]
    fn test_describe_check() {
        let mut outcome = CheckOutcome {
            success: true,
            listing_id: "x".to_string(),
            updates: ListingUpdates::default(),
        };
        assert_eq!(describe_check("B1", &outcome), "B1: изменений нет");

        outcome.updates.auto_stopped_reason = Some("out of stock".to_string());
        assert_eq!(
            describe_check("B1", &outcome),
            "B1: листинг остановлен (out of stock)"
        );
    }
}
