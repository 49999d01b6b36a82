use super::check::BlacklistCheckPanel;
use crate::shared::api_utils::{delete, get_json, post_json};
use crate::shared::components::{EmptyState, ErrorBanner, SuccessBanner};
use crate::shared::format::format_timestamp;
use crate::shared::icons::icon;
use crate::shared::list_utils::{
    cmp_text, confirm_action, get_sort_class, get_sort_indicator, sort_list, Sortable,
};
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use contracts::domain::a002_blacklist::{
    BlacklistEntry, BlacklistEntryDto, BlacklistEntryResponse, BlacklistListResponse,
};
use contracts::domain::common::AggregateId;
use contracts::enums::blacklist_type::BlacklistType;
use contracts::enums::severity::Severity;
use leptos::prelude::*;
use std::cmp::Ordering;
use thaw::*;
use wasm_bindgen_futures::spawn_local;

#[derive(Clone, Debug)]
struct BlacklistListState {
    sort_field: String,
    sort_ascending: bool,
    /// Код типа; пустая строка означает "все"
    type_filter: String,
}

impl Default for BlacklistListState {
    fn default() -> Self {
        Self {
            sort_field: "created_at".to_string(),
            sort_ascending: false,
            type_filter: String::new(),
        }
    }
}

impl Sortable for BlacklistEntry {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "type" => self.entry_type.code().cmp(other.entry_type.code()),
            "value" => cmp_text(&self.value, &other.value),
            "reason" => cmp_text(&self.reason, &other.reason),
            "severity" => self.severity.cmp(&other.severity),
            "created_at" => self.created_at.cmp(&other.created_at),
            _ => Ordering::Equal,
        }
    }
}

/// Форма добавления правила
#[derive(Clone, Debug)]
struct EntryForm {
    entry_type: String,
    value: String,
    reason: String,
    severity: String,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            entry_type: BlacklistType::Asin.code().to_string(),
            value: String::new(),
            reason: String::new(),
            severity: Severity::High.code().to_string(),
        }
    }
}

impl EntryForm {
    fn to_dto(&self) -> BlacklistEntryDto {
        let reason = self.reason.trim();
        BlacklistEntryDto {
            entry_type: Some(self.entry_type.clone()),
            value: Some(self.value.trim().to_string()),
            reason: (!reason.is_empty()).then(|| reason.to_string()),
            severity: Some(self.severity.clone()),
        }
    }
}

fn filtered(entries: Vec<BlacklistEntry>, type_filter: &str) -> Vec<BlacklistEntry> {
    if type_filter.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| e.entry_type.code() == type_filter)
        .collect()
}

pub fn severity_color(severity: Severity) -> BadgeColor {
    match severity {
        Severity::High => BadgeColor::Danger,
        Severity::Medium => BadgeColor::Warning,
        Severity::Low => BadgeColor::Informative,
    }
}

#[component]
#[allow(non_snake_case)]
pub fn BlacklistPage() -> impl IntoView {
    let state = RwSignal::new(BlacklistListState::default());
    let (entries, set_entries) = signal::<Vec<BlacklistEntry>>(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (notice, set_notice) = signal::<Option<String>>(None);
    let defaults = EntryForm::default();
    let entry_type = RwSignal::new(defaults.entry_type);
    let value = RwSignal::new(defaults.value);
    let reason = RwSignal::new(defaults.reason);
    let severity = RwSignal::new(defaults.severity);

    let fetch = move || {
        spawn_local(async move {
            match get_json::<BlacklistListResponse>("/api/blacklist").await {
                Ok(resp) => {
                    set_entries.set(resp.entries);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(format!("Ошибка загрузки: {}", e))),
            }
        });
    };

    let add_entry = move |_| {
        let current = EntryForm {
            entry_type: entry_type.get_untracked(),
            value: value.get_untracked(),
            reason: reason.get_untracked(),
            severity: severity.get_untracked(),
        };
        if current.value.trim().is_empty() {
            set_error.set(Some("Укажите значение".to_string()));
            return;
        }
        let dto = current.to_dto();
        spawn_local(async move {
            match post_json::<_, BlacklistEntryResponse>("/api/blacklist", &dto).await {
                Ok(resp) => {
                    set_notice.set(Some(format!(
                        "Добавлено правило: {} \"{}\"",
                        resp.entry.entry_type.display_name(),
                        resp.entry.value
                    )));
                    set_error.set(None);
                    value.set(String::new());
                    reason.set(String::new());
                    fetch();
                }
                Err(e) => set_error.set(Some(format!("Ошибка добавления: {}", e))),
            }
        });
    };

    let delete_entry = move |entry: BlacklistEntry| {
        if !confirm_action(&format!("Удалить правило \"{}\"?", entry.value)) {
            return;
        }
        let id = entry.id.as_string();
        spawn_local(async move {
            match delete(&format!("/api/blacklist/{}", id)).await {
                Ok(()) => {
                    set_notice.set(Some(format!("Правило \"{}\" удалено", entry.value)));
                    fetch();
                }
                Err(e) => set_error.set(Some(format!("Ошибка удаления: {}", e))),
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

    let visible_entries = move || {
        let s = state.get();
        let mut rows = filtered(entries.get(), &s.type_filter);
        sort_list(&mut rows, &s.sort_field, s.sort_ascending);
        rows
    };

    fetch();

    view! {
        <PageFrame page_id="a002_blacklist--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h2>{"Чёрный список"}</h2>
                    <span class="page__header-count">{move || format!("{} правил", entries.get().len())}</span>
                </div>
                <div class="page__header-right">
                    <button class="button button--secondary" on:click=move |_| fetch()>
                        {icon("refresh")}
                        {"Обновить"}
                    </button>
                </div>
            </div>

            <div class="page__content">
                <ErrorBanner message=error />
                <SuccessBanner message=notice />

                <div class="details-grid">
                    <section class="card">
                        <h3 class="card__title">{"Новое правило"}</h3>
                        <Flex vertical=true gap=FlexGap::Small>
                            <Label>"Тип"</Label>
                            <Select value=entry_type>
                                {BlacklistType::all().into_iter().map(|t| view! {
                                    <option value=t.code()>{t.display_name()}</option>
                                }).collect_view()}
                            </Select>
                            <Label>"Значение"</Label>
                            <Input value=value placeholder="ASIN, бренд или ключевое слово" />
                            <Label>"Причина"</Label>
                            <Input value=reason />
                            <Label>"Критичность"</Label>
                            <Select value=severity>
                                {Severity::all().into_iter().map(|s| view! {
                                    <option value=s.code()>{s.display_name()}</option>
                                }).collect_view()}
                            </Select>
                            <div>
                                <Button
                                    appearance=ButtonAppearance::Primary
                                    on_click=add_entry
                                    disabled=Signal::derive(move || value.get().trim().is_empty())
                                >
                                    {icon("plus")}
                                    " Добавить"
                                </Button>
                            </div>
                        </Flex>
                    </section>

                    <BlacklistCheckPanel />
                </div>

                <div class="filter-bar">
                    <div class="form__group form__group--inline">
                        <label class="form__label">{"Тип"}</label>
                        <select
                            class="form__select"
                            prop:value=move || state.get().type_filter
                            on:change=move |ev| {
                                let value = event_target_value(&ev);
                                state.update(|s| s.type_filter = value);
                            }
                        >
                            <option value="">{"Все"}</option>
                            {BlacklistType::all().into_iter().map(|t| view! {
                                <option value=t.code()>{t.display_name()}</option>
                            }).collect_view()}
                        </select>
                    </div>
                </div>

                <Show
                    when=move || !entries.get().is_empty()
                    fallback=|| view! { <EmptyState text="Правил пока нет" /> }
                >
                    <div class="table-container">
                        <table class="table__data table--striped">
                            <thead class="table__head">
                                <tr>
                                    {sort_header("type", "Тип")}
                                    {sort_header("value", "Значение")}
                                    {sort_header("reason", "Причина")}
                                    {sort_header("severity", "Критичность")}
                                    {sort_header("created_at", "Добавлено")}
                                    <th class="table__header-cell"></th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || visible_entries().into_iter().map(|entry| {
                                    let for_delete = entry.clone();
                                    view! {
                                        <tr class="table__row">
                                            <td class="table__cell">
                                                {entry.entry_type.display_name()}
                                                {entry.auto_detected.then(|| view! {
                                                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Informative>"авто"</Badge>
                                                })}
                                            </td>
                                            <td class="table__cell table__cell--mono">{entry.value.clone()}</td>
                                            <td class="table__cell table__cell--wide">{entry.reason.clone()}</td>
                                            <td class="table__cell">
                                                <Badge appearance=BadgeAppearance::Tint color=severity_color(entry.severity)>
                                                    {entry.severity.display_name()}
                                                </Badge>
                                            </td>
                                            <td class="table__cell">{format_timestamp(&entry.created_at)}</td>
                                            <td class="table__cell table__cell--actions">
                                                <button
                                                    class="button button--ghost"
                                                    title="Удалить"
                                                    on:click=move |_| delete_entry(for_delete.clone())
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
    use chrono::{TimeZone, Utc};
    use contracts::domain::a002_blacklist::BlacklistEntryId;

    fn entry(entry_type: BlacklistType, value: &str, severity: Severity, ts: i64) -> BlacklistEntry {
        BlacklistEntry {
            id: BlacklistEntryId::new_v4(),
            entry_type,
            value: value.to_string(),
            reason: String::new(),
            severity,
            auto_detected: false,
            created_at: Utc.timestamp_opt(ts, 0).unwrap(),
        }
    }

    #[test]
    fn test_filter_by_type() {
        let rows = vec![
            entry(BlacklistType::Asin, "b000000001", Severity::High, 1),
            entry(BlacklistType::Keyword, "replica", Severity::Medium, 2),
        ];
        assert_eq!(filtered(rows.clone(), "").len(), 2);
        let only_keywords = filtered(rows, "keyword");
        assert_eq!(only_keywords.len(), 1);
        assert_eq!(only_keywords[0].value, "replica");
    }

    #[test]
    fn test_sort_by_severity() {
        let mut rows = vec![
            entry(BlacklistType::Brand, "a", Severity::Low, 1),
            entry(BlacklistType::Brand, "b", Severity::High, 2),
            entry(BlacklistType::Brand, "c", Severity::Medium, 3),
        ];
        sort_list(&mut rows, "severity", false);
        let order: Vec<&str> = rows.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_entry_form_dto() {
        let form = EntryForm {
            value: "  Acme  ".to_string(),
            reason: "   ".to_string(),
            ..EntryForm::default()
        };
        let dto = form.to_dto();
        assert_eq!(dto.entry_type.as_deref(), Some("asin"));
        assert_eq!(dto.value.as_deref(), Some("Acme"));
        assert_eq!(dto.reason, None);
        assert_eq!(dto.severity.as_deref(), Some("high"));
    }
}
