//! Правая панель: быстрые действия и список открытых окон

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::{tab_label_for_key, COMPARE_PRICES, LISTING_NEW};
use crate::shared::icons::icon;
use leptos::ev;
use leptos::prelude::*;

#[component]
pub fn RightPanel() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <div class="app-panel__content">
            <div class="quick-actions">
                <h3>"Быстрые действия"</h3>
                <button class="button button--secondary" on:click=move |_| ctx.open_tab(LISTING_NEW, tab_label_for_key(LISTING_NEW))>
                    {icon("plus")}
                    " Новый листинг"
                </button>
                <button class="button button--secondary" on:click=move |_| ctx.open_tab(COMPARE_PRICES, tab_label_for_key(COMPARE_PRICES))>
                    {icon("search")}
                    " Сравнить цены"
                </button>
            </div>
            <WindowsList />
        </div>
    }
}

#[component]
fn WindowsList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <div class="windows-list">
            <div class="windows-list__header">
                <h3>"Открытые окна"</h3>
                <span class="windows-list__count">{move || format!("({})", ctx.opened.with(|t| t.len()))}</span>
            </div>
            <div class="windows-list__items">
                <For
                    each=move || ctx.opened.get()
                    key=|tab| (tab.key.clone(), tab.title.clone())
                    children=move |tab| {
                        let key = StoredValue::new(tab.key.clone());
                        view! {
                            <div
                                class="windows-list__item"
                                class:windows-list__item--active=move || ctx.active.get().as_deref() == Some(key.get_value().as_str())
                                on:click=move |_| ctx.activate_tab(&key.get_value())
                            >
                                <span class="windows-list__item-title">{tab.title}</span>
                                <button
                                    class="windows-list__item-close"
                                    title="Закрыть окно"
                                    on:click=move |ev: ev::MouseEvent| {
                                        ev.stop_propagation();
                                        ctx.close_tab(&key.get_value());
                                    }
                                >
                                    {icon("x")}
                                </button>
                            </div>
                        }
                    }
                />
                <Show when=move || ctx.opened.with(|t| t.is_empty())>
                    <div class="windows-list__empty">"Нет открытых окон"</div>
                </Show>
            </div>
        </div>
    }
}
