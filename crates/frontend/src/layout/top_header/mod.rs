//! Верхняя панель: название приложения и переключатели боковых панелей.

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::{tab_label_for_key, STOCK_MONITOR};
use crate::shared::icons::icon;
use leptos::prelude::*;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if ctx.left_open.get() { "Скрыть навигацию" } else { "Показать навигацию" }
                >
                    {icon("panel-left")}
                </button>
                <span class="top-header__title">"Amazon US → JP"</span>
            </div>

            <div class="top-header__actions">
                <button
                    class="top-header__icon-btn"
                    title="Мониторинг"
                    on:click=move |_| ctx.open_tab(STOCK_MONITOR, tab_label_for_key(STOCK_MONITOR))
                >
                    {icon("activity")}
                </button>
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_right()
                    title=move || if ctx.right_open.get() { "Скрыть правую панель" } else { "Показать правую панель" }
                >
                    {icon("panel-right")}
                </button>
            </div>
        </div>
    }
}
