use super::tab::Tab as TabComponent;
use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use crate::layout::tabs::TabPage;
use leptos::prelude::*;

/// Панель табов и их контент.
///
/// Ключ `For` совпадает с ключом таба, поэтому переименование таба
/// не пересоздаёт страницу.
#[component]
pub fn Tabs() -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    view! {
        <div class="tabs">
            <div class="tabs__bar">
                <For
                    each=move || tabs_store.opened.get()
                    key=|tab| tab.key.clone()
                    children=move |tab: TabData| view! { <TabComponent tab=tab /> }
                />
            </div>
            <div class="tabs__content">
                <Show
                    when=move || !tabs_store.opened.with(|tabs| tabs.is_empty())
                    fallback=|| view! {
                        <div class="tabs__empty">"Выберите раздел в меню слева"</div>
                    }
                >
                    <For
                        each=move || tabs_store.opened.get()
                        key=|tab| tab.key.clone()
                        children=move |tab: TabData| view! { <TabPage tab=tab tabs_store=tabs_store /> }
                    />
                </Show>
            </div>
        </div>
    }
}
