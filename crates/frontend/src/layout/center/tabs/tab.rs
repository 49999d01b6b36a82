use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use leptos::ev;
use leptos::prelude::*;

/// Ярлык таба в панели табов
#[component]
pub fn Tab(tab: TabData) -> impl IntoView {
    let tabs_store = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    let key = StoredValue::new(tab.key.clone());
    let is_active = Memo::new(move |_| tabs_store.active.get().as_deref() == Some(&key.get_value()));
    let title = move || {
        tabs_store.opened.with(|tabs| {
            tabs.iter()
                .find(|t| t.key == key.get_value())
                .map(|t| if t.dirty { format!("{} *", t.title) } else { t.title.clone() })
                .unwrap_or_default()
        })
    };

    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        tabs_store.close_tab(&key.get_value());
    };

    view! {
        <div
            class="tabs__tab"
            class:tabs__tab--active=is_active
            on:click=move |_| tabs_store.activate_tab(&key.get_value())
        >
            <span class="tabs__title">{title}</span>
            <button class="tabs__close" on:click=on_close title="Закрыть">"×"</button>
        </div>
    }
}
