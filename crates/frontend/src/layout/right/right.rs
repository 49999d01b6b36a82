use crate::layout::global_context::AppGlobalContext;
use leptos::prelude::*;

/// Правая зона оболочки; по умолчанию скрыта
#[component]
pub fn Right(children: Children) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    view! {
        <div data-zone="right" class="right-panel" class:right-panel--hidden=move || !ctx.right_open.get()>
            {children()}
        </div>
    }
}
