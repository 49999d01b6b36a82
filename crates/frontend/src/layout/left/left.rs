use crate::layout::global_context::AppGlobalContext;
use leptos::prelude::*;

/// Левая зона оболочки; скрывается кнопкой в TopHeader
#[component]
pub fn Left(children: Children) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    view! {
        <div data-zone="left" class="app-sidebar" class:app-sidebar--hidden=move || !ctx.left_open.get()>
            {children()}
        </div>
    }
}
