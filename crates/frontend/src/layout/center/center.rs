use leptos::prelude::*;

/// Центральная зона оболочки
#[component]
pub fn Center(children: Children) -> impl IntoView {
    view! {
        <div data-zone="center" class="app-tabs">
            {children()}
        </div>
    }
}
