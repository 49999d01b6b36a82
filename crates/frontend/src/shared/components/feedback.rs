use leptos::prelude::*;
use thaw::*;

/// Баннер ошибки; ничего не рисует, пока сообщения нет
#[component]
pub fn ErrorBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|msg| {
            view! {
                <div class="alert alert--error" role="alert">
                    <span class="alert__icon">"⚠"</span>
                    <span class="alert__text">{msg}</span>
                </div>
            }
        })
    }
}

#[component]
pub fn SuccessBanner(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    move || {
        message.get().map(|msg| {
            view! {
                <div class="alert alert--success" role="status">
                    <span class="alert__text">{msg}</span>
                </div>
            }
        })
    }
}

#[component]
pub fn LoadingIndicator(#[prop(optional, into)] text: Option<String>) -> impl IntoView {
    view! {
        <div class="loading">
            <Space gap=SpaceGap::Small>
                <Spinner />
                <span>{text.unwrap_or_else(|| "Загрузка...".to_string())}</span>
            </Space>
        </div>
    }
}

/// Пустое состояние таблицы или списка
#[component]
pub fn EmptyState(#[prop(into)] text: String) -> impl IntoView {
    view! { <div class="empty-state">{text}</div> }
}
