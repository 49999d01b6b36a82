//! Боковое меню со сворачиваемыми группами

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_labels::*;
use crate::shared::icons::icon;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    /// (ключ таба, иконка)
    items: Vec<(&'static str, &'static str)>,
}

fn menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "catalog",
            label: "Каталог",
            icon: "package",
            items: vec![(LISTINGS, "package"), (BLACKLIST, "ban")],
        },
        MenuGroup {
            id: "research",
            label: "Исследование",
            icon: "search",
            items: vec![(COMPARE_PRICES, "search"), (PROFIT_CALCULATOR, "calculator")],
        },
        MenuGroup {
            id: "operations",
            label: "Операции",
            icon: "layers",
            items: vec![(STOCK_MONITOR, "activity")],
        },
    ]
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let expanded_groups = RwSignal::new(
        menu_groups()
            .iter()
            .map(|g| g.id.to_string())
            .collect::<Vec<_>>(),
    );

    let toggle_group = move |gid: &'static str| {
        expanded_groups.update(|items| {
            if let Some(pos) = items.iter().position(|x| x == gid) {
                items.remove(pos);
            } else {
                items.push(gid.to_string());
            }
        });
    };

    view! {
        <div class="app-sidebar__content">
            {menu_groups().into_iter().map(|group| {
                let gid = group.id;
                let is_expanded = move || expanded_groups.get().iter().any(|g| g == gid);
                view! {
                    <div class="app-sidebar__group">
                        <div class="app-sidebar__item" on:click=move |_| toggle_group(gid)>
                            <div class="app-sidebar__item-content">
                                {icon(group.icon)}
                                <span>{group.label}</span>
                            </div>
                            <div class="app-sidebar__chevron" class:app-sidebar__chevron--expanded=is_expanded>
                                {icon("chevron-right")}
                            </div>
                        </div>
                        <Show when=is_expanded>
                            <div class="app-sidebar__children">
                                {group.items.clone().into_iter().map(|(key, icon_name)| {
                                    let label = tab_label_for_key(key);
                                    view! {
                                        <div
                                            class="app-sidebar__item"
                                            class:app-sidebar__item--active=move || ctx.active.get().as_deref() == Some(key)
                                            on:click=move |_| ctx.open_tab(key, label)
                                        >
                                            <div class="app-sidebar__item-content">
                                                {icon(icon_name)}
                                                <span>{label}</span>
                                            </div>
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        </Show>
                    </div>
                }
            }).collect_view()}
        </div>
    }
}
