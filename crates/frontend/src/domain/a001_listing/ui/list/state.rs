use leptos::prelude::*;

#[derive(Clone, Debug)]
pub struct ListingListState {
    pub sort_field: String,
    pub sort_ascending: bool,
    /// Код статуса; пустая строка означает "все"
    pub status_filter: String,
    pub category_filter: String,
}

impl Default for ListingListState {
    fn default() -> Self {
        Self {
            sort_field: "created_at".to_string(),
            sort_ascending: false,
            status_filter: String::new(),
            category_filter: String::new(),
        }
    }
}

pub fn create_state() -> RwSignal<ListingListState> {
    RwSignal::new(ListingListState::default())
}
