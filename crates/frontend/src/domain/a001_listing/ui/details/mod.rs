//! Карточка листинга (MVVM): форма и API в `model`, состояние и команды
//! в `view_model`, разметка в `view`.

pub mod model;
pub mod view;
pub mod view_model;

pub use view::ListingDetails;
