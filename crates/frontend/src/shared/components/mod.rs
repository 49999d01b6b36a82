//! Общие компоненты страниц: чекбокс строки, баннеры, карточки показателей

pub mod feedback;
pub mod stat_card;
pub mod table_checkbox;

pub use feedback::{EmptyState, ErrorBanner, LoadingIndicator, SuccessBanner};
pub use stat_card::{StatCard, StatTone};
pub use table_checkbox::TableCheckbox;
