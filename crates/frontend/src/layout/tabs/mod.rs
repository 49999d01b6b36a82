//! Табы центральной области
//!
//! - `page`: обёртка контента таба
//! - `registry`: ключ таба → View
//! - `tab_labels`: ключи и заголовки табов

pub mod page;
pub mod registry;
pub mod tab_labels;

pub use page::TabPage;
pub use tab_labels::{detail_tab_label, listing_detail_key, tab_label_for_key};
