pub mod check;
pub mod list;

pub use list::BlacklistPage;
