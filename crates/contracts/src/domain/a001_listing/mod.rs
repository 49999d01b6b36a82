pub mod aggregate;
pub mod transfer;

pub use aggregate::*;
