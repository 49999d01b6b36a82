pub mod amazon;
pub mod config;
pub mod data;
pub mod format;
pub mod pricing;
