pub mod a001_listing;
pub mod a002_blacklist;
pub mod common;
