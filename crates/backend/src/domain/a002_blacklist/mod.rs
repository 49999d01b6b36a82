pub mod defaults;
pub mod error;
pub mod matcher;
pub mod repository;
pub mod service;
