pub mod executor;
pub mod settings;
pub mod worker;

pub use worker::MonitorWorker;
