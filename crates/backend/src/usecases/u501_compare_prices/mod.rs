pub mod executor;

pub use executor::compare;
