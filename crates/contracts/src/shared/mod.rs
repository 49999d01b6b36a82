pub mod dimensions;

pub use dimensions::Dimensions;
