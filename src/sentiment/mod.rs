pub mod classifier;
pub mod http;

pub use classifier::*;
pub use http::*;
