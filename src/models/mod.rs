pub mod openparliament;
pub mod sentence;
pub mod speech;
pub mod summary;

pub use openparliament::*;
pub use sentence::*;
pub use speech::*;
pub use summary::*;
