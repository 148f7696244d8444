pub mod client;
pub mod factions;
pub mod query;

pub use client::*;
pub use factions::*;
pub use query::*;
