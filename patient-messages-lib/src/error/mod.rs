//! Error types

mod config;
mod load;
mod page;

pub use config::*;
pub use load::*;
pub use page::*;
