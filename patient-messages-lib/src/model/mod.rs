//! Typed models

mod latency;
mod record;
mod timestamp;

pub use latency::*;
pub use record::*;
pub use timestamp::*;
