//! Patient message table core
//!
//! Loads a patient-message record set once per mount, reconciles a
//! caller-owned selection against it, and projects both into render-ready
//! view-models for a table and pager.

pub mod config;
pub mod error;
pub mod model;
pub mod pager;
pub mod presenter;
pub mod selection;
pub mod store;

mod client;
mod source;

pub use client::*;
pub use config::ClientConfig;
pub use error::LoadError;
pub use model::{Record, RecordId, ResponseLatency, Timestamp};
pub use presenter::{Projection, TableView, project};
pub use selection::{SelectionCallbacks, SelectionCoordinator, SelectionIntent};
pub use source::RecordSource;
pub use store::{LoadState, RecordStore};
