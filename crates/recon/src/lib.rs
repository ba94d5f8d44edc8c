//! `benefits-recon`: benefit enrollment reconciliation engine.
//!
//! Pure engine crate: receives two raw tables, returns one consolidated
//! change report. No CLI or IO dependencies.

pub mod classify;
pub mod cleanse;
pub mod config;
pub mod consolidate;
pub mod engine;
pub mod error;
pub mod mapper;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod schema;
pub mod summary;

pub use config::{CompareConfig, CompareOptions};
pub use engine::run;
pub use error::{ErrorClass, ReconError};
pub use model::{CompareInput, CompareReport, RawTable, ReconResult, ReconSummary, SourceRole};
pub use schema::Schema;
