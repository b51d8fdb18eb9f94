//! Shared building blocks for the adlens workspace: configuration, the error
//! taxonomy, and the weekly report document that every stage reads.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{ReportError, ReportResult};
