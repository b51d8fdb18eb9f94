//! Creative reconciliation — maps each spending ad set to the creative record
//! that best describes it, using a cascade of best-effort matching strategies.

pub mod index;
pub mod media;
pub mod metrics;
pub mod reconciler;
pub mod session;
pub mod strategy;

pub use adlens_core::config::DEFAULT_MATCH_KEYWORDS;
pub use index::CreativeIndex;
pub use reconciler::{MatchResult, ReconcileOutput, ReconcileSummary, Reconciler};
pub use session::{ClaimSet, ReconcileSession};
pub use strategy::MatchStrategy;
