//! Weekly report analytics — funnel rates, threshold alerts, insights, ad
//! copy extraction, and the AI analysis task handed to downstream agents.

pub mod alerts;
pub mod analysis_task;
pub mod copies;
pub mod funnel;
pub mod insights;
pub mod persistence;
pub mod prompt;

pub use alerts::AlertEngine;
pub use analysis_task::{AnalysisTask, ResultTemplate, TaskFileSet};
pub use copies::extract_ad_copies;
pub use funnel::FunnelCounts;
pub use insights::{generate_weekly_insights, WeeklyInsights};
pub use persistence::{media_object_key, RowKey, UploadPlan};
