//! AI analysis task — the request file handed to the content-analysis agent,
//! plus the per-ad skeletons and result template it fills in.
//!
//! One entry per spending ad set. Carousel images of an ad are analysed
//! together, never as separate creatives.

use std::path::{Path, PathBuf};

use adlens_core::config::AnalysisLocale;
use adlens_core::types::ReportData;
use adlens_reconciler::metrics::MatchMetrics;
use adlens_reconciler::MatchResult;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::copies::copy_id;
use crate::insights::WeeklyInsights;
use crate::prompt;

pub const TASK_TYPE: &str = "weekly_ai_analysis";

/// One ad queued for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEntry {
    pub ad_id: String,
    pub adset_id: String,
    pub ad_name: String,
    pub carousel_images: Vec<String>,
    pub image_count: usize,
    pub is_carousel: bool,
    pub metrics: MatchMetrics,
    pub copy: String,
    pub targeting: serde_json::Value,
}

impl From<&MatchResult> for AnalysisEntry {
    fn from(m: &MatchResult) -> Self {
        Self {
            ad_id: m.ad_id.clone(),
            adset_id: m.group_id.clone(),
            ad_name: m.ad_name.clone(),
            carousel_images: m.media_refs_resolved.clone(),
            image_count: m.media_found,
            is_carousel: m.media_found > 1,
            metrics: m.metrics,
            copy: m.copy_text.clone(),
            targeting: m.targeting.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisTask {
    pub task_id: Uuid,
    pub task_type: String,
    pub report_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub total_ads: usize,
    pub creatives: Vec<AnalysisEntry>,
    pub analysis_instructions: String,
    pub output_format: serde_json::Value,
}

impl AnalysisTask {
    /// Task for a report, filed under the last day of its window.
    pub fn for_report(report: &ReportData, matches: &[MatchResult]) -> Option<Self> {
        Self::from_matches(report.report_date(), matches)
    }

    /// Build a task from reconciler output. No spending ads means no task.
    pub fn from_matches(report_date: NaiveDate, matches: &[MatchResult]) -> Option<Self> {
        if matches.is_empty() {
            return None;
        }
        let creatives: Vec<AnalysisEntry> = matches.iter().map(AnalysisEntry::from).collect();
        Some(Self {
            task_id: Uuid::new_v4(),
            task_type: TASK_TYPE.to_string(),
            report_date,
            generated_at: Utc::now(),
            total_ads: creatives.len(),
            creatives,
            analysis_instructions: prompt::instructions(AnalysisLocale::default()).to_string(),
            output_format: prompt::output_format(AnalysisLocale::default()),
        })
    }

    /// Swap the instructions and output schema for another language.
    pub fn localized(mut self, locale: AnalysisLocale) -> Self {
        self.analysis_instructions = prompt::instructions(locale).to_string();
        self.output_format = prompt::output_format(locale);
        self
    }
}

/// Vision scores left empty for the analysis agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisionSlots {
    pub composition_score: Option<u8>,
    pub brand_consistency: Option<u8>,
    pub attractiveness_score: Option<u8>,
    pub cta_effectiveness: Option<u8>,
    pub color_scheme: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeAnalysis {
    pub creative_id: String,
    pub ad_id: String,
    pub ad_name: String,
    pub image_url: String,
    pub carousel_images: Vec<String>,
    pub is_carousel: bool,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub purchases: u64,
    pub ctr: f64,
    pub roas: f64,
    pub ai_analysis: VisionSlots,
}

/// Copy scores left empty for the analysis agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopySlots {
    pub headline_score: Option<u8>,
    pub pain_point_score: Option<u8>,
    pub benefit_score: Option<u8>,
    pub cta_score: Option<u8>,
    pub tone: String,
    pub emotional_triggers: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggested_improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyAnalysis {
    pub copy_id: String,
    pub ad_id: String,
    pub ad_name: String,
    pub primary_text: String,
    pub headline: String,
    pub description: String,
    pub spend: f64,
    pub clicks: u64,
    pub purchases: u64,
    pub ai_analysis: CopySlots,
}

pub fn creative_analysis_skeletons(entries: &[AnalysisEntry]) -> Vec<CreativeAnalysis> {
    entries
        .iter()
        .map(|e| CreativeAnalysis {
            creative_id: e.ad_id.clone(),
            ad_id: e.ad_id.clone(),
            ad_name: e.ad_name.clone(),
            image_url: e.carousel_images.first().cloned().unwrap_or_default(),
            carousel_images: e.carousel_images.clone(),
            is_carousel: e.is_carousel,
            spend: e.metrics.spend,
            impressions: e.metrics.impressions,
            clicks: e.metrics.clicks,
            purchases: e.metrics.purchases,
            ctr: e.metrics.ctr,
            roas: e.metrics.roas,
            ai_analysis: VisionSlots::default(),
        })
        .collect()
}

/// Entries without copy have nothing to analyse and are skipped.
pub fn copy_analysis_skeletons(entries: &[AnalysisEntry]) -> Vec<CopyAnalysis> {
    entries
        .iter()
        .filter(|e| !e.copy.is_empty())
        .map(|e| CopyAnalysis {
            copy_id: copy_id(&e.ad_id),
            ad_id: e.ad_id.clone(),
            ad_name: e.ad_name.clone(),
            primary_text: e.copy.clone(),
            headline: String::new(),
            description: String::new(),
            spend: e.metrics.spend,
            clicks: e.metrics.clicks,
            purchases: e.metrics.purchases,
            ai_analysis: CopySlots::default(),
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub best_performing: Option<String>,
    pub best_targeting: Option<String>,
    pub key_insights: Vec<String>,
    pub targeting_insights: Vec<String>,
    pub next_week_recommendations: Vec<String>,
}

/// Placeholder result document completed by the analysis agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultTemplate {
    pub task_id: Uuid,
    pub report_date: NaiveDate,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub ad_creatives: Vec<CreativeAnalysis>,
    pub ad_copies: Vec<CopyAnalysis>,
    pub weekly_insights: WeeklyInsights,
    pub overall_success_factors: Vec<String>,
    pub overall_failure_factors: Vec<String>,
    pub priority_improvements: Vec<String>,
    pub summary: ResultSummary,
}

impl ResultTemplate {
    pub fn new(
        task: &AnalysisTask,
        ad_creatives: Vec<CreativeAnalysis>,
        ad_copies: Vec<CopyAnalysis>,
        weekly_insights: WeeklyInsights,
    ) -> Self {
        Self {
            task_id: task.task_id,
            report_date: task.report_date,
            analyzed_at: None,
            ad_creatives,
            ad_copies,
            weekly_insights,
            overall_success_factors: Vec::new(),
            overall_failure_factors: Vec::new(),
            priority_improvements: Vec::new(),
            summary: ResultSummary::default(),
        }
    }
}

/// Output paths for one week's analysis files, keyed by the week start so
/// parallel runs for different weeks never overwrite each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFileSet {
    pub task: PathBuf,
    pub insights: PathBuf,
    pub creatives: PathBuf,
    pub copies: PathBuf,
    pub result: PathBuf,
}

impl TaskFileSet {
    pub fn for_week(dir: &Path, start_date: NaiveDate) -> Self {
        let d = start_date.format("%Y-%m-%d");
        Self {
            task: dir.join(format!("ai_analysis_task_{d}.json")),
            insights: dir.join(format!("weekly_insights_{d}.json")),
            creatives: dir.join(format!("ad_creatives_{d}.json")),
            copies: dir.join(format!("ad_copies_{d}.json")),
            result: dir.join(format!("ai_analysis_result_{d}.json")),
        }
    }

    pub fn with_task_path(mut self, task: PathBuf) -> Self {
        self.task = task;
        self
    }

    pub fn all(&self) -> [&Path; 5] {
        [
            &self.task,
            &self.insights,
            &self.creatives,
            &self.copies,
            &self.result,
        ]
    }
}
