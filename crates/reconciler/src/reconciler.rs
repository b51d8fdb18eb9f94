use std::collections::BTreeMap;
use std::time::Instant;

use adlens_core::config::ReconcilerConfig;
use adlens_core::types::{ActiveGroup, CreativeRecord};
use adlens_core::ReportResult;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::metrics::MatchMetrics;
use crate::session::ReconcileSession;
use crate::strategy::MatchStrategy;

/// The creative chosen for one spending ad set. An absent match is a normal
/// outcome; identifiers then fall back to the ad set's own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub group_id: String,
    pub group_name: String,
    pub matched_creative_id: Option<String>,
    pub matched_by: Option<MatchStrategy>,
    pub ad_id: String,
    pub ad_name: String,
    pub media_refs_resolved: Vec<String>,
    pub media_found: usize,
    pub copy_text: String,
    pub metrics: MatchMetrics,
    pub targeting: serde_json::Value,
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        self.matched_creative_id.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub by_strategy: BTreeMap<MatchStrategy, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileOutput {
    pub results: Vec<MatchResult>,
    pub summary: ReconcileSummary,
}

/// Maps spending ad sets to creatives. Holds configuration only; every call
/// to [`Reconciler::reconcile`] starts from an empty claim set.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    /// Replace the keyword list used by the last-resort strategy.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn session<'a>(&'a self, pool: &'a [CreativeRecord]) -> ReconcileSession<'a> {
        ReconcileSession::new(pool, &self.config)
    }

    /// Run a fresh reconciliation over `groups` and `pool`.
    pub fn reconcile(
        &self,
        groups: &[ActiveGroup],
        pool: &[CreativeRecord],
    ) -> ReportResult<ReconcileOutput> {
        let mut session = self.session(pool);
        self.reconcile_in(&mut session, groups)
    }

    /// Run against an existing session, keeping its claims.
    ///
    /// Groups without an id are rejected before any matching. Groups without
    /// spend are dropped. Results come back ordered by descending spend.
    pub fn reconcile_in(
        &self,
        session: &mut ReconcileSession<'_>,
        groups: &[ActiveGroup],
    ) -> ReportResult<ReconcileOutput> {
        let start = Instant::now();
        for group in groups {
            group.validate()?;
        }

        let mut scored: Vec<(f64, MatchResult)> = groups
            .iter()
            .filter(|g| g.is_spending())
            .map(|g| (g.spend, session.match_group(g)))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        let results: Vec<MatchResult> = scored.into_iter().map(|(_, r)| r).collect();

        let summary = summarize(&results);
        info!(
            adsets = groups.len(),
            spending = summary.total,
            matched = summary.matched,
            unmatched = summary.unmatched,
            creatives = session.index().len(),
            latency_us = start.elapsed().as_micros() as u64,
            "reconciliation complete"
        );

        Ok(ReconcileOutput { results, summary })
    }
}

fn summarize(results: &[MatchResult]) -> ReconcileSummary {
    let mut summary = ReconcileSummary {
        total: results.len(),
        ..Default::default()
    };
    for result in results {
        match result.matched_by {
            Some(strategy) => {
                summary.matched += 1;
                *summary.by_strategy.entry(strategy).or_default() += 1;
            }
            None => summary.unmatched += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use adlens_core::ReportError;

    fn group(id: &str, name: &str, spend: f64) -> ActiveGroup {
        ActiveGroup {
            group_id: id.into(),
            group_name: name.into(),
            spend,
            ..Default::default()
        }
    }

    fn creative(id: &str, name: &str) -> CreativeRecord {
        CreativeRecord {
            creative_id: id.into(),
            creative_name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_cascade_order() {
        let groups = vec![
            group("A123456789012", "X", 100.0),
            group("B123456789012_set", "Y", 90.0),
            group("C1", "Autumn_sale_broad", 80.0),
            group("D1", "LM retarget", 70.0),
            group("E1", "nothing in common", 60.0),
        ];
        let pool = vec![
            creative("A123456789012", "unrelated"),
            creative("B123456789012_ad", "other"),
            creative("c-ad", "Autumn_sale_carousel"),
            creative("d-ad", "LM bundle"),
        ];

        let output = Reconciler::default().reconcile(&groups, &pool).unwrap();
        let by: Vec<_> = output.results.iter().map(|r| r.matched_by).collect();
        assert_eq!(
            by,
            vec![
                Some(MatchStrategy::ExactId),
                Some(MatchStrategy::IdPrefix),
                Some(MatchStrategy::NameSimilarity),
                Some(MatchStrategy::Keyword),
                None,
            ]
        );
        assert_eq!(output.summary.matched, 4);
        assert_eq!(output.summary.unmatched, 1);
        assert_eq!(output.summary.by_strategy[&MatchStrategy::Keyword], 1);
        assert_eq!(output.results[4].ad_name, "nothing in common");
    }

    #[test]
    fn test_missing_group_id_rejected() {
        let groups = vec![group("A", "ok", 10.0), group("  ", "bad", 10.0)];
        let err = Reconciler::default().reconcile(&groups, &[]).unwrap_err();
        assert!(matches!(err, ReportError::Validation(_)));
    }

    #[test]
    fn test_custom_keywords_override_defaults() {
        let groups = vec![group("G1", "candle promo", 10.0)];
        let pool = vec![creative("c1", "candle carousel")];

        let default = Reconciler::default().reconcile(&groups, &pool).unwrap();
        assert!(!default.results[0].is_matched());

        let custom = Reconciler::default()
            .with_keywords(["candle"])
            .reconcile(&groups, &pool)
            .unwrap();
        assert_eq!(custom.results[0].matched_creative_id.as_deref(), Some("c1"));
    }

    #[test]
    fn test_summary_serializes_strategy_keys() {
        let groups = vec![group("A1", "x", 1.0)];
        let pool = vec![creative("A1", "x")];
        let output = Reconciler::default().reconcile(&groups, &pool).unwrap();
        let json = serde_json::to_value(&output.summary).unwrap();
        assert_eq!(json["by_strategy"]["exact_id"], 1);
    }
}
