use std::collections::HashSet;

use adlens_core::config::ReconcilerConfig;
use adlens_core::types::{ActiveGroup, CreativeRecord};
use tracing::{debug, info, warn};

use crate::index::CreativeIndex;
use crate::media::resolve_media;
use crate::metrics::MatchMetrics;
use crate::reconciler::MatchResult;
use crate::strategy::{MatchContext, MatchStrategy, STRATEGIES};

/// Creative ids already assigned to a group during a run.
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    ids: HashSet<String>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the id was already claimed.
    pub fn claim(&mut self, creative_id: &str) -> bool {
        self.ids.insert(creative_id.to_string())
    }

    pub fn is_claimed(&self, creative_id: &str) -> bool {
        self.ids.contains(creative_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One reconciliation pass: the index over the creative pool plus the claims
/// made so far. Groups must be fed through a single session sequentially.
pub struct ReconcileSession<'a> {
    index: CreativeIndex<'a>,
    claims: ClaimSet,
    keywords: &'a [String],
    max_media_refs: usize,
}

impl<'a> ReconcileSession<'a> {
    pub fn new(pool: &'a [CreativeRecord], config: &'a ReconcilerConfig) -> Self {
        Self {
            index: CreativeIndex::build(pool, config.id_prefix_len, config.name_prefix_chars),
            claims: ClaimSet::new(),
            keywords: &config.keywords,
            max_media_refs: config.max_media_refs,
        }
    }

    /// Continue from claims made by an earlier session.
    pub fn with_claims(mut self, claims: ClaimSet) -> Self {
        self.claims = claims;
        self
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    pub fn into_claims(self) -> ClaimSet {
        self.claims
    }

    pub fn index(&self) -> &CreativeIndex<'a> {
        &self.index
    }

    /// Match one group and claim the creative it was given, if any.
    pub fn match_group(&mut self, group: &ActiveGroup) -> MatchResult {
        let found = {
            let ctx = MatchContext {
                index: &self.index,
                claims: &self.claims,
                keywords: self.keywords,
            };
            STRATEGIES
                .iter()
                .find_map(|(strategy, run)| run(group, &ctx).map(|c| (*strategy, c)))
        };

        let metrics = MatchMetrics::from_group(group);
        let targeting = if group.targeting.is_null() {
            serde_json::json!({})
        } else {
            group.targeting.clone()
        };

        let Some((strategy, creative)) = found else {
            warn!(
                adset_id = %group.group_id,
                adset_name = %group.group_name,
                "no creative matched ad set"
            );
            return MatchResult {
                group_id: group.group_id.clone(),
                group_name: group.group_name.clone(),
                matched_creative_id: None,
                matched_by: None,
                ad_id: group.group_id.clone(),
                ad_name: group.group_name.clone(),
                media_refs_resolved: Vec::new(),
                media_found: 0,
                copy_text: String::new(),
                metrics,
                targeting,
            };
        };

        self.claims.claim(&creative.creative_id);
        if strategy == MatchStrategy::IdPrefix {
            info!(
                adset_id = %group.group_id,
                ad_id = %creative.creative_id,
                "ad set matched by id prefix"
            );
        }
        debug!(
            adset_name = %group.group_name,
            ad_name = %creative.creative_name,
            strategy = %strategy,
            "creative matched"
        );

        let media = resolve_media(creative, self.max_media_refs);
        MatchResult {
            group_id: group.group_id.clone(),
            group_name: group.group_name.clone(),
            matched_creative_id: Some(creative.creative_id.clone()),
            matched_by: Some(strategy),
            ad_id: creative.creative_id.clone(),
            ad_name: if creative.creative_name.is_empty() {
                group.group_name.clone()
            } else {
                creative.creative_name.clone()
            },
            media_refs_resolved: media.urls,
            media_found: media.found,
            copy_text: creative.copy_text().to_string(),
            metrics,
            targeting,
        }
    }
}
