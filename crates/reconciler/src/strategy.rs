//! Matching strategies, ordered from most to least reliable.
//!
//! Every strategy is a plain function over the group, the index and the
//! current claim set. All of them are heuristics: the id-prefix rule relies on
//! an undocumented coincidence in the ad platform's id scheme, and the name and
//! keyword rules accept false positives.

use adlens_core::types::{ActiveGroup, CreativeRecord};
use serde::{Deserialize, Serialize};

use crate::index::CreativeIndex;
use crate::session::ClaimSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    ExactId,
    IdPrefix,
    NameSimilarity,
    Keyword,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::ExactId => "exact_id",
            MatchStrategy::IdPrefix => "id_prefix",
            MatchStrategy::NameSimilarity => "name_similarity",
            MatchStrategy::Keyword => "keyword",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a strategy may look at while matching one group.
pub struct MatchContext<'s, 'a> {
    pub index: &'s CreativeIndex<'a>,
    pub claims: &'s ClaimSet,
    pub keywords: &'s [String],
}

impl<'s, 'a> MatchContext<'s, 'a> {
    fn available(&self, creative: &'a CreativeRecord) -> Option<&'a CreativeRecord> {
        (!self.claims.is_claimed(&creative.creative_id)).then_some(creative)
    }
}

pub type StrategyFn =
    for<'s, 'a> fn(&ActiveGroup, &MatchContext<'s, 'a>) -> Option<&'a CreativeRecord>;

/// The cascade, tried in order; the first hit wins.
pub const STRATEGIES: [(MatchStrategy, StrategyFn); 4] = [
    (MatchStrategy::ExactId, exact_id),
    (MatchStrategy::IdPrefix, id_prefix),
    (MatchStrategy::NameSimilarity, name_similarity),
    (MatchStrategy::Keyword, keyword),
];

pub fn exact_id<'a>(group: &ActiveGroup, ctx: &MatchContext<'_, 'a>) -> Option<&'a CreativeRecord> {
    ctx.index.get(&group.group_id).and_then(|c| ctx.available(c))
}

pub fn id_prefix<'a>(group: &ActiveGroup, ctx: &MatchContext<'_, 'a>) -> Option<&'a CreativeRecord> {
    ctx.index
        .get_by_id_prefix(&group.group_id)
        .and_then(|c| ctx.available(c))
}

pub fn name_similarity<'a>(
    group: &ActiveGroup,
    ctx: &MatchContext<'_, 'a>,
) -> Option<&'a CreativeRecord> {
    let name = group.group_name.as_str();
    if name.is_empty() {
        return None;
    }
    let prefix = ctx.index.name_prefix_of(name);

    ctx.index
        .name_prefixes()
        .filter(|(key, creative)| {
            key.contains(prefix.as_str())
                || prefix.contains(key)
                || creative.creative_name.contains(name)
                || name.contains(creative.creative_name.as_str())
        })
        .find_map(|(_, creative)| ctx.available(creative))
}

pub fn keyword<'a>(group: &ActiveGroup, ctx: &MatchContext<'_, 'a>) -> Option<&'a CreativeRecord> {
    let name = group.group_name.as_str();
    let shared: Vec<&str> = ctx
        .keywords
        .iter()
        .map(String::as_str)
        .filter(|kw| !kw.is_empty() && name.contains(kw))
        .collect();
    if shared.is_empty() {
        return None;
    }

    ctx.index
        .records()
        .filter(|creative| !ctx.claims.is_claimed(&creative.creative_id))
        .find(|creative| shared.iter().any(|kw| creative.creative_name.contains(kw)))
}
