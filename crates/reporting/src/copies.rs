use adlens_core::types::CreativeRecord;
use serde::{Deserialize, Serialize};

/// One ad's copy with its performance, as stored in the `ad_copies` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdCopy {
    pub copy_id: String,
    pub ad_id: String,
    pub ad_name: String,
    pub primary_text: String,
    pub headline: String,
    pub description: String,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub purchases: u64,
    pub ctr: f64,
    pub cpm: f64,
    pub roas: f64,
    pub cpa: f64,
    pub conv_value: f64,
}

pub fn copy_id(ad_id: &str) -> String {
    format!("copy_{ad_id}")
}

/// Copy rows for every creative, highest spend first. The description comes
/// from the first carousel card that has one.
pub fn extract_ad_copies(creatives: &[CreativeRecord]) -> Vec<AdCopy> {
    let mut copies: Vec<AdCopy> = creatives
        .iter()
        .map(|c| {
            let perf = &c.performance;
            AdCopy {
                copy_id: copy_id(&c.creative_id),
                ad_id: c.creative_id.clone(),
                ad_name: c.creative_name.clone(),
                primary_text: c.body_text.clone().unwrap_or_default(),
                headline: c.title_text.clone().unwrap_or_default(),
                description: c
                    .media_refs
                    .iter()
                    .find_map(|m| m.description())
                    .unwrap_or_default()
                    .to_string(),
                spend: perf.spend,
                impressions: perf.impressions,
                clicks: perf.clicks,
                purchases: perf.purchases,
                ctr: perf.ctr,
                cpm: perf.cpm,
                roas: perf.roas,
                cpa: perf.cpa,
                conv_value: perf.conv_value,
            }
        })
        .collect();

    copies.sort_by(|a, b| b.spend.total_cmp(&a.spend));
    copies
}
