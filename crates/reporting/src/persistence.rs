//! Storage keys for matched creatives: the row conflict key used when
//! upserting `ad_creatives`, and the object key under which each carousel
//! image is mirrored.

use adlens_reconciler::MatchResult;
use chrono::NaiveDate;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Columns of the upsert conflict target.
pub const ROW_CONFLICT_COLUMNS: &str = "report_date,ad_id";

const URL_HASH_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowKey {
    pub report_date: NaiveDate,
    pub ad_id: String,
}

/// One `ad_creatives` row. Re-running a week overwrites rows with the same key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreativeRow {
    pub report_date: NaiveDate,
    pub ad_id: String,
    pub adset_id: String,
    pub ad_name: String,
    pub image_url: String,
    pub carousel_images: Vec<String>,
    pub spend: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub purchases: u64,
    pub ctr: f64,
    pub roas: f64,
}

impl CreativeRow {
    pub fn from_match(report_date: NaiveDate, m: &MatchResult) -> Self {
        Self {
            report_date,
            ad_id: m.ad_id.clone(),
            adset_id: m.group_id.clone(),
            ad_name: m.ad_name.clone(),
            image_url: m.media_refs_resolved.first().cloned().unwrap_or_default(),
            carousel_images: m.media_refs_resolved.clone(),
            spend: m.metrics.spend,
            impressions: m.metrics.impressions,
            clicks: m.metrics.clicks,
            purchases: m.metrics.purchases,
            ctr: m.metrics.ctr,
            roas: m.metrics.roas,
        }
    }

    pub fn key(&self) -> RowKey {
        RowKey {
            report_date: self.report_date,
            ad_id: self.ad_id.clone(),
        }
    }
}

/// `{week}/{ad_id}_{hash}.jpg`, where `hash` is the first 12 hex chars of the
/// MD5 of the source URL. The same image always lands on the same key, and
/// keys line up with objects already in the bucket.
pub fn media_object_key(week: NaiveDate, ad_id: &str, source_url: &str) -> String {
    let digest = hex::encode(Md5::digest(source_url.as_bytes()));
    format!(
        "{}/{}_{}.jpg",
        week.format("%Y-%m-%d"),
        ad_id,
        &digest[..URL_HASH_LEN]
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaObject {
    pub ad_id: String,
    pub source_url: String,
    pub object_key: String,
}

/// Rows and media objects a storage collaborator would write for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadPlan {
    pub conflict_columns: String,
    pub rows: Vec<CreativeRow>,
    pub objects: Vec<MediaObject>,
}

impl UploadPlan {
    /// Unmatched results carry no ad id and are left out.
    pub fn build(week: NaiveDate, matches: &[MatchResult]) -> Self {
        let mut rows = Vec::new();
        let mut objects = Vec::new();
        for m in matches.iter().filter(|m| m.is_matched()) {
            for url in &m.media_refs_resolved {
                objects.push(MediaObject {
                    ad_id: m.ad_id.clone(),
                    source_url: url.clone(),
                    object_key: media_object_key(week, &m.ad_id, url),
                });
            }
            rows.push(CreativeRow::from_match(week, m));
        }
        Self {
            conflict_columns: ROW_CONFLICT_COLUMNS.to_string(),
            rows,
            objects,
        }
    }
}
