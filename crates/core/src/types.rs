use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ReportError, ReportResult};

/// The weekly report document produced by the fetch stage
/// (`report_data_{start_date}.json`). Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: MetaSection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta_efficiency: MetaEfficiency,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta_adsets: Vec<ActiveGroup>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ad_creatives: Vec<CreativeRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ga4: Ga4Section,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cyberbiz: CyberbizSection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wow: WeekOverWeek,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,
}

impl ReportData {
    pub fn is_weekly(&self) -> bool {
        self.mode.as_deref() == Some("weekly")
    }

    /// Storage folder and output file key: the first day of the window,
    /// today when the report has none.
    pub fn week(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Date the analysis is filed under: the last day of the window, today
    /// when the report has none.
    pub fn report_date(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Reject ad sets without an identifier before any matching happens.
    pub fn validate(&self) -> ReportResult<()> {
        for (idx, group) in self.meta_adsets.iter().enumerate() {
            group
                .validate()
                .map_err(|e| ReportError::Validation(format!("meta_adsets[{idx}]: {e}")))?;
        }
        Ok(())
    }
}

/// An ad set with its performance for the reporting window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveGroup {
    #[serde(
        rename = "adset_id",
        alias = "id",
        default,
        deserialize_with = "null_as_default"
    )]
    pub group_id: String,
    #[serde(
        rename = "adset_name",
        alias = "name",
        default,
        deserialize_with = "null_as_default"
    )]
    pub group_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spend: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clicks: u64,
    /// Click-through rate as a percentage.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ctr: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purchases: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roas: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpm: f64,
    #[serde(default)]
    pub targeting: serde_json::Value,
}

impl ActiveGroup {
    pub fn validate(&self) -> ReportResult<()> {
        if self.group_id.trim().is_empty() {
            return Err(ReportError::Validation(format!(
                "ad set {:?} has no identifier",
                self.group_name
            )));
        }
        Ok(())
    }

    pub fn is_spending(&self) -> bool {
        self.spend > 0.0
    }
}

/// An ad creative as stored by the fetch stage. Several records may exist for
/// the same logical ad across reporting periods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreativeRecord {
    #[serde(
        rename = "ad_id",
        alias = "id",
        default,
        deserialize_with = "null_as_default"
    )]
    pub creative_id: String,
    #[serde(
        rename = "ad_name",
        alias = "name",
        default,
        deserialize_with = "null_as_default"
    )]
    pub creative_name: String,
    #[serde(rename = "body", default)]
    pub body_text: Option<String>,
    #[serde(rename = "title", default)]
    pub title_text: Option<String>,
    #[serde(
        rename = "carousel_images",
        alias = "media_items",
        default,
        deserialize_with = "null_as_default"
    )]
    pub media_refs: Vec<MediaItem>,
    /// Carousel URLs already copied to object storage.
    #[serde(
        rename = "supabase_carousel_urls",
        alias = "resolved_media_urls",
        default,
        deserialize_with = "null_as_default"
    )]
    pub resolved_media_urls: Vec<MediaItem>,
    #[serde(rename = "image_url", alias = "fallback_image_url", default)]
    pub fallback_image_url: Option<String>,
    #[serde(rename = "supabase_image_url", alias = "resolved_image_url", default)]
    pub resolved_image_url: Option<String>,
    #[serde(flatten)]
    pub performance: CreativePerformance,
}

impl CreativeRecord {
    pub fn has_body(&self) -> bool {
        non_empty(self.body_text.as_deref()).is_some()
    }

    pub fn has_media(&self) -> bool {
        !self.media_refs.is_empty()
    }

    /// A record with copy or carousel media is preferred over a bare one.
    pub fn is_rich(&self) -> bool {
        self.has_body() || self.has_media()
    }

    /// Body copy, then title, then nothing.
    pub fn copy_text(&self) -> &str {
        non_empty(self.body_text.as_deref())
            .or_else(|| non_empty(self.title_text.as_deref()))
            .unwrap_or("")
    }
}

/// A carousel entry: either a bare URL or a card object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaItem {
    Url(String),
    Card(MediaCard),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaCard {
    #[serde(alias = "url", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl MediaItem {
    pub fn url(&self) -> Option<&str> {
        match self {
            MediaItem::Url(url) => non_empty(Some(url)),
            MediaItem::Card(card) => non_empty(card.image_url.as_deref()),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            MediaItem::Url(_) => None,
            MediaItem::Card(card) => non_empty(card.description.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreativePerformance {
    #[serde(default, deserialize_with = "null_as_default")]
    pub spend: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub clicks: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purchases: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ctr: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpm: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roas: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpa: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub conv_value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaSection {
    #[serde(default)]
    pub total: Option<MetaTotals>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaTotals {
    #[serde(default, deserialize_with = "null_as_default")]
    pub spend: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roas: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaEfficiency {
    #[serde(default, deserialize_with = "null_as_default")]
    pub cpm: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub frequency: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reach: u64,
}

/// GA4 totals: session and funnel-step counts plus precomputed rates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ga4Section {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sessions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub atc: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ic: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purchases: u64,
    #[serde(default)]
    pub funnel_rates: Option<FunnelRates>,
}

/// Funnel step conversion and drop-off percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelRates {
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_to_atc: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub atc_to_checkout: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checkout_to_purchase: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_conversion: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub atc_drop_off: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checkout_drop_off: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purchase_drop_off: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CyberbizSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub aov: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_revenue: f64,
}

/// Week-over-week percentage changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekOverWeek {
    #[serde(default)]
    pub meta_roas_change: Option<f64>,
    #[serde(default)]
    pub cyber_revenue_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub severity: AlertSeverity,
    pub category: String,
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Caution,
    Warning,
    Critical,
}

/// `null` deserializes to the field's default, the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
