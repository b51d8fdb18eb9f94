use adlens_core::types::ActiveGroup;
use serde::{Deserialize, Serialize};

/// Performance figures reported alongside each match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchMetrics {
    pub ctr: f64,
    pub cvr: f64,
    pub roas: f64,
    pub spend: f64,
    pub purchases: u64,
    pub impressions: u64,
    pub cpm: f64,
    pub clicks: u64,
}

impl MatchMetrics {
    pub fn from_group(group: &ActiveGroup) -> Self {
        let clicks = approx_clicks(group.impressions, group.ctr);
        Self {
            ctr: round_to(group.ctr, 2),
            cvr: conversion_rate(group.purchases, clicks),
            roas: round_to(group.roas, 2),
            spend: round_to(group.spend, 0),
            purchases: group.purchases,
            impressions: group.impressions,
            cpm: round_to(group.cpm, 2),
            clicks,
        }
    }
}

/// Clicks implied by impressions and a percentage CTR, truncated.
pub fn approx_clicks(impressions: u64, ctr_percent: f64) -> u64 {
    if impressions == 0 || ctr_percent.is_nan() || ctr_percent <= 0.0 {
        return 0;
    }
    (impressions as f64 * ctr_percent / 100.0) as u64
}

/// Purchases per click as a percentage, 0 without clicks.
pub fn conversion_rate(purchases: u64, clicks: u64) -> f64 {
    if clicks == 0 {
        return 0.0;
    }
    round_to(purchases as f64 / clicks as f64 * 100.0, 2)
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
