//! Weekly insights — highlights, warnings and recommendations derived from the
//! report totals and its alerts.

use adlens_core::types::{ActiveGroup, AlertSeverity, ReportData};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::funnel::effective_rates;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyInsights {
    pub week_start: Option<NaiveDate>,
    pub week_end: Option<NaiveDate>,
    pub highlights: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn generate_weekly_insights(report: &ReportData) -> WeeklyInsights {
    let mut insights = WeeklyInsights {
        week_start: report.start_date,
        week_end: report.end_date,
        ..Default::default()
    };

    let roas = report.meta.total.as_ref().map_or(0.0, |m| m.roas);
    let freq = report.meta_efficiency.frequency;
    let cpm = report.meta_efficiency.cpm;
    let roas_change = report.wow.meta_roas_change;

    // Highlights
    if roas >= 3.0 {
        insights
            .highlights
            .push(format!("ROAS is excellent ({roas:.2}); ad spend is paying back well"));
    } else if roas >= 2.0 {
        insights
            .highlights
            .push(format!("ROAS is steady ({roas:.2}); ads are performing well"));
    }

    let aov = report.cyberbiz.aov;
    if aov >= 1500.0 {
        insights
            .highlights
            .push(format!("Average order value is strong (${aov:.0}); premium products are selling"));
    }

    if let Some(change) = roas_change.filter(|c| *c > 10.0) {
        insights
            .highlights
            .push(format!("ROAS up {change:.1}% week over week"));
    }
    if let Some(change) = report.wow.cyber_revenue_change.filter(|c| *c > 15.0) {
        insights
            .highlights
            .push(format!("Revenue up {change:.1}% week over week"));
    }

    // first ad set wins ties
    let best = report.meta_adsets.iter().fold(None, |best: Option<&ActiveGroup>, g| match best {
        Some(b) if b.roas >= g.roas => Some(b),
        _ => Some(g),
    });
    if let Some(best) = best.filter(|b| b.roas >= 3.0) {
        let name: String = best.group_name.chars().take(30).collect();
        insights.highlights.push(format!(
            "Best ad set \"{name}\" reached ROAS {:.2}",
            best.roas
        ));
    }

    // Warnings
    let mut frequency_flagged = false;
    for alert in &report.alerts {
        if matches!(alert.severity, AlertSeverity::Warning | AlertSeverity::Critical) {
            frequency_flagged |= alert.metric == "frequency";
            insights.warnings.push(alert.message.clone());
        }
    }
    if freq > 2.0 && !frequency_flagged {
        insights.warnings.push(format!(
            "Ad frequency is elevated ({freq:.1}); watch for creative fatigue"
        ));
    }
    if let Some(change) = roas_change.filter(|c| *c < -15.0) {
        insights.warnings.push(format!(
            "ROAS down {:.1}% week over week; review ad performance",
            change.abs()
        ));
    }

    // Recommendations
    if freq > 2.5 {
        insights
            .recommendations
            .push("Rotate creatives or widen the audience to reduce repeat exposure".to_string());
    }
    if cpm > 300.0 {
        insights
            .recommendations
            .push("Tighten audience targeting to bring CPM down".to_string());
    }
    if roas > 0.0 && roas < 2.0 {
        insights
            .recommendations
            .push("Test new creatives and copy to lift conversion".to_string());
    }
    if effective_rates(&report.ga4).checkout_drop_off > 60.0 {
        insights
            .recommendations
            .push("Streamline checkout to reduce cart abandonment".to_string());
    }
    if insights.recommendations.is_empty() {
        insights
            .recommendations
            .push("Keep the current delivery strategy and keep monitoring results".to_string());
    }

    insights
}
