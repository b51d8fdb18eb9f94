//! Threshold alerts surfaced at the top of the weekly report.

use adlens_core::config::AlertThresholds;
use adlens_core::types::{Alert, AlertSeverity, ReportData};
use tracing::debug;

use crate::funnel::effective_rates;

const META_ADS: &str = "Meta Ads";
const GA4: &str = "GA4";
const STOREFRONT: &str = "Cyberbiz";

pub struct AlertEngine {
    thresholds: AlertThresholds,
}

impl AlertEngine {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    pub fn evaluate(&self, report: &ReportData) -> Vec<Alert> {
        let t = &self.thresholds;
        let mut alerts = Vec::new();

        let freq = report.meta_efficiency.frequency;
        if freq > t.frequency_warning {
            alerts.push(alert(
                AlertSeverity::Warning,
                META_ADS,
                format!("Ad frequency is high ({freq:.1}); audiences may be fatigued, rotate creatives or widen targeting"),
                "frequency",
                freq,
                t.frequency_warning,
            ));
        } else if freq > t.frequency_caution {
            alerts.push(alert(
                AlertSeverity::Caution,
                META_ADS,
                format!("Ad frequency is elevated ({freq:.1}); watch for creative fatigue"),
                "frequency",
                freq,
                t.frequency_caution,
            ));
        }

        let cpm = report.meta_efficiency.cpm;
        if cpm > t.cpm_warning {
            alerts.push(alert(
                AlertSeverity::Warning,
                META_ADS,
                format!("CPM is high (${cpm:.0}); review audience targeting or bidding strategy"),
                "cpm",
                cpm,
                t.cpm_warning,
            ));
        } else if cpm > t.cpm_caution {
            alerts.push(alert(
                AlertSeverity::Caution,
                META_ADS,
                format!("CPM is elevated (${cpm:.0}); keep an eye on traffic cost"),
                "cpm",
                cpm,
                t.cpm_caution,
            ));
        }

        let roas = report.meta.total.as_ref().map_or(0.0, |m| m.roas);
        if roas > 0.0 && roas < t.roas_floor {
            alerts.push(alert(
                AlertSeverity::Warning,
                META_ADS,
                format!("ROAS is low ({roas:.2}); ads may be losing money, review creatives and audiences"),
                "roas",
                roas,
                t.roas_floor,
            ));
        }

        let funnel = effective_rates(&report.ga4);
        let conversion = funnel.overall_conversion;
        if conversion > 0.0 && conversion < t.conversion_floor {
            alerts.push(alert(
                AlertSeverity::Warning,
                GA4,
                format!("Site conversion rate is low ({conversion:.2}%); check the purchase flow for blockers"),
                "conversion_rate",
                conversion,
                t.conversion_floor,
            ));
        }

        let checkout_drop = funnel.checkout_drop_off;
        if checkout_drop > t.checkout_drop_off {
            alerts.push(alert(
                AlertSeverity::Warning,
                GA4,
                format!("Checkout drop-off is high ({checkout_drop:.1}%); review the checkout page and payment options"),
                "checkout_drop_off",
                checkout_drop,
                t.checkout_drop_off,
            ));
        }

        if report.cyberbiz.order_count == 0 {
            alerts.push(alert(
                AlertSeverity::Critical,
                STOREFRONT,
                "No orders recorded; check the storefront and ad delivery immediately".to_string(),
                "order_count",
                0.0,
                1.0,
            ));
        }

        debug!(count = alerts.len(), "alerts evaluated");
        alerts
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(AlertThresholds::default())
    }
}

fn alert(
    severity: AlertSeverity,
    category: &str,
    message: String,
    metric: &str,
    value: f64,
    threshold: f64,
) -> Alert {
    Alert {
        severity,
        category: category.to_string(),
        message,
        metric: metric.to_string(),
        value,
        threshold,
    }
}
