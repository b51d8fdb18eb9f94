//! Funnel analysis — session → add to cart → checkout → purchase.

use adlens_core::types::{FunnelRates, Ga4Section};
use adlens_reconciler::metrics::round_to;
use serde::{Deserialize, Serialize};

/// Raw GA4 event counts for each funnel step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelCounts {
    pub sessions: u64,
    pub add_to_cart: u64,
    pub checkouts: u64,
    pub purchases: u64,
}

impl FunnelCounts {
    /// Step conversion and drop-off percentages, rounded to two decimals.
    /// A step with no entrants reports 0 for both.
    pub fn rates(&self) -> FunnelRates {
        FunnelRates {
            session_to_atc: pct(self.add_to_cart, self.sessions),
            atc_to_checkout: pct(self.checkouts, self.add_to_cart),
            checkout_to_purchase: pct(self.purchases, self.checkouts),
            overall_conversion: pct(self.purchases, self.sessions),
            atc_drop_off: drop_off(self.add_to_cart, self.sessions),
            checkout_drop_off: drop_off(self.checkouts, self.add_to_cart),
            purchase_drop_off: drop_off(self.purchases, self.checkouts),
        }
    }
}

impl From<&Ga4Section> for FunnelCounts {
    fn from(ga4: &Ga4Section) -> Self {
        Self {
            sessions: ga4.sessions,
            add_to_cart: ga4.atc,
            checkouts: ga4.ic,
            purchases: ga4.purchases,
        }
    }
}

/// Rates already stored in the report, or computed from its counts.
pub fn effective_rates(ga4: &Ga4Section) -> FunnelRates {
    ga4.funnel_rates
        .unwrap_or_else(|| FunnelCounts::from(ga4).rates())
}

fn pct(completed: u64, entered: u64) -> f64 {
    if entered == 0 {
        return 0.0;
    }
    round_to(completed as f64 / entered as f64 * 100.0, 2)
}

fn drop_off(completed: u64, entered: u64) -> f64 {
    if entered == 0 {
        return 0.0;
    }
    round_to((1.0 - completed as f64 / entered as f64) * 100.0, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let counts = FunnelCounts {
            sessions: 1000,
            add_to_cart: 80,
            checkouts: 20,
            purchases: 5,
        };
        let rates = counts.rates();
        assert_eq!(rates.session_to_atc, 8.0);
        assert_eq!(rates.atc_to_checkout, 25.0);
        assert_eq!(rates.checkout_to_purchase, 25.0);
        assert_eq!(rates.overall_conversion, 0.5);
        assert_eq!(rates.atc_drop_off, 92.0);
        assert_eq!(rates.checkout_drop_off, 75.0);
        assert_eq!(rates.purchase_drop_off, 75.0);
    }

    #[test]
    fn test_zero_denominators() {
        assert_eq!(FunnelCounts::default().rates(), FunnelRates::default());
    }

    #[test]
    fn test_effective_rates_prefers_stored() {
        let stored = FunnelRates {
            overall_conversion: 1.23,
            ..Default::default()
        };
        let ga4 = Ga4Section {
            sessions: 100,
            purchases: 50,
            funnel_rates: Some(stored),
            ..Default::default()
        };
        assert_eq!(effective_rates(&ga4).overall_conversion, 1.23);

        let computed = Ga4Section {
            funnel_rates: None,
            ..ga4
        };
        assert_eq!(effective_rates(&computed).overall_conversion, 50.0);
    }
}
