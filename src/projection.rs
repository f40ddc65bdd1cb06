//! Monthly, annual and multi-year cost projections.
//!
//! Projections assume constant usage and pricing: no compounding, no inflation.

use crate::calc::cost;
use serde::{Deserialize, Serialize};

/// Usage tier a monthly projection is evaluated at.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Scale {
    pub label: String,
    pub tokens: u64,
}

impl Scale {
    pub fn new(label: &str, tokens: u64) -> Self {
        Self {
            label: label.to_string(),
            tokens,
        }
    }
}

/// Costs of the two approaches at one usage level.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Projection {
    /// Requests implied by the agentic per-request footprint.
    pub requests_implied: u64,
    pub monolithic_cost: f64,
    pub agentic_cost: f64,
    pub savings: f64,
    /// False when the agentic baseline is zero and no request count exists.
    pub defined: bool,
}

/// One row of a projection table.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ProjectionPoint {
    pub scale_label: String,
    pub monolithic_cost: f64,
    pub agentic_cost: f64,
    pub savings: f64,
}

/// Cumulative savings after a number of years.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct YearSavings {
    pub year: u32,
    pub cumulative_savings: f64,
}

/// Per-request token footprints and price shared by every projection.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Projector {
    pub price_per_thousand: f64,
    pub monolithic_baseline: u64,
    pub agentic_baseline: u64,
}

impl Projector {
    pub fn new(price_per_thousand: f64, monolithic_baseline: u64, agentic_baseline: u64) -> Self {
        Self {
            price_per_thousand,
            monolithic_baseline,
            agentic_baseline,
        }
    }

    /// Project one month at `tokens_per_month` agentic tokens.
    pub fn monthly(&self, tokens_per_month: f64) -> Projection {
        let agentic_cost = cost(tokens_per_month, self.price_per_thousand);
        if self.agentic_baseline == 0 {
            log::debug!("agentic baseline is zero, monthly projection undefined");
            return Projection {
                requests_implied: 0,
                monolithic_cost: 0.0,
                agentic_cost,
                savings: 0.0,
                defined: false,
            };
        }

        let requests = tokens_per_month / self.agentic_baseline as f64;
        let monolithic_cost = cost(
            requests * self.monolithic_baseline as f64,
            self.price_per_thousand,
        );

        Projection {
            requests_implied: requests.floor() as u64,
            monolithic_cost,
            agentic_cost,
            savings: monolithic_cost - agentic_cost,
            defined: true,
        }
    }

    /// Project one year: twelve months at `tokens_per_year / 12` each.
    pub fn annual(&self, tokens_per_year: f64) -> Projection {
        let monthly = self.monthly(tokens_per_year / 12.0);
        Projection {
            requests_implied: monthly.requests_implied * 12,
            monolithic_cost: monthly.monolithic_cost * 12.0,
            agentic_cost: monthly.agentic_cost * 12.0,
            savings: monthly.savings * 12.0,
            defined: monthly.defined,
        }
    }

    /// Cumulative savings after each of `years`.
    pub fn multi_year(&self, years: &[u32], tokens_per_year: f64) -> Vec<YearSavings> {
        let annual = self.annual(tokens_per_year);
        years
            .iter()
            .map(|&year| YearSavings {
                year,
                cumulative_savings: annual.savings * year as f64,
            })
            .collect()
    }

    /// Monthly projection at each scale, computed lazily.
    pub fn tiers<'a>(
        &'a self,
        scales: &'a [Scale],
    ) -> impl Iterator<Item = ProjectionPoint> + Clone + 'a {
        scales.iter().map(move |scale| {
            let proj = self.monthly(scale.tokens as f64);
            ProjectionPoint {
                scale_label: scale.label.clone(),
                monolithic_cost: proj.monolithic_cost,
                agentic_cost: proj.agentic_cost,
                savings: proj.savings,
            }
        })
    }

    /// Cumulative costs after each of `years`, as table rows.
    pub fn yearly_points<'a>(
        &'a self,
        years: &'a [u32],
        tokens_per_year: f64,
    ) -> impl Iterator<Item = ProjectionPoint> + Clone + 'a {
        let annual = self.annual(tokens_per_year);
        years.iter().map(move |&year| ProjectionPoint {
            scale_label: format!("Year {year}"),
            monolithic_cost: annual.monolithic_cost * year as f64,
            agentic_cost: annual.agentic_cost * year as f64,
            savings: annual.savings * year as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn fixture() -> Projector {
        Projector::new(0.002, 2000, 850)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= TOL * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn monthly_at_one_million_tokens() {
        let proj = fixture().monthly(1_000_000.0);
        assert!(proj.defined);
        assert_eq!(proj.requests_implied, 1176);
        assert!(close(proj.agentic_cost, 2.0));
        assert!(close(proj.monolithic_cost, 1_000_000.0 / 850.0 * 2000.0 / 1000.0 * 0.002));
        assert!(close(proj.savings, proj.monolithic_cost - proj.agentic_cost));
        assert!(proj.savings > 0.0);
    }

    #[test]
    fn annual_is_twelve_months() {
        let projector = fixture();
        for tokens_per_year in [0.0, 12_000.0, 500_000_000.0, 7_777_777.0] {
            let annual = projector.annual(tokens_per_year);
            let monthly = projector.monthly(tokens_per_year / 12.0);
            assert!(close(annual.savings, 12.0 * monthly.savings));
            assert!(close(annual.monolithic_cost, 12.0 * monthly.monolithic_cost));
            assert!(close(annual.agentic_cost, 12.0 * monthly.agentic_cost));
            assert_eq!(annual.requests_implied, 12 * monthly.requests_implied);
        }
    }

    #[test]
    fn multi_year_scales_annual_savings() {
        let projector = fixture();
        let years = [1, 2, 3, 4, 5];
        let annual = projector.annual(500_000_000.0);
        let points = projector.multi_year(&years, 500_000_000.0);
        assert_eq!(points.len(), years.len());
        for (point, &year) in points.iter().zip(years.iter()) {
            assert_eq!(point.year, year);
            assert!(close(point.cumulative_savings, annual.savings * year as f64));
        }
    }

    #[test]
    fn zero_agentic_baseline_is_undefined() {
        let projector = Projector::new(0.002, 2000, 0);
        let proj = projector.monthly(1_000_000.0);
        assert!(!proj.defined);
        assert_eq!(proj.requests_implied, 0);
        assert_eq!(proj.savings, 0.0);
        assert!(proj.agentic_cost.is_finite());
        assert!(!projector.annual(1_000_000.0).defined);
        assert!(
            projector
                .multi_year(&[1, 2], 1_000_000.0)
                .iter()
                .all(|p| p.cumulative_savings == 0.0)
        );
    }

    #[test]
    fn tiers_are_restartable() {
        let projector = fixture();
        let scales = vec![
            Scale::new("1M tokens", 1_000_000),
            Scale::new("10M tokens", 10_000_000),
        ];
        let tiers = projector.tiers(&scales);
        let first: Vec<_> = tiers.clone().collect();
        let second: Vec<_> = tiers.collect();
        assert_eq!(first, second);
        assert_eq!(first[0].scale_label, "1M tokens");
        assert!(close(first[1].agentic_cost, 10.0 * first[0].agentic_cost));
    }

    #[test]
    fn yearly_points_match_multi_year() {
        let projector = fixture();
        let years = [1, 3];
        let savings: Vec<_> = projector
            .yearly_points(&years, 500_000_000.0)
            .map(|p| p.savings)
            .collect();
        let expected: Vec<_> = projector
            .multi_year(&years, 500_000_000.0)
            .iter()
            .map(|p| p.cumulative_savings)
            .collect();
        assert_eq!(savings, expected);
    }

    #[test]
    fn projections_are_idempotent() {
        let projector = fixture();
        assert_eq!(projector.annual(123_456.0), projector.annual(123_456.0));
    }
}
