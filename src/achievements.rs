//! Optimization milestones unlocked from projected monthly savings.

use crate::calc::cost;
use serde::Serialize;

/// Share of monthly usage assumed saved when checking milestones.
const ASSUMED_SAVINGS_RATIO: f64 = 0.6;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Metric {
    TokensSaved,
    MonthlySavings,
    Scenarios,
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub metric: Metric,
    pub threshold: f64,
}

pub const ACHIEVEMENTS: [Achievement; 4] = [
    Achievement {
        id: "token_novice",
        title: "Token Novice",
        description: "Saved your first 1,000 tokens",
        metric: Metric::TokensSaved,
        threshold: 1000.0,
    },
    Achievement {
        id: "cost_cutter",
        title: "Cost Cutter",
        description: "Projected savings of > $100/month",
        metric: Metric::MonthlySavings,
        threshold: 100.0,
    },
    Achievement {
        id: "architect",
        title: "Workflow Architect",
        description: "Created a custom scenario",
        metric: Metric::Scenarios,
        threshold: 1.0,
    },
    Achievement {
        id: "optimizer_elite",
        title: "Optimizer Elite",
        description: "Saved over 1 Million tokens",
        metric: Metric::TokensSaved,
        threshold: 1_000_000.0,
    },
];

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Progress {
    pub achievement: Achievement,
    pub value: f64,
    pub unlocked: bool,
}

/// Check every milestone against one month of usage.
pub fn evaluate(monthly_tokens: f64, price_per_thousand: f64, n_scenarios: usize) -> Vec<Progress> {
    let tokens_saved = monthly_tokens * ASSUMED_SAVINGS_RATIO;
    let monthly_savings = cost(monthly_tokens, price_per_thousand) * ASSUMED_SAVINGS_RATIO;

    ACHIEVEMENTS
        .iter()
        .map(|&achievement| {
            let value = match achievement.metric {
                Metric::TokensSaved => tokens_saved,
                Metric::MonthlySavings => monthly_savings,
                Metric::Scenarios => n_scenarios as f64,
            };
            Progress {
                achievement,
                value,
                unlocked: value >= achievement.threshold,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked(progress: &[Progress]) -> Vec<&'static str> {
        progress
            .iter()
            .filter(|p| p.unlocked)
            .map(|p| p.achievement.id)
            .collect()
    }

    #[test]
    fn nothing_unlocked_without_usage() {
        assert!(unlocked(&evaluate(0.0, 0.002, 0)).is_empty());
    }

    #[test]
    fn token_milestones() {
        assert_eq!(unlocked(&evaluate(10_000.0, 0.002, 0)), vec!["token_novice"]);
        assert_eq!(
            unlocked(&evaluate(2_000_000.0, 0.002, 0)),
            vec!["token_novice", "optimizer_elite"]
        );
    }

    #[test]
    fn savings_and_scenario_milestones() {
        // 100M tokens at $0.002/1K is $200, 60% of which clears $100.
        let progress = evaluate(100_000_000.0, 0.002, 2);
        assert_eq!(
            unlocked(&progress),
            vec!["token_novice", "cost_cutter", "architect", "optimizer_elite"]
        );
        assert!((progress[1].value - 120.0).abs() < 1e-9);
    }
}
