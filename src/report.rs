//! Plain-text tables and CSV export of computed results.

use crate::achievements::Progress;
use crate::breakdown::PromptToken;
use crate::calc::{Reduction, format_currency, format_number};
use crate::model::{Scenario, TokenAnalysis};
use crate::projection::{ProjectionPoint, YearSavings};
use crate::providers::{CatalogModel, ModelComparison};
use anyhow::Result;
use std::fmt::Write;

const RULE: &str = "─────────────────────────────────────────────────────────────────";

/// Per-request costs of the configured workflow.
pub struct CostSummary {
    pub price_per_thousand: f64,
    pub monolithic_tokens: u64,
    pub agentic_tokens: u64,
    pub monolithic_cost: f64,
    pub agentic_cost: f64,
    pub savings: Reduction,
    pub token_reduction: Reduction,
}

fn section(out: &mut String, title: &str) -> Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

pub fn render_cost(summary: &CostSummary) -> Result<String> {
    let mut out = String::new();
    section(&mut out, "COST PER REQUEST")?;
    writeln!(
        out,
        "  Price per 1K tokens:     {:>14}",
        format!("${}", summary.price_per_thousand)
    )?;
    writeln!(
        out,
        "  Monolithic:              {:>14} tokens  {:>12}",
        format_number(summary.monolithic_tokens as f64),
        format_currency(summary.monolithic_cost)
    )?;
    writeln!(
        out,
        "  Agentic:                 {:>14} tokens  {:>12}",
        format_number(summary.agentic_tokens as f64),
        format_currency(summary.agentic_cost)
    )?;
    writeln!(
        out,
        "  Savings:                 {:>14}         {:>11.1}%",
        format!("${:.4}", summary.savings.amount),
        summary.savings.percentage
    )?;
    writeln!(
        out,
        "  Token reduction:         {:>14} tokens  {:>11.1}%",
        format_number(summary.token_reduction.amount),
        summary.token_reduction.percentage
    )?;
    Ok(out)
}

pub fn render_analysis(analysis: &TokenAnalysis) -> Result<String> {
    let mut out = String::new();
    section(&mut out, "TOKEN ANALYSIS")?;
    if analysis.is_estimate() {
        writeln!(
            out,
            "  Using character-based estimation, exact tokenizer unavailable."
        )?;
    }
    writeln!(
        out,
        "  Monolithic tokens:       {:>14}",
        format_number(analysis.monolithic_token_count as f64)
    )?;
    writeln!(
        out,
        "  Agentic tokens:          {:>14}",
        format_number(analysis.agentic_token_count as f64)
    )?;
    writeln!(
        out,
        "  Tokens saved:            {:>14}",
        format_number(analysis.tokens_saved as f64)
    )?;
    writeln!(
        out,
        "  Token reduction:         {:>13.1}%",
        analysis.reduction_percentage
    )?;

    if !analysis.is_estimate() {
        writeln!(out)?;
        section(&mut out, "AGENTIC BREAKDOWN")?;
        for alloc in &analysis.per_agent_allocation {
            writeln!(
                out,
                "  {:<22} {:<22} {:>10} tokens",
                alloc.agent.name,
                alloc.agent.role,
                format_number(alloc.allocated_tokens as f64)
            )?;
        }
        writeln!(
            out,
            "  Rounding residual:       {:>14}",
            format_number(analysis.residual() as f64)
        )?;
    }
    Ok(out)
}

pub fn render_projection(tiers: &[ProjectionPoint], years: &[YearSavings]) -> Result<String> {
    let mut out = String::new();
    section(&mut out, "MONTHLY PROJECTION")?;
    writeln!(
        out,
        "  {:<16} {:>16} {:>16} {:>16}",
        "Scale", "Monolithic", "Agentic", "Savings"
    )?;
    for point in tiers {
        writeln!(
            out,
            "  {:<16} {:>16} {:>16} {:>16}",
            point.scale_label,
            format_currency(point.monolithic_cost),
            format_currency(point.agentic_cost),
            format_currency(point.savings)
        )?;
    }
    writeln!(out)?;
    section(&mut out, "CUMULATIVE SAVINGS")?;
    for point in years {
        writeln!(
            out,
            "  Year {:<11} {:>16}",
            point.year,
            format_currency(point.cumulative_savings)
        )?;
    }
    Ok(out)
}

pub fn render_comparison(rows: &[(CatalogModel, ModelComparison)]) -> Result<String> {
    let mut out = String::new();
    section(&mut out, "PROVIDER COMPARISON (50/50 input/output split)")?;
    writeln!(
        out,
        "  {:<12} {:<20} {:>12} {:>12} {:>8}",
        "Provider", "Model", "Monolithic", "Agentic", "Savings"
    )?;
    for (entry, comparison) in rows {
        writeln!(
            out,
            "  {:<12} {:<20} {:>12} {:>12} {:>7.1}%",
            entry.provider_name,
            entry.model.name,
            format!("${:.5}", comparison.monolithic_cost),
            format!("${:.5}", comparison.agentic_cost),
            comparison.savings.percentage
        )?;
    }
    Ok(out)
}

pub fn render_breakdown(tokens: &[PromptToken]) -> Result<String> {
    let mut out = String::new();
    section(&mut out, "PROMPT BREAKDOWN")?;
    for token in tokens.iter().filter(|t| !t.text.trim().is_empty()) {
        writeln!(
            out,
            "  {:<7} {:<20} {:<16} {:<15} [{:.2}, {:.2}, ...]",
            token.id,
            token.text,
            token.agent,
            token.kind.label(),
            token.vector[0],
            token.vector[1]
        )?;
    }
    Ok(out)
}

pub fn render_achievements(progress: &[Progress]) -> Result<String> {
    let mut out = String::new();
    section(&mut out, "ACHIEVEMENTS")?;
    for p in progress {
        let mark = if p.unlocked { "[x]" } else { "[ ]" };
        writeln!(
            out,
            "  {mark} {:<20} {}",
            p.achievement.title, p.achievement.description
        )?;
    }
    Ok(out)
}

pub fn render_scenarios(scenarios: &[(usize, Scenario)]) -> Result<String> {
    let mut out = String::new();
    section(&mut out, "SCENARIOS")?;
    if scenarios.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (idx, scenario) in scenarios {
        writeln!(
            out,
            "  {idx:>4}  {:<28} {:>2} agents  {}",
            scenario.name,
            scenario.agents.len(),
            scenario.created_at
        )?;
    }
    Ok(out)
}

pub fn render_scenario(idx: usize, scenario: &Scenario) -> Result<String> {
    let mut out = String::new();
    section(&mut out, &format!("SCENARIO {idx}: {}", scenario.name))?;
    for agt in &scenario.agents {
        writeln!(
            out,
            "  {:>3} {:<22} {:<22} {:>10}",
            agt.id,
            agt.name,
            agt.role,
            format_number(agt.weight)
        )?;
    }
    Ok(out)
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn csv_row(out: &mut String, fields: &[&str]) -> Result<()> {
    let row: Vec<_> = fields.iter().map(|f| csv_field(f)).collect();
    writeln!(out, "{}", row.join(","))?;
    Ok(())
}

fn csv_points(out: &mut String, points: &[ProjectionPoint]) -> Result<()> {
    for point in points {
        csv_row(
            out,
            &[
                &point.scale_label,
                &format!("{:.2}", point.monolithic_cost),
                &format!("{:.2}", point.agentic_cost),
                &format!("{:.2}", point.savings),
            ],
        )?;
    }
    Ok(())
}

/// Cost summary, monthly tiers and yearly totals as CSV.
pub fn csv_report(
    summary: &CostSummary,
    tiers: &[ProjectionPoint],
    years: &[ProjectionPoint],
    generated: &str,
) -> Result<String> {
    let mut out = String::new();
    csv_row(&mut out, &["Agentic Workflow Analysis Report"])?;
    csv_row(&mut out, &[&format!("Generated: {generated}")])?;
    writeln!(out)?;

    csv_row(&mut out, &["Metric", "Monolithic", "Agentic", "Savings"])?;
    csv_row(
        &mut out,
        &[
            "Tokens per Request",
            &summary.monolithic_tokens.to_string(),
            &summary.agentic_tokens.to_string(),
            &format!("{}", summary.token_reduction.amount),
        ],
    )?;
    csv_row(
        &mut out,
        &[
            "Cost per Request",
            &format!("{:.4}", summary.monolithic_cost),
            &format!("{:.4}", summary.agentic_cost),
            &format!("{:.4}", summary.savings.amount),
        ],
    )?;
    csv_row(
        &mut out,
        &[
            "Reduction %",
            "",
            "",
            &format!("{:.1}%", summary.savings.percentage),
        ],
    )?;
    writeln!(out)?;

    csv_row(
        &mut out,
        &[&format!(
            "Monthly Projections (Price per 1K tokens: ${})",
            summary.price_per_thousand
        )],
    )?;
    csv_row(
        &mut out,
        &["Tokens/Month", "Monolithic Cost", "Agentic Cost", "Monthly Savings"],
    )?;
    csv_points(&mut out, tiers)?;

    if !years.is_empty() {
        writeln!(out)?;
        csv_row(&mut out, &["Cumulative Projections"])?;
        csv_row(
            &mut out,
            &["Period", "Monolithic Cost", "Agentic Cost", "Cumulative Savings"],
        )?;
        csv_points(&mut out, years)?;
    }
    Ok(out)
}
