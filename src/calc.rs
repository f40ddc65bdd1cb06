//! Token and cost arithmetic.
//!
//! Every function here is pure: identical arguments give bit-identical results.

use serde::Serialize;

/// Difference between a baseline and an optimized figure.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Reduction {
    pub amount: f64,
    /// Percentage of the baseline, `0` when the baseline is zero.
    pub percentage: f64,
}

/// Cost of `tokens` at `price_per_thousand` per 1000 tokens.
pub fn cost(tokens: f64, price_per_thousand: f64) -> f64 {
    (tokens / 1000.0) * price_per_thousand
}

/// Savings of the agentic cost relative to the monolithic cost.
pub fn savings(monolithic_cost: f64, agentic_cost: f64) -> Reduction {
    reduction(monolithic_cost, agentic_cost)
}

/// Token reduction of the agentic count relative to the monolithic count.
pub fn token_reduction(monolithic_tokens: f64, agentic_tokens: f64) -> Reduction {
    reduction(monolithic_tokens, agentic_tokens)
}

fn reduction(base: f64, optimized: f64) -> Reduction {
    let amount = base - optimized;
    let percentage = if base == 0.0 {
        0.0
    } else {
        amount / base * 100.0
    };
    Reduction { amount, percentage }
}

/// Format `amount` as US dollars with two decimals, e.g. `-$1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let digits = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    let sign = if amount < 0.0 && digits.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Format `amount` with thousands grouping and at most three decimals.
pub fn format_number(amount: f64) -> String {
    let digits = format!("{:.3}", amount.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let sign = if amount < 0.0 && digits.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    let grouped = group_thousands(int_part);
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

fn group_thousands(int_part: &str) -> String {
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
