//! Proportional token allocation across the agents of a workflow.

use crate::calc::token_reduction;
use crate::model::{Agent, AgentAllocation, AnalysisMode, TokenAnalysis, total_weight};
use crate::tokenizer::Tokenizer;

/// Agentic share of the estimate when no exact count is available.
pub const ESTIMATED_AGENTIC_RATIO: f64 = 0.425;
/// Reduction reported for every estimated analysis.
pub const ESTIMATED_REDUCTION_PERCENTAGE: f64 = 57.5;
const CHARS_PER_TOKEN: u64 = 4;
const SHARE_EPSILON: f64 = 1e-9;

/// Token count of a prompt and whether it came from the fallback estimator.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TokenCount {
    pub count: u64,
    pub is_estimate: bool,
}

/// Character-based estimate: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> u64 {
    let n_chars = text.chars().count() as u64;
    n_chars.div_ceil(CHARS_PER_TOKEN)
}

/// Split `count` across `agents` in proportion to their weights.
///
/// Each share is floored and the rounding residual is discarded, so the
/// returned total never exceeds `count`.
pub fn allocate(count: u64, agents: &[Agent]) -> (Vec<AgentAllocation>, u64) {
    let weight_sum = total_weight(agents);
    let allocation: Vec<_> = agents
        .iter()
        .map(|agt| {
            let allocated_tokens = if weight_sum > 0.0 {
                floor_share(count as f64 * agt.weight / weight_sum)
            } else {
                0
            };
            AgentAllocation {
                agent: agt.clone(),
                allocated_tokens,
            }
        })
        .collect();
    let total = allocation.iter().map(|a| a.allocated_tokens).sum();
    (allocation, total)
}

/// Floor a share, treating values within float error of an integer as that integer.
fn floor_share(share: f64) -> u64 {
    let nearest = share.round();
    if (share - nearest).abs() <= SHARE_EPSILON * share.max(1.0) {
        nearest as u64
    } else {
        share.floor() as u64
    }
}

/// Token reduction clamped at zero.
pub fn reduction_percentage(monolithic_count: u64, agentic_total: u64) -> f64 {
    token_reduction(monolithic_count as f64, agentic_total as f64)
        .percentage
        .max(0.0)
}

/// Analyzes prompts against a fixed agent list.
pub struct TokenAllocator<'a> {
    tokenizer: &'a dyn Tokenizer,
    agents: &'a [Agent],
}

impl<'a> TokenAllocator<'a> {
    pub fn new(tokenizer: &'a dyn Tokenizer, agents: &'a [Agent]) -> Self {
        Self { tokenizer, agents }
    }

    /// Count the tokens of `text`, falling back to the estimator on failure.
    pub fn count_tokens(&self, text: &str) -> TokenCount {
        match self.tokenizer.encode(text) {
            Ok(ids) => TokenCount {
                count: ids.len() as u64,
                is_estimate: false,
            },
            Err(error) => {
                log::warn!(
                    "tokenizer {} failed, using character estimate: {error:#}",
                    self.tokenizer.name()
                );
                TokenCount {
                    count: estimate_tokens(text),
                    is_estimate: true,
                }
            }
        }
    }

    /// Analyze `text`, or return `None` if it is blank.
    pub fn analyze(&self, text: &str) -> Option<TokenAnalysis> {
        if text.trim().is_empty() {
            return None;
        }

        let TokenCount { count, is_estimate } = self.count_tokens(text);
        let analysis = if is_estimate {
            self.estimated(count)
        } else {
            self.exact(count)
        };
        log::debug!("{analysis:?}");
        Some(analysis)
    }

    fn exact(&self, count: u64) -> TokenAnalysis {
        let (per_agent_allocation, agentic_total) = allocate(count, self.agents);
        let raw = token_reduction(count as f64, agentic_total as f64).percentage;
        TokenAnalysis {
            monolithic_token_count: count,
            agentic_token_count: agentic_total,
            per_agent_allocation,
            reduction_percentage: reduction_percentage(count, agentic_total),
            raw_reduction_percentage: raw,
            tokens_saved: count.saturating_sub(agentic_total),
            mode: AnalysisMode::Exact,
        }
    }

    fn estimated(&self, count: u64) -> TokenAnalysis {
        let per_agent_allocation = self
            .agents
            .iter()
            .map(|agt| AgentAllocation {
                agent: agt.clone(),
                allocated_tokens: 0,
            })
            .collect();
        TokenAnalysis {
            monolithic_token_count: count,
            agentic_token_count: (count as f64 * ESTIMATED_AGENTIC_RATIO).floor() as u64,
            per_agent_allocation,
            reduction_percentage: ESTIMATED_REDUCTION_PERCENTAGE,
            raw_reduction_percentage: ESTIMATED_REDUCTION_PERCENTAGE,
            tokens_saved: (count as f64 * (1.0 - ESTIMATED_AGENTIC_RATIO)).floor() as u64,
            mode: AnalysisMode::Estimated,
        }
    }
}
