//! Workflow data types.

use serde::{Deserialize, Serialize};

/// Agent of the simulated pipeline.
///
/// Each agent has a relative `weight` that sets its share of the tokens
/// when a prompt is decomposed across the workflow.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Stable ordering key.
    pub id: u32,
    pub name: String,
    pub role: String,
    /// Nominal token allocation (relative, not absolute).
    pub weight: f64,
    /// Presentation only.
    pub color: String,
    #[serde(default)]
    pub description: String,
}

impl Agent {
    pub fn new(id: u32, name: &str, role: &str, weight: f64, color: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            role: role.to_string(),
            weight,
            color: color.to_string(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Sum of the weights of an agent list.
pub fn total_weight(agents: &[Agent]) -> f64 {
    agents.iter().map(|agt| agt.weight).sum()
}

/// Path taken by a single prompt analysis.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum AnalysisMode {
    /// Exact tokenizer count with a proportional per-agent breakdown.
    Exact,
    /// Character-based estimate with the fixed-ratio fallback.
    Estimated,
}

/// Tokens given to one agent by the allocator.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct AgentAllocation {
    pub agent: Agent,
    pub allocated_tokens: u64,
}

/// Result of analyzing one prompt.
///
/// Built fresh by every analysis and never updated in place.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct TokenAnalysis {
    /// Token count of the raw prompt sent as a single request.
    pub monolithic_token_count: u64,
    /// Sum of the per-agent allocations (or the fixed-ratio total when estimated).
    pub agentic_token_count: u64,
    pub per_agent_allocation: Vec<AgentAllocation>,
    /// Reduction shown to the user, never negative.
    pub reduction_percentage: f64,
    /// Unclamped reduction, kept for diagnostics.
    pub raw_reduction_percentage: f64,
    pub tokens_saved: u64,
    pub mode: AnalysisMode,
}

impl TokenAnalysis {
    pub fn is_estimate(&self) -> bool {
        self.mode == AnalysisMode::Estimated
    }

    /// Tokens lost to floor rounding in the proportional breakdown.
    pub fn residual(&self) -> u64 {
        match self.mode {
            AnalysisMode::Exact => self
                .monolithic_token_count
                .saturating_sub(self.agentic_token_count),
            AnalysisMode::Estimated => 0,
        }
    }
}

/// User-built alternate agent list.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub agents: Vec<Agent>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}
