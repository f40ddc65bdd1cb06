//! Built-in catalog of hosted models and their token prices.

use crate::calc::{Reduction, cost, savings};
use serde::Serialize;

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct ModelPricing {
    pub id: &'static str,
    pub name: &'static str,
    /// USD per million input tokens.
    pub input_cost_per_1m: f64,
    /// USD per million output tokens.
    pub output_cost_per_1m: f64,
    pub context_window: u64,
    pub description: &'static str,
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Provider {
    pub id: &'static str,
    pub name: &'static str,
    pub models: &'static [ModelPricing],
}

/// Model together with the provider it belongs to.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct CatalogModel {
    pub provider_id: &'static str,
    pub provider_name: &'static str,
    pub model: &'static ModelPricing,
}

/// Per-request costs of both approaches on one model.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct ModelComparison {
    pub monolithic_cost: f64,
    pub agentic_cost: f64,
    pub savings: Reduction,
}

const fn model(
    id: &'static str,
    name: &'static str,
    input_cost_per_1m: f64,
    output_cost_per_1m: f64,
    context_window: u64,
    description: &'static str,
) -> ModelPricing {
    ModelPricing {
        id,
        name,
        input_cost_per_1m,
        output_cost_per_1m,
        context_window,
        description,
    }
}

pub const PROVIDERS: &[Provider] = &[
    Provider {
        id: "openai",
        name: "OpenAI",
        models: &[
            model(
                "gpt-4o",
                "GPT-4o",
                2.50,
                10.00,
                128_000,
                "Most capable model, best for complex tasks",
            ),
            model(
                "gpt-4o-mini",
                "GPT-4o Mini",
                0.15,
                0.60,
                128_000,
                "Fast and affordable, great for simple tasks",
            ),
            model(
                "gpt-3.5-turbo",
                "GPT-3.5 Turbo",
                0.50,
                1.50,
                16_385,
                "Legacy model, still cost-effective",
            ),
        ],
    },
    Provider {
        id: "anthropic",
        name: "Anthropic",
        models: &[
            model(
                "claude-3-5-sonnet",
                "Claude 3.5 Sonnet",
                3.00,
                15.00,
                200_000,
                "Highest intelligence, excellent for complex reasoning",
            ),
            model(
                "claude-3-haiku",
                "Claude 3 Haiku",
                0.25,
                1.25,
                200_000,
                "Fastest and most compact, great for simple tasks",
            ),
        ],
    },
    Provider {
        id: "google",
        name: "Google",
        models: &[
            model(
                "gemini-1-5-pro",
                "Gemini 1.5 Pro",
                1.25,
                5.00,
                2_000_000,
                "Massive context window, multimodal capabilities",
            ),
            model(
                "gemini-1-5-flash",
                "Gemini 1.5 Flash",
                0.075,
                0.30,
                1_000_000,
                "Fast and efficient, optimized for speed",
            ),
        ],
    },
    Provider {
        id: "mistral",
        name: "Mistral AI",
        models: &[
            model(
                "mistral-large",
                "Mistral Large",
                2.00,
                6.00,
                128_000,
                "Top-tier performance for complex tasks",
            ),
            model(
                "mistral-small",
                "Mistral Small",
                0.20,
                0.60,
                32_000,
                "Cost-effective for simple tasks",
            ),
        ],
    },
];

pub fn find_provider(provider_id: &str) -> Option<&'static Provider> {
    PROVIDERS.iter().find(|p| p.id == provider_id)
}

pub fn find_model(provider_id: &str, model_id: &str) -> Option<&'static ModelPricing> {
    find_provider(provider_id)?
        .models
        .iter()
        .find(|m| m.id == model_id)
}

pub fn all_models() -> impl Iterator<Item = CatalogModel> + Clone {
    PROVIDERS.iter().flat_map(|provider| {
        provider.models.iter().map(move |model| CatalogModel {
            provider_id: provider.id,
            provider_name: provider.name,
            model,
        })
    })
}

/// Cost of `tokens` on `model`, half input and half output.
pub fn request_cost(model: &ModelPricing, tokens: f64) -> f64 {
    let half = tokens * 0.5;
    cost(half, model.input_cost_per_1m / 1000.0) + cost(half, model.output_cost_per_1m / 1000.0)
}

pub fn compare(
    model: &ModelPricing,
    monolithic_tokens: f64,
    agentic_tokens: f64,
) -> ModelComparison {
    let monolithic_cost = request_cost(model, monolithic_tokens);
    let agentic_cost = request_cost(model, agentic_tokens);
    ModelComparison {
        monolithic_cost,
        agentic_cost,
        savings: savings(monolithic_cost, agentic_cost),
    }
}
