use crate::model::Agent;
use crate::projection::Scale;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Pricing parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Price per 1000 tokens.
    pub price_per_thousand: f64,
    /// Per-request token footprint of the monolithic prompt.
    pub monolithic_tokens: u64,
}

/// Projection parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Monthly usage tiers.
    pub monthly_scales: Vec<Scale>,
    /// Annual usage for the multi-year projection.
    pub tokens_per_year: u64,
    /// Years reported by the multi-year projection.
    pub years: Vec<u32>,
}

/// Workflow configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub pricing: PricingConfig,
    pub agents: Vec<Agent>,
    pub projection: ProjectionConfig,
}

/// Alternate agent list loaded when importing a scenario.
#[derive(Debug, Deserialize)]
struct AgentList {
    agents: Vec<Agent>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pricing: PricingConfig {
                price_per_thousand: 0.002,
                monolithic_tokens: 2000,
            },
            agents: default_agents(),
            projection: ProjectionConfig {
                monthly_scales: vec![
                    Scale::new("1M tokens", 1_000_000),
                    Scale::new("10M tokens", 10_000_000),
                    Scale::new("100M tokens", 100_000_000),
                ],
                tokens_per_year: 500_000_000,
                years: vec![1, 2, 3, 4, 5],
            },
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded and contain a serialized [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Write the configuration to a TOML file.
    pub fn to_file<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let contents = toml::to_string(self).context("failed to serialize config")?;
        fs::write(file, contents).with_context(|| format!("failed to write {file:?}"))?;
        Ok(())
    }

    /// Sum of the agent weights, the agentic per-request footprint.
    pub fn agentic_tokens(&self) -> u64 {
        crate::model::total_weight(&self.agents).round() as u64
    }

    fn validate(&self) -> Result<()> {
        check_price(self.pricing.price_per_thousand)?;
        check_num(self.pricing.monolithic_tokens, 1..100_000_000)
            .context("invalid number of monolithic tokens")?;

        check_agents(&self.agents).context("invalid agents")?;

        let proj = &self.projection;
        check_num(proj.monthly_scales.len(), 1..=16).context("invalid number of scales")?;
        for scale in &proj.monthly_scales {
            check_num(scale.tokens, 1..=u64::MAX / 2)
                .with_context(|| format!("invalid scale {:?}", scale.label))?;
        }
        check_num(proj.tokens_per_year, 1..=u64::MAX / 2)
            .context("invalid number of tokens per year")?;
        check_num(proj.years.len(), 1..=100).context("invalid number of years")?;
        for &year in &proj.years {
            check_num(year, 1..=100).context("invalid year")?;
        }

        Ok(())
    }
}

/// The five-stage pipeline used when no configuration file exists.
pub fn default_agents() -> Vec<Agent> {
    vec![
        Agent::new(1, "Retriever Agent", "Data Fetching", 300.0, "#6366f1").with_description(
            "Retrieves relevant context and documents from the knowledge base",
        ),
        Agent::new(2, "Summarizer Agent", "Content Compression", 250.0, "#8b5cf6")
            .with_description("Condenses retrieved information into concise summaries"),
        Agent::new(3, "Classifier Agent", "Intent Analysis", 150.0, "#10b981")
            .with_description("Categorizes and routes requests to appropriate handlers"),
        Agent::new(4, "Insight Agent", "Pattern Recognition", 100.0, "#f59e0b")
            .with_description("Identifies key patterns and insights from processed data"),
        Agent::new(5, "Final Output Agent", "Response Generation", 50.0, "#ef4444")
            .with_description("Generates the final formatted response"),
    ]
}

/// Load and validate an agent list from a TOML file with `[[agents]]` tables.
pub fn agents_from_file<P: AsRef<Path>>(file: P) -> Result<Vec<Agent>> {
    let file = file.as_ref();
    let contents = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
    let list: AgentList = toml::from_str(&contents).context("failed to deserialize agents")?;
    check_agents(&list.agents).context("invalid agents")?;
    Ok(list.agents)
}

pub fn check_price(price: f64) -> Result<()> {
    check_num(price, 0.0..1000.0).context("invalid price per thousand tokens")
}

pub fn check_agents(agents: &[Agent]) -> Result<()> {
    check_num(agents.len(), 1..=64).context("invalid number of agents")?;
    let mut ids = HashSet::with_capacity(agents.len());
    for agt in agents {
        if !ids.insert(agt.id) {
            bail!("agent id {} is not unique", agt.id);
        }
        if agt.name.trim().is_empty() {
            bail!("agent {} must have a name", agt.id);
        }
        if !agt.weight.is_finite() || agt.weight <= 0.0 {
            bail!("agent {} weight must be positive, but is {}", agt.id, agt.weight);
        }
    }
    Ok(())
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_is_valid() {
        let cfg = Config::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.agentic_tokens(), 850);
    }

    #[test]
    fn round_trips_through_toml_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        let cfg = Config::default();
        cfg.to_file(&file).unwrap();
        let loaded = Config::from_file(&file).unwrap();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn parses_handwritten_config() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("handwritten.toml");
        let contents = String::new()
            + "[pricing]\n"
            + "price_per_thousand = 0.01\n"
            + "monolithic_tokens = 1000\n"
            + "\n"
            + "[[agents]]\n"
            + "id = 1\n"
            + "name = \"Planner\"\n"
            + "role = \"Planning\"\n"
            + "weight = 200.0\n"
            + "color = \"#000000\"\n"
            + "\n"
            + "[projection]\n"
            + "monthly_scales = [ { label = \"1K\", tokens = 1000 } ]\n"
            + "tokens_per_year = 12000\n"
            + "years = [ 1, 2 ]\n";
        fs::write(&file, contents).unwrap();
        let cfg = Config::from_file(&file).unwrap();
        assert_eq!(cfg.agents.len(), 1);
        assert_eq!(cfg.agents[0].description, "");
        assert_eq!(cfg.agentic_tokens(), 200);
        assert_eq!(cfg.projection.monthly_scales[0].tokens, 1000);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut cfg = Config::default();
        cfg.pricing.price_per_thousand = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.agents[1].id = cfg.agents[0].id;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.agents[0].weight = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.agents.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.projection.years = vec![0];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn error_mentions_range() {
        let err = check_num(5, 1..3).unwrap_err();
        assert!(err.to_string().contains("1..3"));
    }
}
