use crate::achievements;
use crate::allocator::TokenAllocator;
use crate::breakdown::breakdown;
use crate::calc::{cost, savings, token_reduction};
use crate::config::{Config, agents_from_file, check_price};
use crate::model::{Agent, Scenario, TokenAnalysis};
use crate::projection::{ProjectionPoint, Projector};
use crate::providers::{self, CatalogModel, ModelComparison};
use crate::report::{self, CostSummary};
use crate::tokenizer::{Tokenizer, create_tokenizer};
use anyhow::{Context, Result, bail};
use glob::glob;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rmp_serde::{decode, encode};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Owns the workspace directory and the current configuration.
pub struct Manager {
    work_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Result<Self> {
        let work_dir = work_dir.as_ref().to_path_buf();

        let config_file = work_dir.join("config.toml");
        let cfg = if config_file.exists() {
            Config::from_file(&config_file).context("failed to construct cfg")?
        } else {
            log::info!("{config_file:?} not found, using default config");
            Config::default()
        };
        log::debug!("{cfg:#?}");

        Ok(Self { work_dir, cfg })
    }

    /// Write the current configuration to the workspace.
    pub fn init(&self, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(&self.work_dir)
            .with_context(|| format!("failed to create {:?}", self.work_dir))?;

        let config_file = self.work_dir.join("config.toml");
        if config_file.exists() && !force {
            bail!("{config_file:?} already exists");
        }
        self.cfg.to_file(&config_file)?;
        log::info!("wrote {config_file:?}");
        Ok(config_file)
    }

    pub fn price(&self, price: Option<f64>) -> Result<f64> {
        let price = price.unwrap_or(self.cfg.pricing.price_per_thousand);
        check_price(price)?;
        Ok(price)
    }

    pub fn projector(&self, price: f64) -> Projector {
        Projector::new(
            price,
            self.cfg.pricing.monolithic_tokens,
            self.cfg.agentic_tokens(),
        )
    }

    pub fn cost_summary(&self, price: f64) -> CostSummary {
        let monolithic_tokens = self.cfg.pricing.monolithic_tokens;
        let agentic_tokens = self.cfg.agentic_tokens();
        let monolithic_cost = cost(monolithic_tokens as f64, price);
        let agentic_cost = cost(agentic_tokens as f64, price);
        CostSummary {
            price_per_thousand: price,
            monolithic_tokens,
            agentic_tokens,
            monolithic_cost,
            agentic_cost,
            savings: savings(monolithic_cost, agentic_cost),
            token_reduction: token_reduction(monolithic_tokens as f64, agentic_tokens as f64),
        }
    }

    pub fn show_cost(&self, price: Option<f64>) -> Result<()> {
        let price = self.price(price)?;
        print!("{}", report::render_cost(&self.cost_summary(price))?);
        Ok(())
    }

    /// Analyze `text` against the configured agents or a saved scenario.
    pub fn analyze_prompt(
        &self,
        text: &str,
        scenario: Option<usize>,
        exact: bool,
    ) -> Result<TokenAnalysis> {
        let tokenizer = create_tokenizer(exact);
        self.analyze_with(tokenizer.as_ref(), text, scenario)
    }

    fn analyze_with(
        &self,
        tokenizer: &dyn Tokenizer,
        text: &str,
        scenario: Option<usize>,
    ) -> Result<TokenAnalysis> {
        if text.trim().is_empty() {
            bail!("prompt is empty");
        }
        let agents = self.agents(scenario)?;
        let allocator = TokenAllocator::new(tokenizer, &agents);
        allocator
            .analyze(text)
            .context("failed to analyze prompt")
    }

    pub fn show_analysis(
        &self,
        text: &str,
        scenario: Option<usize>,
        price: Option<f64>,
        exact: bool,
    ) -> Result<()> {
        let price = self.price(price)?;
        let analysis = self.analyze_prompt(text, scenario, exact)?;
        print!("{}", report::render_analysis(&analysis)?);

        let monolithic_cost = cost(analysis.monolithic_token_count as f64, price);
        let agentic_cost = cost(analysis.agentic_token_count as f64, price);
        let result = savings(monolithic_cost, agentic_cost);
        println!(
            "  Cost: ${monolithic_cost:.6} -> ${agentic_cost:.6} (saves ${:.6})",
            result.amount
        );
        Ok(())
    }

    pub fn show_projection(&self, price: Option<f64>) -> Result<()> {
        let price = self.price(price)?;
        let projector = self.projector(price);
        let proj = &self.cfg.projection;
        if !projector.monthly(proj.tokens_per_year as f64).defined {
            log::warn!("agentic baseline is zero, projections are undefined");
        }

        let tiers: Vec<_> = projector.tiers(&proj.monthly_scales).collect();
        let years = projector.multi_year(&proj.years, proj.tokens_per_year as f64);
        print!("{}", report::render_projection(&tiers, &years)?);
        Ok(())
    }

    pub fn compare_providers(
        &self,
        provider_id: Option<&str>,
        model_id: Option<&str>,
    ) -> Result<Vec<(CatalogModel, ModelComparison)>> {
        if let Some(id) = provider_id {
            if providers::find_provider(id).is_none() {
                bail!("unknown provider {id:?}");
            }
            if let Some(model_id) = model_id {
                if providers::find_model(id, model_id).is_none() {
                    bail!("unknown model {model_id:?} for provider {id:?}");
                }
            }
        }
        let monolithic_tokens = self.cfg.pricing.monolithic_tokens as f64;
        let agentic_tokens = self.cfg.agentic_tokens() as f64;
        let rows = providers::all_models()
            .filter(|entry| provider_id.is_none_or(|id| entry.provider_id == id))
            .filter(|entry| model_id.is_none_or(|id| entry.model.id == id))
            .map(|entry| {
                let comparison = providers::compare(entry.model, monolithic_tokens, agentic_tokens);
                (entry, comparison)
            })
            .collect();
        Ok(rows)
    }

    pub fn show_providers(&self, provider_id: Option<&str>, model_id: Option<&str>) -> Result<()> {
        let rows = self.compare_providers(provider_id, model_id)?;
        print!("{}", report::render_comparison(&rows)?);
        Ok(())
    }

    pub fn show_breakdown(&self, text: &str, seed: Option<u64>) -> Result<()> {
        let mut rng = match seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::try_from_os_rng()?,
        };
        let tokens = breakdown(text, &mut rng);
        print!("{}", report::render_breakdown(&tokens)?);
        Ok(())
    }

    pub fn show_achievements(&self, monthly_tokens: u64, price: Option<f64>) -> Result<()> {
        let price = self.price(price)?;
        let n_scenarios = self
            .scenario_indices()
            .context("failed to count scenarios")?
            .len();
        let progress = achievements::evaluate(monthly_tokens as f64, price, n_scenarios);
        print!("{}", report::render_achievements(&progress)?);
        Ok(())
    }

    /// Import an agent list from `agents_file` as a new scenario.
    pub fn add_scenario<P: AsRef<Path>>(&self, name: &str, agents_file: P) -> Result<usize> {
        if name.trim().is_empty() {
            bail!("scenario name is empty");
        }
        let agents = agents_from_file(agents_file).context("failed to load agents")?;
        let scenario = Scenario {
            name: name.to_string(),
            agents,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let scenario_dir = self.scenario_dir();
        fs::create_dir_all(&scenario_dir)
            .with_context(|| format!("failed to create {scenario_dir:?}"))?;

        let idx = self
            .scenario_indices()
            .context("failed to list scenarios")?
            .last()
            .map_or(0, |last| last + 1);

        let file = self.scenario_file(idx);
        let writer = File::create(&file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(writer);
        encode::write(&mut writer, &scenario).context("failed to serialize scenario")?;
        writer.flush().context("failed to flush writer stream")?;
        log::info!("saved scenario {:?} to {file:?}", scenario.name);

        Ok(idx)
    }

    pub fn load_scenario(&self, idx: usize) -> Result<Scenario> {
        let file = self.scenario_file(idx);
        let reader = File::open(&file).with_context(|| format!("failed to open {file:?}"))?;
        let mut reader = BufReader::new(reader);
        let scenario: Scenario =
            decode::from_read(&mut reader).context("failed to deserialize scenario")?;
        Ok(scenario)
    }

    pub fn list_scenarios(&self) -> Result<Vec<(usize, Scenario)>> {
        self.scenario_indices()?
            .into_iter()
            .map(|idx| -> Result<(usize, Scenario)> { Ok((idx, self.load_scenario(idx)?)) })
            .collect()
    }

    pub fn remove_scenario(&self, idx: usize) -> Result<()> {
        let file = self.scenario_file(idx);
        fs::remove_file(&file).with_context(|| format!("failed to remove {file:?}"))?;
        log::info!("removed {file:?}");
        Ok(())
    }

    pub fn show_scenarios(&self) -> Result<()> {
        let scenarios = self.list_scenarios()?;
        print!("{}", report::render_scenarios(&scenarios)?);
        Ok(())
    }

    pub fn show_scenario(&self, idx: usize) -> Result<()> {
        let scenario = self.load_scenario(idx)?;
        print!("{}", report::render_scenario(idx, &scenario)?);
        Ok(())
    }

    /// Write the cost summary and projections to `report.csv`.
    pub fn export_report(&self, price: Option<f64>) -> Result<PathBuf> {
        let price = self.price(price)?;
        let projector = self.projector(price);
        let proj = &self.cfg.projection;

        let tiers: Vec<ProjectionPoint> = projector.tiers(&proj.monthly_scales).collect();
        let years: Vec<ProjectionPoint> = projector
            .yearly_points(&proj.years, proj.tokens_per_year as f64)
            .collect();
        let generated = chrono::Utc::now().to_rfc3339();
        let csv = report::csv_report(&self.cost_summary(price), &tiers, &years, &generated)?;

        fs::create_dir_all(&self.work_dir)
            .with_context(|| format!("failed to create {:?}", self.work_dir))?;
        let file = self.work_dir.join("report.csv");
        fs::write(&file, csv).with_context(|| format!("failed to write {file:?}"))?;
        log::info!("exported {file:?}");
        Ok(file)
    }

    fn agents(&self, scenario: Option<usize>) -> Result<Vec<Agent>> {
        match scenario {
            None => Ok(self.cfg.agents.clone()),
            Some(idx) => {
                let scenario = self
                    .load_scenario(idx)
                    .with_context(|| format!("failed to load scenario {idx}"))?;
                log::info!("using scenario {:?}", scenario.name);
                Ok(scenario.agents)
            }
        }
    }

    fn scenario_indices(&self) -> Result<Vec<usize>> {
        let pattern = self.scenario_dir().join("scenario-*.msgpack");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let mut indices: Vec<usize> = glob(pattern)
            .context("failed to glob scenario files")?
            .filter_map(Result::ok)
            .filter_map(|path| {
                path.file_stem()?
                    .to_str()?
                    .strip_prefix("scenario-")?
                    .parse()
                    .ok()
            })
            .collect();
        indices.sort_unstable();
        Ok(indices)
    }

    fn scenario_dir(&self) -> PathBuf {
        self.work_dir.join("scenarios")
    }

    fn scenario_file(&self, idx: usize) -> PathBuf {
        self.scenario_dir()
            .join(format!("scenario-{idx:04}.msgpack"))
    }
}
