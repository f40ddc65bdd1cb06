mod achievements;
mod allocator;
mod breakdown;
mod calc;
mod config;
mod manager;
mod model;
mod projection;
mod providers;
mod report;
mod tokenizer;

use crate::manager::Manager;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::{fs, path::PathBuf};

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct Prompt {
    #[arg(long)]
    text: Option<String>,

    #[arg(long)]
    file: Option<PathBuf>,
}

impl Prompt {
    fn read(self) -> Result<String> {
        match (self.text, self.file) {
            (Some(text), _) => Ok(text),
            (None, Some(file)) => {
                fs::read_to_string(&file).with_context(|| format!("failed to read {file:?}"))
            }
            (None, None) => Ok(String::new()),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    Init {
        #[arg(long)]
        force: bool,
    },

    Cost {
        #[arg(long)]
        price: Option<f64>,
    },

    Analyze {
        #[command(flatten)]
        prompt: Prompt,

        #[arg(long)]
        scenario: Option<usize>,

        #[arg(long)]
        price: Option<f64>,

        /// Skip the exact tokenizer and use the character estimate.
        #[arg(long)]
        estimate: bool,
    },

    Project {
        #[arg(long)]
        price: Option<f64>,
    },

    Providers {
        #[arg(long)]
        provider: Option<String>,

        #[arg(long, requires = "provider")]
        model: Option<String>,
    },

    Breakdown {
        #[command(flatten)]
        prompt: Prompt,

        #[arg(long)]
        seed: Option<u64>,
    },

    Achievements {
        #[arg(long)]
        monthly_tokens: u64,

        #[arg(long)]
        price: Option<f64>,
    },

    Scenario {
        #[command(subcommand)]
        command: ScenarioCommand,
    },

    Export {
        #[arg(long)]
        price: Option<f64>,
    },
}

#[derive(Debug, Subcommand)]
enum ScenarioCommand {
    Add {
        #[arg(long)]
        name: String,

        /// TOML file with `[[agents]]` tables.
        #[arg(long)]
        agents: PathBuf,
    },

    List,

    Show {
        #[arg(long)]
        idx: usize,
    },

    Remove {
        #[arg(long)]
        idx: usize,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::debug!("{args:#?}");

    let mgr = Manager::new(&args.work_dir).context("failed to construct mgr")?;

    match args.command {
        Command::Init { force } => {
            mgr.init(force)?;
        }
        Command::Cost { price } => mgr.show_cost(price)?,
        Command::Analyze {
            prompt,
            scenario,
            price,
            estimate,
        } => {
            let text = prompt.read()?;
            mgr.show_analysis(&text, scenario, price, !estimate)?
        }
        Command::Project { price } => mgr.show_projection(price)?,
        Command::Providers { provider, model } => {
            mgr.show_providers(provider.as_deref(), model.as_deref())?
        }
        Command::Breakdown { prompt, seed } => {
            let text = prompt.read()?;
            mgr.show_breakdown(&text, seed)?
        }
        Command::Achievements {
            monthly_tokens,
            price,
        } => mgr.show_achievements(monthly_tokens, price)?,
        Command::Scenario { command } => match command {
            ScenarioCommand::Add { name, agents } => {
                let idx = mgr.add_scenario(&name, &agents)?;
                println!("{idx}");
            }
            ScenarioCommand::List => mgr.show_scenarios()?,
            ScenarioCommand::Show { idx } => mgr.show_scenario(idx)?,
            ScenarioCommand::Remove { idx } => mgr.remove_scenario(idx)?,
        },
        Command::Export { price } => {
            mgr.export_report(price)?;
        }
    }

    Ok(())
}
