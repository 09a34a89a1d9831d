//! foon CLI: task-tree retrieval over a FOON knowledge base.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use foon_planner::config::PlannerConfig;
use foon_planner::cost::SuccessRates;
use foon_planner::graph::analytics::summarize;
use foon_planner::graph::parse::load_graph;
use foon_planner::input::read_json;
use foon_planner::kitchen::Kitchen;
use foon_planner::object::ObjectDescription;
use foon_planner::report::{render_unit, render_usages, write_task_tree};
use foon_planner::search::{Planner, Strategy};
use foon_planner::utensil::UtensilSet;

#[derive(Parser)]
#[command(name = "foon", version, about = "Retrieve task trees from a FOON knowledge base")]
struct Cli {
    /// Planner config file (TOML). Flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Input locations shared by the subcommands that read a kitchen.
#[derive(clap::Args)]
struct InputArgs {
    /// FOON graph (`.txt` universal format or `.json`).
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Kitchen items (JSON array of object descriptions).
    #[arg(long)]
    kitchen: Option<PathBuf>,

    /// Utensil labels, one per line.
    #[arg(long)]
    utensils: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan every goal with the chosen strategies and write one report per pair.
    Plan {
        #[command(flatten)]
        inputs: InputArgs,

        /// Goal descriptions (JSON array).
        #[arg(long)]
        goals: Option<PathBuf>,

        /// Motion success rates (`motion<TAB>probability` lines).
        #[arg(long)]
        motion: Option<PathBuf>,

        /// Strategies to run (comma-separated: ids, bfs, astar, mcts). Defaults to all.
        #[arg(long, value_delimiter = ',')]
        strategy: Vec<Strategy>,

        /// Bernoulli trials per MCTS candidate.
        #[arg(long)]
        iterations: Option<u32>,

        /// Seed for reproducible MCTS runs.
        #[arg(long)]
        seed: Option<u64>,

        /// Hard cap on the IDS depth limit.
        #[arg(long)]
        ids_max_depth: Option<usize>,

        /// Directory for report files.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also print the tree units that output each goal.
        #[arg(long)]
        goal_units: bool,
    },

    /// List the units in which each kitchen item and utensil appears.
    Usages {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Show graph statistics: sizes, sinks and production cycles.
    Info {
        /// FOON graph (`.txt` universal format or `.json`).
        #[arg(long)]
        graph: Option<PathBuf>,
    },

    /// Write a default planner config.
    InitConfig {
        /// Destination file.
        #[arg(default_value = "foon.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => Ok(PlannerConfig::load(path)?),
        None => Ok(PlannerConfig::default()),
    }
}

fn apply_inputs(config: &mut PlannerConfig, inputs: InputArgs) {
    if let Some(graph) = inputs.graph {
        config.inputs.graph = graph;
    }
    if let Some(kitchen) = inputs.kitchen {
        config.inputs.kitchen = kitchen;
    }
    if let Some(utensils) = inputs.utensils {
        config.inputs.utensils = utensils;
    }
}

/// Load the rate table if one is configured. A missing default file means
/// every motion falls back to the strategy's default rate.
fn load_rates(config: &PlannerConfig, explicit: bool) -> Result<SuccessRates> {
    match &config.inputs.motion {
        Some(path) if explicit || path.exists() => Ok(SuccessRates::load(path)?),
        Some(path) => {
            tracing::warn!(path = %path.display(), "no success-rate table; using default rates");
            Ok(SuccessRates::new())
        }
        None => Ok(SuccessRates::new()),
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Plan {
            inputs,
            goals,
            motion,
            strategy,
            iterations,
            seed,
            ids_max_depth,
            out_dir,
            goal_units,
        } => {
            apply_inputs(&mut config, inputs);
            if let Some(goals) = goals {
                config.inputs.goals = goals;
            }
            let explicit_motion = motion.is_some();
            if motion.is_some() {
                config.inputs.motion = motion;
            }
            if let Some(iterations) = iterations {
                config.search.iterations = iterations;
            }
            if seed.is_some() {
                config.search.seed = seed;
            }
            if ids_max_depth.is_some() {
                config.search.ids_max_depth = ids_max_depth;
            }
            if let Some(dir) = out_dir {
                config.output.dir = dir;
            }
            let strategies = if strategy.is_empty() {
                Strategy::ALL.to_vec()
            } else {
                strategy
            };

            let graph = load_graph(&config.inputs.graph)?;
            let kitchen = Kitchen::load(&config.inputs.kitchen)?;
            let utensils = UtensilSet::load(&config.inputs.utensils)?;
            let rates = load_rates(&config, explicit_motion)?;
            let goals: Vec<ObjectDescription> = read_json(&config.inputs.goals)?;
            tracing::info!(
                objects = graph.object_count(),
                units = graph.unit_count(),
                kitchen = kitchen.len(),
                utensils = utensils.len(),
                goals = goals.len(),
                "inputs loaded"
            );

            let planner =
                Planner::new(&graph, &kitchen, &utensils, &rates).with_config(config.search.clone())?;
            std::fs::create_dir_all(&config.output.dir).into_diagnostic()?;

            for outcome in planner.plan_goals(&goals, &strategies) {
                let plans = match outcome.plans {
                    Ok(plans) => plans,
                    Err(_) => {
                        println!("{} - Goal node not found", outcome.goal.label);
                        continue;
                    }
                };
                for plan in &plans {
                    let path = write_task_tree(
                        &config.output.dir,
                        &graph,
                        &plan.tree,
                        plan.strategy,
                        &outcome.goal.label,
                    )?;
                    println!(
                        "{} [{}]: {} units -> {}",
                        outcome.goal.label,
                        plan.strategy,
                        plan.tree.len(),
                        path.display()
                    );
                    if goal_units {
                        for id in plan.tree.goal_units(&graph, plan.goal) {
                            println!("{}", render_unit(&graph, graph.unit(id)));
                        }
                    }
                }
            }
        }

        Commands::Usages { inputs } => {
            apply_inputs(&mut config, inputs);
            let graph = load_graph(&config.inputs.graph)?;
            let kitchen = Kitchen::load(&config.inputs.kitchen)?;
            let utensils = UtensilSet::load(&config.inputs.utensils)?;

            for item in kitchen.items() {
                let title = format!("kitchen item: {}", item.label);
                print!("{}", render_usages(&graph, &title, &graph.usages(item)));
            }
            let mut labels: Vec<&str> = utensils.labels().collect();
            labels.sort_unstable();
            for label in labels {
                let title = format!("utensil: {label}");
                print!("{}", render_usages(&graph, &title, &graph.usages_of_label(label)));
            }
        }

        Commands::Info { graph } => {
            if let Some(graph) = graph {
                config.inputs.graph = graph;
            }
            let graph = load_graph(&config.inputs.graph)?;
            println!("{}", summarize(&graph));
        }

        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                miette::bail!(
                    "{} already exists; pass --force to overwrite it",
                    path.display()
                );
            }
            PlannerConfig::default().save(&path)?;
            println!("Wrote default planner config to {}", path.display());
        }
    }

    Ok(())
}
