//! Task-tree retrieval: four strategies behind one contract.
//!
//! Every strategy solves the same backward-chaining problem. Starting from
//! the goal object, each object is either available in the kitchen (a leaf),
//! a sink (a silent dead end), or expanded through one of its producing
//! units, whose inputs become new sub-goals. The selected units, reversed
//! into production order, form the [`TaskTree`].
//!
//! | Strategy | Frontier | Producer choice |
//! |---|---|---|
//! | [`Bfs`] | FIFO queue | first listed |
//! | [`Ids`] | depth-bounded, deepening | first listed |
//! | [`AStar`] | `f = g + h` priority queue | first listed |
//! | [`Mcts`] | recursive rollout | highest UCB1 score |

pub mod chain;
pub mod frontier;
pub mod mcts;

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cost::{ASTAR_DEFAULT_RATE, MCTS_DEFAULT_RATE, SuccessRates};
use crate::error::{ConfigError, ConfigResult, GraphError};
use crate::graph::{FoonGraph, FunctionalUnit};
use crate::kitchen::Kitchen;
use crate::object::{ObjectDescription, ObjectId};
use crate::tree::TaskTree;
use crate::utensil::UtensilSet;

pub use chain::{AStar, Bfs, Ids};
pub use mcts::{Mcts, UnitStats};

/// Which search strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Bfs,
    Ids,
    AStar,
    Mcts,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [Strategy::Ids, Strategy::Bfs, Strategy::AStar, Strategy::Mcts];

    /// Tag used in report file names.
    pub fn file_tag(self) -> &'static str {
        match self {
            Strategy::Bfs => "BFS",
            Strategy::Ids => "IDS",
            Strategy::AStar => "A_star",
            Strategy::Mcts => "MCTS",
        }
    }

    /// Strategies that ignore success rates.
    pub fn is_uninformed(self) -> bool {
        matches!(self, Strategy::Bfs | Strategy::Ids)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Bfs => write!(f, "bfs"),
            Strategy::Ids => write!(f, "ids"),
            Strategy::AStar => write!(f, "astar"),
            Strategy::Mcts => write!(f, "mcts"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Strategy::Bfs),
            "ids" => Ok(Strategy::Ids),
            "astar" | "a*" | "a_star" => Ok(Strategy::AStar),
            "mcts" => Ok(Strategy::Mcts),
            other => Err(ConfigError::Invalid {
                message: format!("unknown strategy \"{other}\"; expected bfs, ids, astar or mcts"),
            }),
        }
    }
}

/// Which strategies apply the utensil-containment filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterScope {
    /// Every strategy filters.
    #[default]
    All,
    /// Only BFS and IDS filter; A* and MCTS expand every input.
    Uninformed,
}

impl FilterScope {
    pub fn applies_to(self, strategy: Strategy) -> bool {
        match self {
            FilterScope::All => true,
            FilterScope::Uninformed => strategy.is_uninformed(),
        }
    }
}

/// Tuning knobs for the strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Bernoulli trials per MCTS candidate evaluation.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// First IDS depth limit.
    #[serde(default)]
    pub ids_start_depth: usize,
    /// Amount the IDS depth limit grows per pass.
    #[serde(default = "default_ids_increment")]
    pub ids_increment: usize,
    /// Hard cap on the IDS depth limit.
    #[serde(default)]
    pub ids_max_depth: Option<usize>,
    /// Success rate A* assumes for motions missing from the table.
    #[serde(default = "default_astar_rate")]
    pub astar_default_rate: f64,
    /// Success rate MCTS assumes for motions missing from the table.
    #[serde(default = "default_mcts_rate")]
    pub mcts_default_rate: f64,
    #[serde(default)]
    pub utensil_filter: FilterScope,
    /// Seed for reproducible MCTS runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_iterations() -> u32 {
    1000
}
fn default_ids_increment() -> usize {
    1
}
fn default_astar_rate() -> f64 {
    ASTAR_DEFAULT_RATE
}
fn default_mcts_rate() -> f64 {
    MCTS_DEFAULT_RATE
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            ids_start_depth: 0,
            ids_increment: default_ids_increment(),
            ids_max_depth: None,
            astar_default_rate: default_astar_rate(),
            mcts_default_rate: default_mcts_rate(),
            utensil_filter: FilterScope::default(),
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.iterations == 0 {
            return Err(ConfigError::Invalid {
                message: "iterations must be at least 1".into(),
            });
        }
        if self.ids_increment == 0 {
            return Err(ConfigError::Invalid {
                message: "ids_increment must be at least 1".into(),
            });
        }
        if let Some(max) = self.ids_max_depth {
            if max < self.ids_start_depth {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "ids_max_depth ({max}) is below ids_start_depth ({})",
                        self.ids_start_depth
                    ),
                });
            }
        }
        for (name, rate) in [
            ("astar_default_rate", self.astar_default_rate),
            ("mcts_default_rate", self.mcts_default_rate),
        ] {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(ConfigError::Invalid {
                    message: format!("{name} must lie in (0, 1], got {rate}"),
                });
            }
        }
        Ok(())
    }
}

/// Read-only inputs shared by every search.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub graph: &'a FoonGraph,
    pub kitchen: &'a Kitchen,
    pub utensils: &'a UtensilSet,
    pub rates: &'a SuccessRates,
    pub config: &'a SearchConfig,
}

impl<'a> SearchContext<'a> {
    /// Inputs of `unit` that `strategy` should pursue as sub-goals.
    pub fn expandable_inputs(&self, strategy: Strategy, unit: &FunctionalUnit) -> Vec<ObjectId> {
        if self.config.utensil_filter.applies_to(strategy) {
            self.utensils.expandable_inputs(self.graph, unit)
        } else {
            unit.inputs.clone()
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Objects admitted past the revisit guard.
    pub visited: usize,
    /// Objects found in the kitchen.
    pub leaves: usize,
    /// Objects neither available nor producible.
    pub dead_ends: usize,
    /// Full passes run (IDS repeats; others run once).
    pub passes: usize,
    /// Depth limit of the final IDS pass.
    pub depth_limit: Option<usize>,
    /// Best accumulated cost per object (A* only).
    pub best_cost: HashMap<ObjectId, f64>,
}

/// Outcome of planning one goal with one strategy.
#[derive(Debug, Clone)]
pub struct Plan {
    pub goal: ObjectId,
    pub strategy: Strategy,
    pub tree: TaskTree,
    pub stats: SearchStats,
}

/// The shared traversal contract.
pub trait TaskTreeSearch {
    fn strategy(&self) -> Strategy;

    fn search(&self, ctx: &SearchContext<'_>, goal: ObjectId) -> Plan;
}

/// Plans for one goal description across several strategies.
#[derive(Debug)]
pub struct GoalOutcome {
    pub goal: ObjectDescription,
    pub plans: Result<Vec<Plan>, GraphError>,
}

/// Front door: owns the configuration and dispatches to a strategy.
#[derive(Debug, Clone)]
pub struct Planner<'a> {
    graph: &'a FoonGraph,
    kitchen: &'a Kitchen,
    utensils: &'a UtensilSet,
    rates: &'a SuccessRates,
    config: SearchConfig,
}

impl<'a> Planner<'a> {
    pub fn new(
        graph: &'a FoonGraph,
        kitchen: &'a Kitchen,
        utensils: &'a UtensilSet,
        rates: &'a SuccessRates,
    ) -> Self {
        Self {
            graph,
            kitchen,
            utensils,
            rates,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> ConfigResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn graph(&self) -> &'a FoonGraph {
        self.graph
    }

    fn context(&self) -> SearchContext<'_> {
        SearchContext {
            graph: self.graph,
            kitchen: self.kitchen,
            utensils: self.utensils,
            rates: self.rates,
            config: &self.config,
        }
    }

    /// Run `strategy` from an already-resolved goal.
    pub fn plan(&self, goal: ObjectId, strategy: Strategy) -> Plan {
        let ctx = self.context();
        let plan = match strategy {
            Strategy::Bfs => Bfs.search(&ctx, goal),
            Strategy::Ids => Ids::from_config(&self.config).search(&ctx, goal),
            Strategy::AStar => AStar::from_config(&self.config).search(&ctx, goal),
            Strategy::Mcts => Mcts::from_config(&self.config).search(&ctx, goal),
        };
        tracing::info!(
            strategy = %strategy,
            goal = %goal,
            label = self.graph.object(goal).label(),
            units = plan.tree.len(),
            visited = plan.stats.visited,
            dead_ends = plan.stats.dead_ends,
            "task tree retrieved"
        );
        plan
    }

    /// Resolve `goal` and run `strategy` on it.
    pub fn plan_description(&self, goal: &ObjectDescription, strategy: Strategy) -> Result<Plan, GraphError> {
        let id = self.graph.resolve(goal)?;
        Ok(self.plan(id, strategy))
    }

    /// Plan every goal with every strategy, goals in parallel.
    ///
    /// Searches share only read-only inputs; each one owns its visited sets
    /// and statistics. A goal that does not resolve fails on its own.
    pub fn plan_goals(&self, goals: &[ObjectDescription], strategies: &[Strategy]) -> Vec<GoalOutcome> {
        goals
            .par_iter()
            .map(|goal| {
                let plans: Result<Vec<Plan>, GraphError> = self.graph.resolve(goal).map(|id| {
                    strategies.iter().map(|&s| self.plan(id, s)).collect()
                });
                if plans.is_err() {
                    tracing::warn!(label = %goal.label, "goal node not found");
                }
                GoalOutcome {
                    goal: goal.clone(),
                    plans,
                }
            })
            .collect()
    }
}
