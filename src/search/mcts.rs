//! Statistics-guided producer selection (Monte Carlo rollouts scored by UCB1).
//!
//! Starting at the goal, every object that is neither available nor already
//! resolved picks one producer. Each candidate producer is evaluated by
//! sampling `iterations` Bernoulli trials whose success probability is the
//! unit's motion success rate. The candidate with the highest UCB1 score
//! wins, and the search recurses into its inputs:
//!
//! ```text
//! wins / trials + sqrt(2 ln(total trials) / trials)
//! ```
//!
//! Win/trial counts live in a [`Statistics`] accumulator owned by one
//! top-level search, so evidence gathered early in the rollout informs later
//! choices but never leaks into another planning request.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::graph::{FunctionalUnit, UnitId};
use crate::object::ObjectId;
use crate::tree::TaskTree;

use super::{Plan, SearchConfig, SearchContext, SearchStats, Strategy, TaskTreeSearch};

/// Win/trial counts for one functional unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitStats {
    pub wins: u64,
    pub trials: u64,
}

/// Per-search accumulator of unit statistics.
#[derive(Debug, Clone)]
pub struct Statistics {
    units: Vec<UnitStats>,
    total_trials: u64,
}

impl Statistics {
    pub fn new(unit_count: usize) -> Self {
        Self {
            units: vec![UnitStats::default(); unit_count],
            total_trials: 0,
        }
    }

    pub fn record(&mut self, unit: UnitId, wins: u64, trials: u64) {
        let entry = &mut self.units[unit.index()];
        entry.wins += wins;
        entry.trials += trials;
        self.total_trials += trials;
    }

    pub fn get(&self, unit: UnitId) -> UnitStats {
        self.units[unit.index()]
    }

    pub fn total_trials(&self) -> u64 {
        self.total_trials
    }

    /// UCB1 score of `unit`; an untried unit scores infinitely high.
    pub fn ucb1(&self, unit: UnitId) -> f64 {
        let UnitStats { wins, trials } = self.get(unit);
        if trials == 0 {
            return f64::INFINITY;
        }
        let trials = trials as f64;
        let exploit = wins as f64 / trials;
        let explore = (2.0 * (self.total_trials as f64).ln() / trials).sqrt();
        exploit + explore
    }
}

/// MCTS strategy settings.
#[derive(Debug, Clone, Copy)]
pub struct Mcts {
    /// Bernoulli trials per candidate evaluation.
    pub iterations: u32,
    /// Rate assumed for motions missing from the table.
    pub default_rate: f64,
    /// Seed for the trial RNG; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Mcts {
    fn default() -> Self {
        Self {
            iterations: 1000,
            default_rate: crate::cost::MCTS_DEFAULT_RATE,
            seed: None,
        }
    }
}

impl Mcts {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            iterations: config.iterations.max(1),
            default_rate: config.mcts_default_rate,
            seed: config.seed,
        }
    }

    /// Search with a caller-supplied RNG.
    pub fn search_with_rng<R: Rng>(&self, ctx: &SearchContext<'_>, goal: ObjectId, rng: &mut R) -> Plan {
        let mut rollout = Rollout {
            ctx,
            settings: self,
            rng,
            statistics: Statistics::new(ctx.graph.unit_count()),
            visited: HashSet::new(),
            chosen: HashSet::new(),
            selected: Vec::new(),
            stats: SearchStats::default(),
        };
        rollout.resolve(goal);

        let Rollout {
            selected, mut stats, ..
        } = rollout;
        stats.passes = 1;
        Plan {
            goal,
            strategy: Strategy::Mcts,
            tree: TaskTree::from_discovery(selected),
            stats,
        }
    }
}

impl TaskTreeSearch for Mcts {
    fn strategy(&self) -> Strategy {
        Strategy::Mcts
    }

    fn search(&self, ctx: &SearchContext<'_>, goal: ObjectId) -> Plan {
        let mut rng = match self.seed {
            // Mix in the goal so parallel searches draw different streams.
            Some(seed) => StdRng::seed_from_u64(seed ^ (goal.index() as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => StdRng::from_entropy(),
        };
        self.search_with_rng(ctx, goal, &mut rng)
    }
}

/// State of one top-level MCTS search.
struct Rollout<'s, 'c, R> {
    ctx: &'s SearchContext<'c>,
    settings: &'s Mcts,
    rng: &'s mut R,
    statistics: Statistics,
    /// Objects already resolved; breaks production cycles.
    visited: HashSet<ObjectId>,
    chosen: HashSet<UnitId>,
    selected: Vec<UnitId>,
    stats: SearchStats,
}

impl<R: Rng> Rollout<'_, '_, R> {
    /// Resolve `goal` depth-first, inputs in unit order.
    ///
    /// Pending objects live on an explicit stack, so chain length is bounded
    /// by memory rather than by the thread's call stack.
    fn resolve(&mut self, goal: ObjectId) {
        let graph = self.ctx.graph;
        let mut pending = vec![goal];

        while let Some(object) = pending.pop() {
            if self.ctx.kitchen.is_available(graph.object(object)) {
                self.stats.leaves += 1;
                continue;
            }
            if !self.visited.insert(object) {
                continue;
            }
            self.stats.visited += 1;

            let Some(best) = self.select(graph.producers_of(object)) else {
                self.stats.dead_ends += 1;
                tracing::debug!(object = %object, "no producer; dropping branch");
                continue;
            };
            if !self.chosen.insert(best) {
                continue;
            }
            self.selected.push(best);

            let inputs = self.ctx.expandable_inputs(Strategy::Mcts, graph.unit(best));
            pending.extend(inputs.into_iter().rev());
        }
    }

    /// Evaluate every candidate and return the best UCB1 score (first wins ties).
    fn select(&mut self, candidates: &[UnitId]) -> Option<UnitId> {
        let graph = self.ctx.graph;
        let mut best: Option<(UnitId, f64)> = None;
        for &candidate in candidates {
            let unit = graph.unit(candidate);
            let wins = self.simulate(unit);
            // One evaluation counts as `iterations` trials, keeping wins/trials in [0, 1].
            self.statistics
                .record(candidate, wins, u64::from(self.settings.iterations));
            let score = self.statistics.ucb1(candidate);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((candidate, score));
            }
        }
        best.map(|(unit, _)| unit)
    }

    /// Count successes over `iterations` Bernoulli trials of `unit`'s motion.
    fn simulate(&mut self, unit: &FunctionalUnit) -> u64 {
        let p = self
            .ctx
            .rates
            .rate_or(&unit.motion, self.settings.default_rate);
        if p >= 1.0 {
            return u64::from(self.settings.iterations);
        }
        if !(p > 0.0) {
            return 0;
        }
        (0..self.settings.iterations)
            .filter(|_| self.rng.gen_bool(p))
            .count() as u64
    }
}
