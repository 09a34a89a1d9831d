//! Backward-chaining skeleton shared by BFS, IDS and A*.
//!
//! The three strategies differ only in their [`Frontier`] and, for IDS, in an
//! outer deepening loop. Each popped object goes through the same steps:
//! depth bound, revisit guard, kitchen check, producer selection, unit
//! guard, then the unit's (filtered) inputs are queued.

use std::collections::HashSet;

use crate::cost::CostModel;
use crate::graph::UnitId;
use crate::object::ObjectId;
use crate::tree::TaskTree;

use super::frontier::{CostFrontier, DepthFirstFrontier, Entry, FifoFrontier, Frontier};
use super::{Plan, SearchConfig, SearchContext, SearchStats, Strategy, TaskTreeSearch};

/// One traversal of the graph from the goal.
pub(crate) struct Pass {
    /// Selected units in discovery order (goal side first).
    pub selected: Vec<UnitId>,
    /// Entries dropped for exceeding the depth limit.
    pub skipped: usize,
    pub stats: SearchStats,
}

/// Positional producer choice: the first unit listed for the object.
pub(crate) fn first_producer(ctx: &SearchContext<'_>, object: ObjectId) -> Option<UnitId> {
    ctx.graph.producers_of(object).first().copied()
}

/// Run one backward-chaining pass.
pub(crate) fn backward_chain<F: Frontier>(
    ctx: &SearchContext<'_>,
    strategy: Strategy,
    goal: ObjectId,
    mut frontier: F,
    depth_limit: Option<usize>,
    cost: Option<CostModel<'_>>,
) -> Pass {
    let mut selected: Vec<UnitId> = Vec::new();
    let mut chosen: HashSet<UnitId> = HashSet::new();
    let mut skipped = 0;
    let mut stats = SearchStats::default();

    frontier.push(Entry::root(goal));

    while let Some(entry) = frontier.pop() {
        if depth_limit.is_some_and(|limit| entry.depth > limit) {
            skipped += 1;
            continue;
        }
        if !frontier.admit(&entry) {
            continue;
        }
        stats.visited += 1;

        if ctx.kitchen.is_available(ctx.graph.object(entry.object)) {
            stats.leaves += 1;
            continue;
        }

        let Some(unit_id) = first_producer(ctx, entry.object) else {
            stats.dead_ends += 1;
            tracing::debug!(object = %entry.object, "no producer; dropping branch");
            continue;
        };
        if !chosen.insert(unit_id) {
            continue;
        }
        selected.push(unit_id);

        let unit = ctx.graph.unit(unit_id);
        let (g, h) = match cost {
            Some(model) => (entry.cost + model.unit_cost(unit), model.heuristic(unit)),
            None => (entry.cost, 0.0),
        };
        let children = ctx
            .expandable_inputs(strategy, unit)
            .into_iter()
            .map(|object| Entry {
                object,
                depth: entry.depth + 1,
                cost: g,
                priority: g + h,
            })
            .collect();
        frontier.push_children(children);
    }

    stats.passes = 1;
    stats.best_cost = frontier.best_costs();
    Pass {
        selected,
        skipped,
        stats,
    }
}

fn into_plan(goal: ObjectId, strategy: Strategy, pass: Pass) -> Plan {
    Plan {
        goal,
        strategy,
        tree: TaskTree::from_discovery(pass.selected),
        stats: pass.stats,
    }
}

/// Breadth-first search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bfs;

impl TaskTreeSearch for Bfs {
    fn strategy(&self) -> Strategy {
        Strategy::Bfs
    }

    fn search(&self, ctx: &SearchContext<'_>, goal: ObjectId) -> Plan {
        let pass = backward_chain(ctx, Strategy::Bfs, goal, FifoFrontier::new(), None, None);
        into_plan(goal, Strategy::Bfs, pass)
    }
}

/// Iterative deepening.
///
/// Each pass walks depth-first from the goal and drops objects deeper than
/// the current limit. If anything was dropped the whole pass is repeated with
/// a larger limit; the first pass that drops nothing is the answer.
#[derive(Debug, Clone, Copy)]
pub struct Ids {
    pub start_depth: usize,
    pub increment: usize,
    pub max_depth: Option<usize>,
}

impl Default for Ids {
    fn default() -> Self {
        Self {
            start_depth: 0,
            increment: 1,
            max_depth: None,
        }
    }
}

impl Ids {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            start_depth: config.ids_start_depth,
            increment: config.ids_increment.max(1),
            max_depth: config.ids_max_depth,
        }
    }
}

impl TaskTreeSearch for Ids {
    fn strategy(&self) -> Strategy {
        Strategy::Ids
    }

    fn search(&self, ctx: &SearchContext<'_>, goal: ObjectId) -> Plan {
        let mut limit = self.start_depth;
        let mut passes = 0;
        loop {
            let mut pass = backward_chain(
                ctx,
                Strategy::Ids,
                goal,
                DepthFirstFrontier::new(),
                Some(limit),
                None,
            );
            passes += 1;
            tracing::debug!(limit, skipped = pass.skipped, units = pass.selected.len(), "IDS pass");

            let capped = self.max_depth.is_some_and(|max| limit >= max);
            if pass.skipped == 0 || capped {
                if pass.skipped > 0 {
                    tracing::warn!(
                        limit,
                        skipped = pass.skipped,
                        "IDS depth cap reached; returning a partial task tree"
                    );
                }
                pass.stats.passes = passes;
                pass.stats.depth_limit = Some(limit);
                return into_plan(goal, Strategy::Ids, pass);
            }

            limit = match self.max_depth {
                Some(max) => (limit + self.increment).min(max),
                None => limit + self.increment,
            };
        }
    }
}

/// Cost-guided best-first search.
///
/// Expansion order follows `f = g + h`, where `g` accrues `1 / success rate`
/// per unit and `h` is the unit's input count. Producer choice is still the
/// first listed unit.
#[derive(Debug, Clone, Copy)]
pub struct AStar {
    /// Rate assumed for motions missing from the table.
    pub default_rate: f64,
}

impl Default for AStar {
    fn default() -> Self {
        Self {
            default_rate: crate::cost::ASTAR_DEFAULT_RATE,
        }
    }
}

impl AStar {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            default_rate: config.astar_default_rate,
        }
    }
}

impl TaskTreeSearch for AStar {
    fn strategy(&self) -> Strategy {
        Strategy::AStar
    }

    fn search(&self, ctx: &SearchContext<'_>, goal: ObjectId) -> Plan {
        let model = CostModel::new(ctx.rates, self.default_rate);
        let pass = backward_chain(
            ctx,
            Strategy::AStar,
            goal,
            CostFrontier::new(),
            None,
            Some(model),
        );
        into_plan(goal, Strategy::AStar, pass)
    }
}
