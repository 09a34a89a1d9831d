//! Graph analytics: sinks, production cycles, and backward reachability.
//!
//! The hypergraph is projected onto a plain `petgraph` digraph with one node
//! per object and an edge `output → input` for every (output, input) pair of
//! every unit. Walking that digraph from a goal follows producer links
//! backwards, which is exactly the direction every planner searches in.

use std::collections::BTreeSet;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use crate::object::ObjectId;

use super::index::FoonGraph;
use super::UnitId;

/// Object-level projection of the hypergraph.
pub struct ProductionGraph {
    /// Node `i` is object `i`; edges carry the unit that links them.
    graph: DiGraph<ObjectId, UnitId>,
}

impl ProductionGraph {
    pub fn new(foon: &FoonGraph) -> Self {
        let mut graph = DiGraph::with_capacity(foon.object_count(), foon.unit_count());
        for node in foon.objects() {
            graph.add_node(node.id);
        }
        for unit in foon.units() {
            for &output in &unit.outputs {
                for &input in &unit.inputs {
                    graph.add_edge(
                        NodeIndex::new(output.index()),
                        NodeIndex::new(input.index()),
                        unit.id,
                    );
                }
            }
        }
        Self { graph }
    }

    /// Objects reachable from `goal` by following producer links backwards.
    pub fn upstream_of(&self, goal: ObjectId) -> BTreeSet<ObjectId> {
        let mut seen = BTreeSet::new();
        if goal.index() >= self.graph.node_count() {
            return seen;
        }
        let mut dfs = Dfs::new(&self.graph, NodeIndex::new(goal.index()));
        while let Some(nx) = dfs.next(&self.graph) {
            seen.insert(self.graph[nx]);
        }
        seen
    }

    /// Strongly connected components that form production cycles.
    ///
    /// A component counts if it has more than one object, or a single object
    /// that is an input of one of its own producers.
    pub fn cycles(&self) -> Vec<Vec<ObjectId>> {
        let mut cycles: Vec<Vec<ObjectId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut objects: Vec<ObjectId> = scc.into_iter().map(|nx| self.graph[nx]).collect();
                objects.sort();
                objects
            })
            .collect();
        cycles.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        cycles
    }
}

/// Units that could take part in producing `goal`.
pub fn upstream_units(foon: &FoonGraph, goal: ObjectId) -> BTreeSet<UnitId> {
    ProductionGraph::new(foon)
        .upstream_of(goal)
        .into_iter()
        .flat_map(|object| foon.producers_of(object).iter().copied())
        .collect()
}

/// Objects with no known producer.
pub fn sinks(foon: &FoonGraph) -> Vec<ObjectId> {
    foon.objects()
        .iter()
        .map(|node| node.id)
        .filter(|&id| foon.producers_of(id).is_empty())
        .collect()
}

/// Headline statistics for a loaded graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSummary {
    pub objects: usize,
    pub units: usize,
    pub motions: usize,
    pub sinks: usize,
    pub cyclic_components: usize,
    pub largest_cycle: usize,
}

pub fn summarize(foon: &FoonGraph) -> GraphSummary {
    let cycles = ProductionGraph::new(foon).cycles();
    let motions: BTreeSet<&str> = foon.units().iter().map(|u| u.motion.as_str()).collect();
    GraphSummary {
        objects: foon.object_count(),
        units: foon.unit_count(),
        motions: motions.len(),
        sinks: sinks(foon).len(),
        cyclic_components: cycles.len(),
        largest_cycle: cycles.first().map(Vec::len).unwrap_or(0),
    }
}

impl std::fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "objects:           {}", self.objects)?;
        writeln!(f, "functional units:  {}", self.units)?;
        writeln!(f, "distinct motions:  {}", self.motions)?;
        writeln!(f, "sink objects:      {}", self.sinks)?;
        write!(
            f,
            "production cycles: {} (largest: {} objects)",
            self.cyclic_components, self.largest_cycle
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::object::ObjectDescription;

    fn desc(label: &str) -> ObjectDescription {
        ObjectDescription::new(label)
    }

    #[test]
    fn upstream_follows_producers_only() {
        let mut b = GraphBuilder::new();
        let flour = b.object(desc("flour"));
        let dough = b.object(desc("dough"));
        let bread = b.object(desc("bread"));
        let jam = b.object(desc("jam"));
        let u0 = b.unit(vec![flour], "knead", vec![dough]);
        let u1 = b.unit(vec![dough], "bake", vec![bread]);
        b.unit(vec![jam], "spread", vec![jam]);
        let g = b.build().unwrap();

        let up = ProductionGraph::new(&g).upstream_of(bread);
        assert_eq!(up.into_iter().collect::<Vec<_>>(), vec![flour, dough, bread]);
        assert_eq!(upstream_units(&g, bread).into_iter().collect::<Vec<_>>(), vec![u0, u1]);
    }

    #[test]
    fn detects_self_and_mutual_cycles() {
        let mut b = GraphBuilder::new();
        let a = b.object(desc("a"));
        let c = b.object(desc("c"));
        let d = b.object(desc("d"));
        b.unit(vec![a], "loop", vec![a]);
        b.unit(vec![c], "to-d", vec![d]);
        b.unit(vec![d], "to-c", vec![c]);
        let g = b.build().unwrap();

        let cycles = ProductionGraph::new(&g).cycles();
        assert_eq!(cycles, vec![vec![c, d], vec![a]]);
    }

    #[test]
    fn summary_counts() {
        let mut b = GraphBuilder::new();
        let egg = b.object(desc("egg"));
        let yolk = b.object(desc("yolk"));
        b.unit(vec![egg], "crack", vec![yolk]);
        let g = b.build().unwrap();

        let summary = summarize(&g);
        assert_eq!(summary.objects, 2);
        assert_eq!(summary.units, 1);
        assert_eq!(summary.sinks, 1);
        assert_eq!(summary.cyclic_components, 0);
        assert!(summary.to_string().contains("functional units:  1"));
    }
}
