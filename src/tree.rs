//! Task trees: the ordered units a search hands to writers and executors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::graph::analytics::upstream_units;
use crate::graph::{FoonGraph, FunctionalUnit, UnitId};
use crate::object::ObjectId;

/// Duplicate-free sequence of units in production order.
///
/// Searches discover units goal-first; the tree stores them reversed, so a
/// unit precedes the units that consume its outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTree {
    units: Vec<UnitId>,
}

impl TaskTree {
    /// Build from discovery order. Later duplicates are dropped.
    pub fn from_discovery(mut discovered: Vec<UnitId>) -> Self {
        let mut seen = BTreeSet::new();
        discovered.retain(|u| seen.insert(*u));
        discovered.reverse();
        Self { units: discovered }
    }

    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.units.contains(&unit)
    }

    pub fn unit_set(&self) -> BTreeSet<UnitId> {
        self.units.iter().copied().collect()
    }

    /// Resolve ids against the graph they came from.
    pub fn resolve<'g>(&self, graph: &'g FoonGraph) -> impl Iterator<Item = &'g FunctionalUnit> {
        self.units.iter().map(move |&id| graph.unit(id))
    }

    /// Units of the tree whose outputs include `goal`.
    pub fn goal_units(&self, graph: &FoonGraph, goal: ObjectId) -> Vec<UnitId> {
        self.units
            .iter()
            .copied()
            .filter(|&id| graph.unit(id).produces(goal))
            .collect()
    }

    /// Units that cannot contribute to `goal` through producer links.
    ///
    /// Empty for every tree a search returns.
    pub fn orphans(&self, graph: &FoonGraph, goal: ObjectId) -> Vec<UnitId> {
        let upstream = upstream_units(graph, goal);
        self.units
            .iter()
            .copied()
            .filter(|id| !upstream.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::object::ObjectDescription;

    #[test]
    fn discovery_order_is_reversed_and_deduplicated() {
        let tree = TaskTree::from_discovery(vec![UnitId(4), UnitId(2), UnitId(4), UnitId(9)]);
        assert_eq!(tree.units(), &[UnitId(9), UnitId(2), UnitId(4)]);
    }

    #[test]
    fn goal_units_and_orphans() {
        let mut b = GraphBuilder::new();
        let tea = b.object(ObjectDescription::new("tea"));
        let water = b.object(ObjectDescription::new("water").with_states(["hot"]));
        let cold = b.object(ObjectDescription::new("water"));
        let ice = b.object(ObjectDescription::new("ice"));
        let steep = b.unit(vec![water], "steep", vec![tea]);
        let boil = b.unit(vec![cold], "boil", vec![water]);
        let freeze = b.unit(vec![cold], "freeze", vec![ice]);
        let g = b.build().unwrap();

        let tree = TaskTree::from_discovery(vec![steep, boil]);
        assert_eq!(tree.goal_units(&g, tea), vec![steep]);
        assert!(tree.orphans(&g, tea).is_empty());

        let bad = TaskTree::from_discovery(vec![steep, freeze]);
        assert_eq!(bad.orphans(&g, tea), vec![freeze]);
        assert_eq!(bad.resolve(&g).map(|u| u.motion.as_str()).collect::<Vec<_>>(), vec!["freeze", "steep"]);
    }
}
