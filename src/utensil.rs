//! Utensil-containment filter.
//!
//! A unit often lists both `bowl{flour}` and `flour[bowl]` as inputs: the
//! same thing seen from the utensil's side and from the ingredient's side.
//! When an input is a utensil holding exactly one ingredient and a sibling
//! input is that ingredient sitting in that utensil, the utensil input is not
//! expanded as a separate sub-goal.

use std::collections::HashSet;
use std::path::Path;

use crate::error::LoadResult;
use crate::graph::{FoonGraph, FunctionalUnit};
use crate::input;
use crate::object::ObjectId;

/// Labels that denote utensils.
#[derive(Debug, Clone, Default)]
pub struct UtensilSet {
    labels: HashSet<String>,
}

impl UtensilSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse one label per line; blank lines are ignored.
    pub fn parse(content: &str) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty()),
        )
    }

    pub fn load(path: &Path) -> LoadResult<Self> {
        let set = Self::parse(&input::read_text(path)?);
        tracing::debug!(path = %path.display(), utensils = set.len(), "loaded utensils");
        Ok(set)
    }

    pub fn is_utensil(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether input `slot` of `unit` should be left unexpanded.
    pub fn suppresses(&self, graph: &FoonGraph, unit: &FunctionalUnit, slot: usize) -> bool {
        let Some(&candidate) = unit.inputs.get(slot) else {
            return false;
        };
        let node = graph.object(candidate);
        if !self.is_utensil(node.label()) {
            return false;
        }
        let [ingredient] = node.ingredients() else {
            return false;
        };

        unit.inputs
            .iter()
            .enumerate()
            .filter(|&(idx, _)| idx != slot)
            .map(|(_, &sibling)| graph.object(sibling))
            .any(|sib| sib.label() == ingredient.as_str() && sib.container() == Some(node.label()))
    }

    /// The inputs of `unit` that remain after filtering, in unit order.
    pub fn expandable_inputs(&self, graph: &FoonGraph, unit: &FunctionalUnit) -> Vec<ObjectId> {
        unit.inputs
            .iter()
            .enumerate()
            .filter(|&(slot, _)| !self.suppresses(graph, unit, slot))
            .map(|(_, &id)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, UnitId};
    use crate::object::ObjectDescription;

    fn graph_with_inputs(inputs: Vec<ObjectDescription>) -> FoonGraph {
        let mut b = GraphBuilder::new();
        let ids = inputs.into_iter().map(|d| b.object(d)).collect();
        let out = b.object(ObjectDescription::new("batter"));
        b.unit(ids, "mix", vec![out]);
        b.build().unwrap()
    }

    #[test]
    fn utensil_with_matching_sibling_is_suppressed() {
        let g = graph_with_inputs(vec![
            ObjectDescription::new("bowl").with_ingredients(["flour"]),
            ObjectDescription::new("flour").in_container("bowl"),
        ]);
        let utensils = UtensilSet::new(["bowl"]);
        let unit = g.unit(UnitId(0));

        assert!(utensils.suppresses(&g, unit, 0));
        assert!(!utensils.suppresses(&g, unit, 1));
        assert_eq!(utensils.expandable_inputs(&g, unit), vec![unit.inputs[1]]);
    }

    #[test]
    fn utensil_without_sibling_is_kept() {
        let g = graph_with_inputs(vec![
            ObjectDescription::new("bowl").with_ingredients(["flour"]),
            ObjectDescription::new("flour"),
        ]);
        let utensils = UtensilSet::new(["bowl"]);
        let unit = g.unit(UnitId(0));
        assert!(!utensils.suppresses(&g, unit, 0));
        assert_eq!(utensils.expandable_inputs(&g, unit).len(), 2);
    }

    #[test]
    fn multi_ingredient_utensil_is_kept() {
        let g = graph_with_inputs(vec![
            ObjectDescription::new("bowl").with_ingredients(["flour", "sugar"]),
            ObjectDescription::new("flour").in_container("bowl"),
        ]);
        let utensils = UtensilSet::new(["bowl"]);
        assert!(!utensils.suppresses(&g, g.unit(UnitId(0)), 0));
    }

    #[test]
    fn non_utensil_is_kept() {
        let g = graph_with_inputs(vec![
            ObjectDescription::new("bowl").with_ingredients(["flour"]),
            ObjectDescription::new("flour").in_container("bowl"),
        ]);
        assert!(!UtensilSet::default().suppresses(&g, g.unit(UnitId(0)), 0));
    }

    #[test]
    fn parse_skips_blank_lines() {
        let set = UtensilSet::parse("bowl\n\n  knife \r\n");
        assert_eq!(set.len(), 2);
        assert!(set.is_utensil("knife"));
    }
}
