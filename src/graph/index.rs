//! In-memory FOON index.
//!
//! Holds the object table, the unit table and two derived maps: object →
//! producing units and object → consuming units. Ids are plain positions,
//! so every lookup during search is a slice index.

use std::collections::HashMap;

use crate::error::GraphError;
use crate::object::{ObjectDescription, ObjectId, ObjectKey, ObjectNode};

use super::{FunctionalUnit, UnitId, UnitSpec};

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Units in which an object appears.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Usages {
    /// Units that take the object as an input.
    pub as_input: Vec<UnitId>,
    /// Units that yield the object as an output.
    pub as_output: Vec<UnitId>,
}

impl Usages {
    pub fn is_empty(&self) -> bool {
        self.as_input.is_empty() && self.as_output.is_empty()
    }
}

/// The fixed knowledge base searched by every strategy.
#[derive(Debug, Clone)]
pub struct FoonGraph {
    objects: Vec<ObjectNode>,
    units: Vec<FunctionalUnit>,
    /// Object index → ordered producer list.
    producers: Vec<Vec<UnitId>>,
    /// Object index → ordered consumer list.
    consumers: Vec<Vec<UnitId>>,
    /// Canonical key → first node carrying it.
    by_key: HashMap<ObjectKey, ObjectId>,
}

impl FoonGraph {
    /// Build an index from raw parts, deriving the producer map in unit order.
    ///
    /// Fails if a unit refers to an object outside `objects`.
    pub fn from_parts(objects: Vec<ObjectDescription>, units: Vec<UnitSpec>) -> GraphResult<Self> {
        let units = Self::number_units(objects.len(), units)?;
        let producers = derive_producers(objects.len(), &units);
        Ok(Self::assemble(objects, units, producers))
    }

    /// Build an index with an explicit producer map.
    ///
    /// The map's order is kept as-is: it decides which producer the
    /// positional strategies pick. Every entry is checked against the units.
    pub fn with_producers(
        objects: Vec<ObjectDescription>,
        units: Vec<UnitSpec>,
        producers: Vec<Vec<usize>>,
    ) -> GraphResult<Self> {
        let units = Self::number_units(objects.len(), units)?;
        if producers.len() != objects.len() {
            return Err(GraphError::ProducerMapSize {
                expected: objects.len(),
                actual: producers.len(),
            });
        }

        let producers = producers
            .into_iter()
            .enumerate()
            .map(|(object, list)| {
                list.into_iter()
                    .map(|unit| match units.get(unit) {
                        Some(fu) if fu.produces(ObjectId(object)) => Ok(UnitId(unit)),
                        _ => Err(GraphError::InvalidProducer { object, unit }),
                    })
                    .collect::<GraphResult<Vec<_>>>()
            })
            .collect::<GraphResult<Vec<_>>>()?;

        Ok(Self::assemble(objects, units, producers))
    }

    fn number_units(object_count: usize, units: Vec<UnitSpec>) -> GraphResult<Vec<FunctionalUnit>> {
        units
            .into_iter()
            .enumerate()
            .map(|(idx, spec)| {
                if let Some(bad) = spec
                    .inputs
                    .iter()
                    .chain(&spec.outputs)
                    .find(|o| o.index() >= object_count)
                {
                    return Err(GraphError::DanglingObject {
                        unit: idx,
                        object: bad.index(),
                    });
                }
                Ok(FunctionalUnit {
                    id: UnitId(idx),
                    inputs: spec.inputs,
                    outputs: spec.outputs,
                    motion: spec.motion,
                })
            })
            .collect()
    }

    fn assemble(
        objects: Vec<ObjectDescription>,
        units: Vec<FunctionalUnit>,
        producers: Vec<Vec<UnitId>>,
    ) -> Self {
        let mut consumers = vec![Vec::new(); objects.len()];
        for unit in &units {
            for &input in &unit.inputs {
                let list: &mut Vec<UnitId> = &mut consumers[input.index()];
                if list.last() != Some(&unit.id) {
                    list.push(unit.id);
                }
            }
        }

        let mut by_key = HashMap::with_capacity(objects.len());
        let objects: Vec<ObjectNode> = objects
            .into_iter()
            .enumerate()
            .map(|(idx, desc)| {
                by_key.entry(desc.key()).or_insert(ObjectId(idx));
                ObjectNode::new(ObjectId(idx), desc)
            })
            .collect();

        Self {
            objects,
            units,
            producers,
            consumers,
            by_key,
        }
    }

    /// The object at `id`. Panics if `id` did not come from this graph.
    pub fn object(&self, id: ObjectId) -> &ObjectNode {
        &self.objects[id.index()]
    }

    /// The unit at `id`. Panics if `id` did not come from this graph.
    pub fn unit(&self, id: UnitId) -> &FunctionalUnit {
        &self.units[id.index()]
    }

    pub fn objects(&self) -> &[ObjectNode] {
        &self.objects
    }

    pub fn units(&self) -> &[FunctionalUnit] {
        &self.units
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Units whose outputs contain `object`, in tie-break order.
    ///
    /// An empty slice marks a sink: the object cannot be produced.
    pub fn producers_of(&self, object: ObjectId) -> &[UnitId] {
        self.producers
            .get(object.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Units whose inputs contain `object`, in unit order.
    pub fn consumers_of(&self, object: ObjectId) -> &[UnitId] {
        self.consumers
            .get(object.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Exact-match lookup of a description.
    pub fn find(&self, description: &ObjectDescription) -> Option<ObjectId> {
        self.by_key.get(&description.key()).copied()
    }

    /// Resolve a goal description to its node.
    pub fn resolve(&self, description: &ObjectDescription) -> GraphResult<ObjectId> {
        self.find(description).ok_or_else(|| GraphError::GoalNotFound {
            label: description.label.clone(),
            states: description.states.clone(),
        })
    }

    /// Units that consume or produce the described object.
    ///
    /// A description absent from the graph has no usages.
    pub fn usages(&self, description: &ObjectDescription) -> Usages {
        match self.find(description) {
            Some(id) => Usages {
                as_input: self.consumers_of(id).to_vec(),
                as_output: self.producers_of(id).to_vec(),
            },
            None => Usages::default(),
        }
    }

    /// Units in which any object with `label` appears, whatever its states.
    pub fn usages_of_label(&self, label: &str) -> Usages {
        let mut usages = Usages::default();
        for unit in &self.units {
            let named = |ids: &[ObjectId]| ids.iter().any(|&id| self.object(id).label() == label);
            if named(&unit.inputs) {
                usages.as_input.push(unit.id);
            }
            if named(&unit.outputs) {
                usages.as_output.push(unit.id);
            }
        }
        usages
    }
}

fn derive_producers(object_count: usize, units: &[FunctionalUnit]) -> Vec<Vec<UnitId>> {
    let mut producers = vec![Vec::new(); object_count];
    for unit in units {
        for &output in &unit.outputs {
            let list: &mut Vec<UnitId> = &mut producers[output.index()];
            if list.last() != Some(&unit.id) {
                list.push(unit.id);
            }
        }
    }
    producers
}

/// Incremental graph construction that merges equal objects.
///
/// Adding a description equal to one already present returns the existing
/// id, which is how a FOON file mentioning the same object in many units
/// collapses into a single node.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    objects: Vec<ObjectDescription>,
    by_key: HashMap<ObjectKey, ObjectId>,
    units: Vec<UnitSpec>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an object, returning its id.
    pub fn object(&mut self, description: ObjectDescription) -> ObjectId {
        let key = description.key();
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        let id = ObjectId(self.objects.len());
        self.objects.push(description);
        self.by_key.insert(key, id);
        id
    }

    /// Add a unit over already-interned objects.
    pub fn unit(
        &mut self,
        inputs: Vec<ObjectId>,
        motion: impl Into<String>,
        outputs: Vec<ObjectId>,
    ) -> UnitId {
        let id = UnitId(self.units.len());
        self.units.push(UnitSpec {
            inputs,
            motion: motion.into(),
            outputs,
        });
        id
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Finish the graph. Fails only if a unit used an id from another builder.
    pub fn build(self) -> GraphResult<FoonGraph> {
        FoonGraph::from_parts(self.objects, self.units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(label: &str) -> ObjectDescription {
        ObjectDescription::new(label)
    }

    /// flour + water --mix--> dough --bake--> bread; dough also from premix.
    fn bakery() -> (FoonGraph, [ObjectId; 5]) {
        let mut b = GraphBuilder::new();
        let flour = b.object(desc("flour"));
        let water = b.object(desc("water"));
        let dough = b.object(desc("dough"));
        let bread = b.object(desc("bread"));
        let premix = b.object(desc("premix"));
        b.unit(vec![flour, water], "mix", vec![dough]);
        b.unit(vec![dough], "bake", vec![bread]);
        b.unit(vec![premix, water], "stir", vec![dough]);
        (b.build().unwrap(), [flour, water, dough, bread, premix])
    }

    #[test]
    fn builder_merges_equal_objects() {
        let mut b = GraphBuilder::new();
        let a = b.object(desc("egg").with_states(["whole", "raw"]));
        let again = b.object(desc("egg").with_states(["raw", "whole"]));
        assert_eq!(a, again);
        assert_eq!(b.object_count(), 1);
    }

    #[test]
    fn producers_follow_unit_order() {
        let (g, [_, _, dough, bread, flour_like]) = bakery();
        assert_eq!(g.producers_of(dough), &[UnitId(0), UnitId(2)]);
        assert_eq!(g.producers_of(bread), &[UnitId(1)]);
        assert!(g.producers_of(flour_like).is_empty());
    }

    #[test]
    fn consumers_are_indexed() {
        let (g, [_, water, dough, ..]) = bakery();
        assert_eq!(g.consumers_of(water), &[UnitId(0), UnitId(2)]);
        assert_eq!(g.consumers_of(dough), &[UnitId(1)]);
    }

    #[test]
    fn resolve_finds_exact_match() {
        let (g, [_, _, dough, ..]) = bakery();
        assert_eq!(g.resolve(&desc("dough")).unwrap(), dough);
    }

    #[test]
    fn resolve_rejects_state_mismatch() {
        let mut b = GraphBuilder::new();
        b.object(desc("egg").with_states(["whole", "raw"]));
        let g = b.build().unwrap();

        let err = g.resolve(&desc("egg").with_states(["whole"])).unwrap_err();
        assert!(matches!(err, GraphError::GoalNotFound { ref label, .. } if label == "egg"));
    }

    #[test]
    fn from_parts_rejects_dangling_reference() {
        let units = vec![UnitSpec {
            inputs: vec![ObjectId(0)],
            motion: "pour".into(),
            outputs: vec![ObjectId(7)],
        }];
        let err = FoonGraph::from_parts(vec![desc("milk")], units).unwrap_err();
        assert!(matches!(err, GraphError::DanglingObject { unit: 0, object: 7 }));
    }

    #[test]
    fn explicit_producer_map_keeps_order() {
        let objects = vec![desc("a"), desc("b")];
        let units = vec![
            UnitSpec { inputs: vec![ObjectId(0)], motion: "m1".into(), outputs: vec![ObjectId(1)] },
            UnitSpec { inputs: vec![ObjectId(0)], motion: "m2".into(), outputs: vec![ObjectId(1)] },
        ];
        let g = FoonGraph::with_producers(objects, units, vec![vec![], vec![1, 0]]).unwrap();
        assert_eq!(g.producers_of(ObjectId(1)), &[UnitId(1), UnitId(0)]);
    }

    #[test]
    fn explicit_producer_map_is_validated() {
        let objects = vec![desc("a"), desc("b")];
        let units = vec![UnitSpec {
            inputs: vec![ObjectId(0)],
            motion: "m".into(),
            outputs: vec![ObjectId(1)],
        }];
        let err = FoonGraph::with_producers(objects.clone(), units.clone(), vec![vec![0], vec![]])
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidProducer { object: 0, unit: 0 }));

        let err = FoonGraph::with_producers(objects, units, vec![vec![]]).unwrap_err();
        assert!(matches!(err, GraphError::ProducerMapSize { expected: 2, actual: 1 }));
    }

    #[test]
    fn usages_of_unknown_object_are_empty() {
        let (g, _) = bakery();
        assert!(g.usages(&desc("butter")).is_empty());
        let water = g.usages(&desc("water"));
        assert_eq!(water.as_input.len(), 2);
        assert!(water.as_output.is_empty());
    }

    #[test]
    fn usages_by_label_ignore_states() {
        let mut b = GraphBuilder::new();
        let cold = b.object(desc("pot"));
        let hot = b.object(desc("pot").with_states(["hot"]));
        let soup = b.object(desc("soup"));
        b.unit(vec![cold], "heat", vec![hot]);
        b.unit(vec![hot], "simmer", vec![soup]);
        let g = b.build().unwrap();

        let pot = g.usages_of_label("pot");
        assert_eq!(pot.as_input, vec![UnitId(0), UnitId(1)]);
        assert_eq!(pot.as_output, vec![UnitId(0)]);
        assert!(g.usages_of_label("ladle").is_empty());
    }
}
