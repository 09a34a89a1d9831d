//! FOON knowledge graph: object nodes linked by functional units.
//!
//! A functional unit is a hyperedge: a set of input objects, a motion label,
//! and a set of output objects. The graph is built once and read-only
//! afterwards, so a single [`FoonGraph`] can be shared by any number of
//! concurrent searches.
//!
//! - **Index** ([`FoonGraph`]): object table, unit table, producer and
//!   consumer maps, exact-match resolution of descriptions
//! - **Parsing** ([`parse`]): universal FOON text format and a JSON form
//! - **Analytics** ([`analytics`]): sinks, production cycles, reachability

pub mod analytics;
pub mod index;
pub mod parse;

use serde::{Deserialize, Serialize};

use crate::object::ObjectId;

pub use index::{FoonGraph, GraphBuilder, Usages};

/// Position of a functional unit in the graph index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub usize);

impl UnitId {
    /// Index into the unit table.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fu:{}", self.0)
    }
}

/// One transformation: inputs + motion → outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalUnit {
    pub id: UnitId,
    /// Input objects, in the order the unit lists them.
    pub inputs: Vec<ObjectId>,
    /// Output objects, in the order the unit lists them.
    pub outputs: Vec<ObjectId>,
    /// Motion label; keys the success-rate table.
    pub motion: String,
}

impl FunctionalUnit {
    pub fn produces(&self, object: ObjectId) -> bool {
        self.outputs.contains(&object)
    }

    pub fn consumes(&self, object: ObjectId) -> bool {
        self.inputs.contains(&object)
    }
}

/// A unit before it is assigned an id, as handed to [`FoonGraph::from_parts`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    #[serde(alias = "input_nodes")]
    pub inputs: Vec<ObjectId>,
    #[serde(alias = "motion_node")]
    pub motion: String,
    #[serde(alias = "output_nodes")]
    pub outputs: Vec<ObjectId>,
}
