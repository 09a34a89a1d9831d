//! Availability oracle: items already in the kitchen.
//!
//! An object is available iff it equals a kitchen item on all four fields
//! (label, state set, ingredient set, container). Items are indexed by their
//! canonical key, so a lookup is a hash probe rather than a scan.

use std::collections::HashSet;
use std::path::Path;

use crate::error::LoadResult;
use crate::input;
use crate::object::{ObjectDescription, ObjectKey, ObjectNode};

/// The set of items obtainable without any transformation.
#[derive(Debug, Clone, Default)]
pub struct Kitchen {
    items: Vec<ObjectDescription>,
    keys: HashSet<ObjectKey>,
}

impl Kitchen {
    pub fn new(items: Vec<ObjectDescription>) -> Self {
        let keys = items.iter().map(ObjectDescription::key).collect();
        Self { items, keys }
    }

    /// Load a JSON array of item descriptions.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let items: Vec<ObjectDescription> = input::read_json(path)?;
        tracing::debug!(path = %path.display(), items = items.len(), "loaded kitchen");
        Ok(Self::new(items))
    }

    /// Whether `node` is available as-is.
    pub fn is_available(&self, node: &ObjectNode) -> bool {
        self.keys.contains(&node.key())
    }

    /// Whether an arbitrary description is available as-is.
    pub fn contains(&self, description: &ObjectDescription) -> bool {
        self.keys.contains(&description.key())
    }

    pub fn items(&self) -> &[ObjectDescription] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ObjectDescription> for Kitchen {
    fn from_iter<I: IntoIterator<Item = ObjectDescription>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
