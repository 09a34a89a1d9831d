//! Object nodes: physical items pinned to a particular state.
//!
//! An object is identified semantically by its label, its set of states, its
//! set of contained ingredients and its (optional) container. [`ObjectId`] is
//! only a position in the graph index and carries no meaning on its own.
//!
//! All lookups (goal resolution, kitchen availability) go through
//! [`ObjectKey`], a canonical form in which state and ingredient lists are
//! sorted so that ordering never affects equality.

use serde::{Deserialize, Serialize};

/// Position of an object node in the graph index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub usize);

impl ObjectId {
    /// Index into the object table.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obj:{}", self.0)
    }
}

/// Description of an item: what goal and kitchen files contain.
///
/// Two descriptions are equal iff label, state set, ingredient set and
/// container all match; see [`ObjectKey`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub label: String,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub container: Option<String>,
}

impl ObjectDescription {
    /// A bare object with no states, ingredients or container.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_container(mut self, container: impl Into<String>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Canonical, order-insensitive form used for equality and hashing.
    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(
            &self.label,
            &self.states,
            &self.ingredients,
            self.container.as_deref(),
        )
    }
}

impl PartialEq for ObjectDescription {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ObjectDescription {}

/// Canonical identity of an object.
///
/// States and ingredients are stored sorted. Duplicates are kept, so a list
/// naming the same state twice does not match a list naming it once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    label: String,
    states: Vec<String>,
    ingredients: Vec<String>,
    container: Option<String>,
}

impl ObjectKey {
    pub fn new(
        label: &str,
        states: &[String],
        ingredients: &[String],
        container: Option<&str>,
    ) -> Self {
        let mut states = states.to_vec();
        states.sort();
        let mut ingredients = ingredients.to_vec();
        ingredients.sort();
        Self {
            label: label.to_string(),
            states,
            ingredients,
            container: container.map(str::to_string),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// A vertex of the knowledge graph. Immutable once the index is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectNode {
    pub id: ObjectId,
    #[serde(flatten)]
    pub description: ObjectDescription,
}

impl ObjectNode {
    pub fn new(id: ObjectId, description: ObjectDescription) -> Self {
        Self { id, description }
    }

    pub fn label(&self) -> &str {
        &self.description.label
    }

    pub fn states(&self) -> &[String] {
        &self.description.states
    }

    pub fn ingredients(&self) -> &[String] {
        &self.description.ingredients
    }

    pub fn container(&self) -> Option<&str> {
        self.description.container.as_deref()
    }

    pub fn key(&self) -> ObjectKey {
        self.description.key()
    }

    /// Whether this node is the object `description` describes.
    pub fn matches(&self, description: &ObjectDescription) -> bool {
        self.description == *description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_state_and_ingredient_order() {
        let a = ObjectDescription::new("bowl")
            .with_states(["contains", "clean"])
            .with_ingredients(["flour", "sugar"]);
        let b = ObjectDescription::new("bowl")
            .with_states(["clean", "contains"])
            .with_ingredients(["sugar", "flour"]);
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn differing_state_set_is_not_equal() {
        let a = ObjectDescription::new("egg").with_states(["whole"]);
        let b = ObjectDescription::new("egg").with_states(["whole", "cracked"]);
        assert_ne!(a, b);
    }

    #[test]
    fn container_participates_in_equality() {
        let bare = ObjectDescription::new("flour");
        let held = ObjectDescription::new("flour").in_container("bowl");
        assert_ne!(bare, held);
        assert_eq!(held, ObjectDescription::new("flour").in_container("bowl"));
    }

    #[test]
    fn duplicate_states_are_significant() {
        let once = ObjectDescription::new("water").with_states(["hot"]);
        let twice = ObjectDescription::new("water").with_states(["hot", "hot"]);
        assert_ne!(once, twice);
    }

    #[test]
    fn description_deserializes_with_defaults() {
        let desc: ObjectDescription =
            serde_json::from_str(r#"{"label": "knife", "container": null}"#).unwrap();
        assert_eq!(desc, ObjectDescription::new("knife"));
    }

    #[test]
    fn node_matches_description() {
        let node = ObjectNode::new(
            ObjectId(3),
            ObjectDescription::new("milk").with_states(["cold"]).in_container("cup"),
        );
        assert!(node.matches(&ObjectDescription::new("milk").with_states(["cold"]).in_container("cup")));
        assert!(!node.matches(&ObjectDescription::new("milk").with_states(["cold"])));
        assert_eq!(node.container(), Some("cup"));
        assert_eq!(node.id.to_string(), "obj:3");
    }
}
