//! Frontier disciplines for the backward-chaining skeleton.
//!
//! A frontier decides two things: which pending object is expanded next,
//! and whether a popped object is worth expanding at all (the revisit guard).
//! Breadth-first and depth-first frontiers expand an object at most once;
//! the cost frontier re-expands only when a strictly cheaper path appears.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::object::ObjectId;

/// A pending object together with how it was reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub object: ObjectId,
    /// Number of units between the goal and this object.
    pub depth: usize,
    /// Accumulated cost `g`.
    pub cost: f64,
    /// Priority `f = g + h`; only the cost frontier reads it.
    pub priority: f64,
}

impl Entry {
    pub fn root(object: ObjectId) -> Self {
        Self {
            object,
            depth: 0,
            cost: 0.0,
            priority: 0.0,
        }
    }
}

/// Expansion order plus revisit guard.
pub trait Frontier {
    fn push(&mut self, entry: Entry);

    /// Queue the inputs of a newly selected unit, in unit order.
    fn push_children(&mut self, children: Vec<Entry>) {
        for child in children {
            self.push(child);
        }
    }

    fn pop(&mut self) -> Option<Entry>;

    /// Record a visit. Returns `false` if `entry` must be skipped.
    fn admit(&mut self, entry: &Entry) -> bool;

    /// Best known cost per admitted object, for frontiers that track one.
    fn best_costs(&self) -> HashMap<ObjectId, f64> {
        HashMap::new()
    }
}

/// FIFO queue: level-by-level expansion.
#[derive(Debug, Default)]
pub struct FifoFrontier {
    queue: VecDeque<Entry>,
    visited: HashSet<ObjectId>,
}

impl FifoFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for FifoFrontier {
    fn push(&mut self, entry: Entry) {
        self.queue.push_back(entry);
    }

    fn pop(&mut self) -> Option<Entry> {
        self.queue.pop_front()
    }

    fn admit(&mut self, entry: &Entry) -> bool {
        self.visited.insert(entry.object)
    }
}

/// Queue whose children go to the front: the inputs of the unit just
/// selected are examined before anything queued earlier.
#[derive(Debug, Default)]
pub struct DepthFirstFrontier {
    queue: VecDeque<Entry>,
    visited: HashSet<ObjectId>,
}

impl DepthFirstFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for DepthFirstFrontier {
    fn push(&mut self, entry: Entry) {
        self.queue.push_back(entry);
    }

    fn push_children(&mut self, children: Vec<Entry>) {
        for child in children.into_iter().rev() {
            self.queue.push_front(child);
        }
    }

    fn pop(&mut self) -> Option<Entry> {
        self.queue.pop_front()
    }

    fn admit(&mut self, entry: &Entry) -> bool {
        self.visited.insert(entry.object)
    }
}

/// Heap key: lowest priority first, then lowest object id, then lowest cost.
#[derive(Debug, Clone, Copy)]
struct CostKey(Entry);

impl PartialEq for CostKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CostKey {}

impl PartialOrd for CostKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CostKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .priority
            .total_cmp(&other.0.priority)
            .then_with(|| self.0.object.cmp(&other.0.object))
            .then_with(|| self.0.cost.total_cmp(&other.0.cost))
    }
}

/// Priority queue ordered by `f = g + h`.
///
/// `BinaryHeap` is a max-heap, so keys are wrapped in `Reverse`.
#[derive(Debug, Default)]
pub struct CostFrontier {
    heap: BinaryHeap<Reverse<CostKey>>,
    best: HashMap<ObjectId, f64>,
}

impl CostFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for CostFrontier {
    fn push(&mut self, entry: Entry) {
        self.heap.push(Reverse(CostKey(entry)));
    }

    fn pop(&mut self) -> Option<Entry> {
        self.heap.pop().map(|Reverse(CostKey(entry))| entry)
    }

    /// Ties do not re-expand: only a strictly lower `g` gets through.
    fn admit(&mut self, entry: &Entry) -> bool {
        match self.best.get(&entry.object) {
            Some(&best) if entry.cost >= best => false,
            _ => {
                self.best.insert(entry.object, entry.cost);
                true
            }
        }
    }

    fn best_costs(&self) -> HashMap<ObjectId, f64> {
        self.best.clone()
    }
}
