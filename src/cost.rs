//! Success-rate table and the cost terms derived from it.
//!
//! The table maps a motion label to the probability that a robot performs
//! it successfully. A* charges `1 / rate` per unit traversed and uses the
//! unit's input count as its heuristic; MCTS samples Bernoulli outcomes with
//! the rate as success probability.

use std::collections::HashMap;
use std::path::Path;

use crate::error::LoadResult;
use crate::graph::FunctionalUnit;
use crate::input;

/// Rate assumed by A* for a motion missing from the table.
pub const ASTAR_DEFAULT_RATE: f64 = 1.0;

/// Rate assumed by MCTS for a motion missing from the table.
pub const MCTS_DEFAULT_RATE: f64 = 0.5;

/// Motion label → success probability.
#[derive(Debug, Clone, Default)]
pub struct SuccessRates {
    rates: HashMap<String, f64>,
}

impl SuccessRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, motion: impl Into<String>, rate: f64) {
        self.rates.insert(motion.into(), rate);
    }

    /// Parse `motion<TAB>rate` lines.
    ///
    /// Blank lines are ignored. Lines without exactly two fields, or whose
    /// rate is not a number, are skipped with a warning so the motion falls
    /// back to the strategy's default rate.
    pub fn parse(content: &str) -> Self {
        let mut table = Self::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            let [motion, rate] = parts.as_slice() else {
                tracing::warn!(line = idx + 1, content = line, "skipping malformed success-rate line");
                continue;
            };
            match rate.trim().parse::<f64>() {
                Ok(rate) if rate.is_finite() => table.insert(motion.trim(), rate),
                _ => {
                    tracing::warn!(
                        line = idx + 1,
                        motion = motion.trim(),
                        rate = rate.trim(),
                        "skipping success-rate line with invalid probability"
                    );
                }
            }
        }
        table
    }

    pub fn load(path: &Path) -> LoadResult<Self> {
        let table = Self::parse(&input::read_text(path)?);
        tracing::debug!(path = %path.display(), motions = table.len(), "loaded success rates");
        Ok(table)
    }

    pub fn get(&self, motion: &str) -> Option<f64> {
        self.rates.get(motion).copied()
    }

    /// Rate for `motion`, or `fallback` when the table has no entry.
    pub fn rate_or(&self, motion: &str, fallback: f64) -> f64 {
        self.get(motion).unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for SuccessRates {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().map(|(m, r)| (m.into(), r)).collect(),
        }
    }
}

/// Cost terms used by the A* strategy.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    rates: &'a SuccessRates,
    fallback: f64,
}

impl<'a> CostModel<'a> {
    pub fn new(rates: &'a SuccessRates, fallback: f64) -> Self {
        Self { rates, fallback }
    }

    /// Step cost `g` accrues when traversing `unit`: `1 / success rate`.
    ///
    /// A non-positive rate makes the unit infinitely expensive.
    pub fn unit_cost(&self, unit: &FunctionalUnit) -> f64 {
        let rate = self.rates.rate_or(&unit.motion, self.fallback);
        if rate > 0.0 { 1.0 / rate } else { f64::INFINITY }
    }

    /// Heuristic `h`: fewer inputs is judged closer to done.
    pub fn heuristic(&self, unit: &FunctionalUnit) -> f64 {
        unit.inputs.len() as f64
    }
}
