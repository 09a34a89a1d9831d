// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # foon-planner
//!
//! Task-tree retrieval over a Functional Object-Oriented Network (FOON): given
//! a goal object and the objects already in the kitchen, find the functional
//! units that produce the goal from what is at hand.
//!
//! ## Architecture
//!
//! - **Object model** (`object`): object descriptions and their equality key
//! - **Graph index** (`graph`): objects, units, producer/consumer maps, FOON parsing, petgraph analytics
//! - **Availability** (`kitchen`, `utensil`): what is at hand, and which inputs never need expanding
//! - **Costs** (`cost`): motion success rates for A* and MCTS
//! - **Search** (`search`): BFS, IDS, A* and MCTS behind one [`search::TaskTreeSearch`] contract
//! - **Output** (`tree`, `report`): ordered task trees and their FOON text rendering
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use foon_planner::cost::SuccessRates;
//! use foon_planner::graph::parse::load_graph;
//! use foon_planner::kitchen::Kitchen;
//! use foon_planner::object::ObjectDescription;
//! use foon_planner::search::{Planner, Strategy};
//! use foon_planner::utensil::UtensilSet;
//!
//! let graph = load_graph(Path::new("FOON.txt")).unwrap();
//! let kitchen = Kitchen::load(Path::new("kitchen.json")).unwrap();
//! let utensils = UtensilSet::load(Path::new("utensils.txt")).unwrap();
//! let rates = SuccessRates::load(Path::new("motion.txt")).unwrap();
//!
//! let planner = Planner::new(&graph, &kitchen, &utensils, &rates);
//! let goal = ObjectDescription::new("omelette").with_states(["cooked"]);
//! let plan = planner.plan_description(&goal, Strategy::AStar).unwrap();
//! println!("{} units", plan.tree.len());
//! ```

pub mod config;
pub mod cost;
pub mod error;
pub mod graph;
pub mod input;
pub mod kitchen;
pub mod object;
pub mod report;
pub mod search;
pub mod tree;
pub mod utensil;
