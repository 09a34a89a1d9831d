//! Benchmarks for task-tree retrieval.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};

use foon_planner::cost::SuccessRates;
use foon_planner::graph::{FoonGraph, GraphBuilder};
use foon_planner::kitchen::Kitchen;
use foon_planner::object::{ObjectDescription, ObjectId};
use foon_planner::search::{Planner, SearchConfig, Strategy};
use foon_planner::utensil::UtensilSet;

const LAYERS: usize = 12;
const WIDTH: usize = 40;
const MOTIONS: [&str; 6] = ["chop", "mix", "pour", "heat", "stir", "slice"];

/// Layered graph: each object above layer 0 has two producers whose inputs
/// are drawn from the layer below. Layer 0 is the kitchen.
fn layered_graph() -> (FoonGraph, Kitchen, SuccessRates, ObjectId) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let mut b = GraphBuilder::new();

    let item = |layer: usize, i: usize| ObjectDescription::new(format!("item{i}")).with_states([format!("l{layer}")]);
    let layers: Vec<Vec<ObjectId>> = (0..LAYERS)
        .map(|layer| (0..WIDTH).map(|i| b.object(item(layer, i))).collect())
        .collect();

    for layer in 1..LAYERS {
        for &output in &layers[layer] {
            for _ in 0..2 {
                let inputs = (0..3)
                    .map(|_| layers[layer - 1][rng.gen_range(0..WIDTH)])
                    .collect();
                let motion = MOTIONS[rng.gen_range(0..MOTIONS.len())];
                b.unit(inputs, motion, vec![output]);
            }
        }
    }
    let graph = b.build().unwrap();

    let kitchen = (0..WIDTH).map(|i| item(0, i)).collect();
    let rates = MOTIONS
        .iter()
        .enumerate()
        .map(|(i, &m)| (m, 0.5 + 0.08 * i as f64))
        .collect();
    (graph, kitchen, rates, layers[LAYERS - 1][0])
}

fn bench_strategies(c: &mut Criterion) {
    let (graph, kitchen, rates, goal) = layered_graph();
    let utensils = UtensilSet::default();
    let planner = Planner::new(&graph, &kitchen, &utensils, &rates)
        .with_config(SearchConfig {
            iterations: 100,
            seed: Some(7),
            ..Default::default()
        })
        .unwrap();

    let mut group = c.benchmark_group("layered_12x40");
    for strategy in Strategy::ALL {
        group.bench_function(strategy.to_string(), |bench| {
            bench.iter(|| black_box(planner.plan(goal, strategy)))
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let (graph, kitchen, rates, _) = layered_graph();
    let utensils = UtensilSet::default();
    let planner = Planner::new(&graph, &kitchen, &utensils, &rates);
    let goals: Vec<ObjectDescription> = (0..WIDTH)
        .map(|i| ObjectDescription::new(format!("item{i}")).with_states([format!("l{}", LAYERS - 1)]))
        .collect();

    c.bench_function("plan_goals_astar_40", |bench| {
        bench.iter(|| black_box(planner.plan_goals(&goals, &[Strategy::AStar])))
    });
}

criterion_group!(benches, bench_strategies, bench_batch);
criterion_main!(benches);
