//! Human-readable task-tree reports in FOON text form.
//!
//! A report starts with `//` and lists each unit as a FOON block: input
//! objects, the motion line, output objects, and a closing `//`. The output
//! parses back with [`crate::graph::parse::parse_foon_text`].

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::ReportError;
use crate::graph::{FoonGraph, FunctionalUnit, Usages};
use crate::object::ObjectNode;
use crate::search::Strategy;
use crate::tree::TaskTree;

fn render_object(out: &mut String, node: &ObjectNode, is_output: bool) {
    let _ = writeln!(out, "O\t{}\t{}", node.label(), u8::from(is_output));

    // Details ride on their customary state, else on the last state, else on
    // a detail-only line, so every field survives a re-parse.
    let states = node.states();
    let anchor = |name: &str| {
        states
            .iter()
            .position(|s| s == name)
            .or_else(|| states.len().checked_sub(1))
    };
    let ingredients_at = (!node.ingredients().is_empty()).then(|| anchor("contains"));
    let container_at = node.container().map(|c| (c, anchor("in")));

    for (idx, state) in states.iter().enumerate() {
        let _ = write!(out, "S\t{state}");
        if ingredients_at == Some(Some(idx)) {
            let _ = write!(out, "\t{{{}}}", node.ingredients().join(","));
        }
        if let Some((container, Some(at))) = container_at {
            if at == idx {
                let _ = write!(out, "\t[{container}]");
            }
        }
        out.push('\n');
    }

    if states.is_empty() && (ingredients_at.is_some() || container_at.is_some()) {
        out.push_str("S\t");
        if ingredients_at.is_some() {
            let _ = write!(out, "\t{{{}}}", node.ingredients().join(","));
        }
        if let Some((container, _)) = container_at {
            let _ = write!(out, "\t[{container}]");
        }
        out.push('\n');
    }
}

/// One unit as a FOON block, terminated by `//`.
pub fn render_unit(graph: &FoonGraph, unit: &FunctionalUnit) -> String {
    let mut out = String::new();
    for &input in &unit.inputs {
        render_object(&mut out, graph.object(input), false);
    }
    let _ = writeln!(out, "M\t{}\t<Assumed>\t<Assumed>", unit.motion);
    for &output in &unit.outputs {
        render_object(&mut out, graph.object(output), true);
    }
    out.push_str("//");
    out
}

/// A whole task tree, in production order.
pub fn render_task_tree(graph: &FoonGraph, tree: &TaskTree) -> String {
    let mut out = String::from("//\n");
    for unit in tree.resolve(graph) {
        out.push_str(&render_unit(graph, unit));
        out.push('\n');
    }
    out
}

/// Report file name for one goal and strategy, e.g. `output_BFS_omelette.txt`.
///
/// Path separators in the label become `_`, so the report always lands in
/// the output directory itself.
pub fn report_file_name(strategy: Strategy, goal_label: &str) -> String {
    let label: String = goal_label
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("output_{}_{}.txt", strategy.file_tag(), label)
}

/// Write `tree` into `dir`, returning the path written.
pub fn write_task_tree(
    dir: &Path,
    graph: &FoonGraph,
    tree: &TaskTree,
    strategy: Strategy,
    goal_label: &str,
) -> Result<PathBuf, ReportError> {
    let path = dir.join(report_file_name(strategy, goal_label));
    std::fs::write(&path, render_task_tree(graph, tree)).map_err(|source| ReportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), units = tree.len(), "wrote task tree");
    Ok(path)
}

/// List the units an item takes part in.
pub fn render_usages(graph: &FoonGraph, title: &str, usages: &Usages) -> String {
    let mut out = format!("Searching functional units for {title}\n");
    if usages.is_empty() {
        let _ = writeln!(out, "No functional units found for {title}");
        return out;
    }
    for &id in &usages.as_input {
        let _ = writeln!(out, "Found in input of functional unit:\n{}", render_unit(graph, graph.unit(id)));
    }
    for &id in &usages.as_output {
        let _ = writeln!(out, "Found in output of functional unit:\n{}", render_unit(graph, graph.unit(id)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::parse::parse_foon_text;
    use crate::graph::{GraphBuilder, UnitId};
    use crate::object::ObjectDescription;

    fn omelette() -> FoonGraph {
        let mut b = GraphBuilder::new();
        let eggs = b.object(
            ObjectDescription::new("bowl")
                .with_states(["contains"])
                .with_ingredients(["egg"]),
        );
        let pan = b.object(ObjectDescription::new("pan").with_states(["hot"]));
        let omelette = b.object(
            ObjectDescription::new("omelette")
                .with_states(["cooked", "in"])
                .in_container("pan"),
        );
        b.unit(vec![eggs, pan], "pour", vec![omelette]);
        b.build().unwrap()
    }

    #[test]
    fn renders_foon_block() {
        let g = omelette();
        let text = render_unit(&g, g.unit(UnitId(0)));
        assert_eq!(
            text,
            "O\tbowl\t0\nS\tcontains\t{egg}\nO\tpan\t0\nS\thot\n\
             M\tpour\t<Assumed>\t<Assumed>\n\
             O\tomelette\t1\nS\tcooked\nS\tin\t[pan]\n//"
        );
    }

    #[test]
    fn rendered_tree_parses_back() {
        let g = omelette();
        let tree = TaskTree::from_discovery(vec![UnitId(0)]);
        let text = render_task_tree(&g, &tree);
        assert!(text.starts_with("//\n"));

        let reparsed = parse_foon_text(&text).unwrap();
        assert_eq!(reparsed.unit_count(), 1);
        assert_eq!(reparsed.object_count(), 3);
        assert_eq!(reparsed.unit(UnitId(0)).motion, "pour");
    }

    #[test]
    fn writes_named_report() {
        let tmp = tempfile::TempDir::new().unwrap();
        let g = omelette();
        let tree = TaskTree::from_discovery(vec![UnitId(0)]);
        let path = write_task_tree(tmp.path(), &g, &tree, Strategy::AStar, "omelette").unwrap();
        assert!(path.ends_with("output_A_star_omelette.txt"));
        assert!(std::fs::read_to_string(path).unwrap().contains("M\tpour"));
    }

    #[test]
    fn usages_report_mentions_missing_items() {
        let g = omelette();
        let text = render_usages(&g, "kitchen item: spoon", &Usages::default());
        assert!(text.contains("No functional units found for kitchen item: spoon"));

        let pan = g.usages(&ObjectDescription::new("pan").with_states(["hot"]));
        let text = render_usages(&g, "utensil: pan", &pan);
        assert!(text.contains("Found in input of functional unit"));
    }

    #[test]
    fn details_survive_without_customary_states() {
        let mut b = GraphBuilder::new();
        let flour = b.object(ObjectDescription::new("flour").with_states(["powdered"]));
        let sifted = b.object(
            ObjectDescription::new("flour")
                .with_states(["sifted"])
                .in_container("bowl"),
        );
        let dough = b.object(
            ObjectDescription::new("dough")
                .with_ingredients(["flour", "water"])
                .in_container("tray"),
        );
        b.unit(vec![flour], "sift", vec![sifted]);
        b.unit(vec![sifted], "knead", vec![dough]);
        let g = b.build().unwrap();

        let sift = render_unit(&g, g.unit(UnitId(0)));
        assert!(sift.contains("O\tflour\t1\nS\tsifted\t[bowl]\n"));
        let knead = render_unit(&g, g.unit(UnitId(1)));
        assert!(knead.contains("O\tdough\t1\nS\t\t{flour,water}\t[tray]\n"));

        let tree = TaskTree::from_discovery(vec![UnitId(1), UnitId(0)]);
        let reparsed = parse_foon_text(&render_task_tree(&g, &tree)).unwrap();
        for node in g.objects() {
            assert!(reparsed.find(&node.description).is_some(), "{} lost a field", node.label());
        }
    }

    #[test]
    fn report_name_strips_path_separators() {
        assert_eq!(
            report_file_name(Strategy::Bfs, "salt/pepper"),
            "output_BFS_salt_pepper.txt"
        );
        let tmp = tempfile::TempDir::new().unwrap();
        let g = omelette();
        let tree = TaskTree::from_discovery(vec![UnitId(0)]);
        let path = write_task_tree(tmp.path(), &g, &tree, Strategy::Mcts, "a/b").unwrap();
        assert_eq!(path.parent(), Some(tmp.path()));
    }
}
