//! Graph loading from the universal FOON text format or JSON.
//!
//! Text format, one unit per block:
//!
//! ```text
//! O	bowl	0
//! S	contains	{flour}
//! O	water	0
//! S	liquid
//! M	pour	<Assumed>	<Assumed>
//! O	bowl	1
//! S	contains	{flour,water}
//! //
//! ```
//!
//! `O` lines carry a flag (`0` input, `1` output); without it, objects seen
//! before the `M` line are inputs and the rest are outputs. A state may carry
//! `{a,b}` (ingredients) and/or `[c]` (container); a state line with an empty
//! state (`S\t\t[c]`) carries only those details.

use std::path::Path;

use serde::Deserialize;

use crate::error::{FoonResult, LoadError};
use crate::input;
use crate::object::{ObjectDescription, ObjectId};

use super::index::{FoonGraph, GraphBuilder};
use super::UnitSpec;

/// On-disk JSON form of a graph.
#[derive(Debug, Deserialize)]
struct GraphFile {
    object_nodes: Vec<ObjectDescription>,
    functional_units: Vec<UnitSpec>,
    #[serde(default, alias = "object_to_FU_map")]
    producers: Option<Vec<Vec<usize>>>,
}

/// Load a graph, choosing the format by extension (`.json` or FOON text).
pub fn load_graph(path: &Path) -> FoonResult<FoonGraph> {
    let content = input::read_text(path)?;
    let graph = if path.extension().is_some_and(|ext| ext == "json") {
        parse_json(&content, &path.display().to_string())?
    } else {
        parse_foon_text(&content)?
    };
    tracing::info!(
        path = %path.display(),
        objects = graph.object_count(),
        units = graph.unit_count(),
        "loaded FOON graph"
    );
    Ok(graph)
}

/// Parse the JSON form. An explicit producer map is validated and kept.
pub fn parse_json(content: &str, origin: &str) -> FoonResult<FoonGraph> {
    let file: GraphFile = input::parse_json(content, origin)?;
    let graph = match file.producers {
        Some(producers) => {
            FoonGraph::with_producers(file.object_nodes, file.functional_units, producers)?
        }
        None => FoonGraph::from_parts(file.object_nodes, file.functional_units)?,
    };
    Ok(graph)
}

/// Unit being assembled while scanning a block.
#[derive(Default)]
struct PendingUnit {
    inputs: Vec<ObjectId>,
    outputs: Vec<ObjectId>,
    motion: Option<String>,
    object: Option<(ObjectDescription, bool)>,
}

impl PendingUnit {
    fn is_empty(&self) -> bool {
        self.inputs.is_empty()
            && self.outputs.is_empty()
            && self.motion.is_none()
            && self.object.is_none()
    }

    fn flush_object(&mut self, builder: &mut GraphBuilder) {
        if let Some((desc, is_output)) = self.object.take() {
            let id = builder.object(desc);
            let side = if is_output { &mut self.outputs } else { &mut self.inputs };
            if !side.contains(&id) {
                side.push(id);
            }
        }
    }

    fn finish(mut self, builder: &mut GraphBuilder, line: usize) -> Result<(), LoadError> {
        self.flush_object(builder);
        let motion = self.motion.ok_or_else(|| LoadError::FoonSyntax {
            line,
            message: "functional unit has no motion (`M`) line".into(),
        })?;
        builder.unit(self.inputs, motion, self.outputs);
        Ok(())
    }
}

/// Parse the universal FOON text format.
///
/// Objects equal under label/state/ingredient/container equality are merged
/// into one node; the producer map follows unit order.
pub fn parse_foon_text(content: &str) -> FoonResult<FoonGraph> {
    let mut builder = GraphBuilder::new();
    let mut unit = PendingUnit::default();
    let mut last_line = 0;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with("//") {
            let done = std::mem::take(&mut unit);
            if !done.is_empty() {
                done.finish(&mut builder, line_no)?;
            }
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        match fields[0] {
            "O" => {
                unit.flush_object(&mut builder);
                let label = field(&fields, 1, line_no, "object line needs a label")?;
                let is_output = match fields.get(2).copied() {
                    Some("1") => true,
                    Some("0") => false,
                    Some(other) if !other.is_empty() => {
                        return Err(LoadError::FoonSyntax {
                            line: line_no,
                            message: format!("object flag must be 0 or 1, got \"{other}\""),
                        }
                        .into());
                    }
                    _ => unit.motion.is_some(),
                };
                unit.object = Some((ObjectDescription::new(label), is_output));
            }
            "S" => {
                let details = fields.get(2..).unwrap_or(&[]);
                // An empty state is allowed only as a carrier for details.
                let state = if details.iter().any(|d| !d.is_empty()) {
                    fields.get(1).copied().unwrap_or("")
                } else {
                    field(&fields, 1, line_no, "state line needs a state")?
                };
                let Some((desc, _)) = unit.object.as_mut() else {
                    return Err(LoadError::FoonSyntax {
                        line: line_no,
                        message: "state line does not follow an object line".into(),
                    }
                    .into());
                };
                if !state.is_empty() {
                    desc.states.push(state.to_string());
                }
                for extra in details {
                    apply_state_detail(desc, extra, line_no)?;
                }
            }
            "M" => {
                unit.flush_object(&mut builder);
                let motion = field(&fields, 1, line_no, "motion line needs a label")?;
                if unit.motion.is_some() {
                    return Err(LoadError::FoonSyntax {
                        line: line_no,
                        message: "functional unit has more than one motion line".into(),
                    }
                    .into());
                }
                unit.motion = Some(motion.to_string());
            }
            other => {
                return Err(LoadError::FoonSyntax {
                    line: line_no,
                    message: format!("unknown line type \"{other}\""),
                }
                .into());
            }
        }
    }

    if !unit.is_empty() {
        unit.finish(&mut builder, last_line)?;
    }

    Ok(builder.build()?)
}

fn field<'a>(fields: &[&'a str], idx: usize, line: usize, message: &str) -> Result<&'a str, LoadError> {
    match fields.get(idx) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(LoadError::FoonSyntax {
            line,
            message: message.to_string(),
        }),
    }
}

fn apply_state_detail(desc: &mut ObjectDescription, detail: &str, line: usize) -> Result<(), LoadError> {
    if let Some(inner) = detail.strip_prefix('{').and_then(|d| d.strip_suffix('}')) {
        desc.ingredients.extend(
            inner
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
        Ok(())
    } else if let Some(inner) = detail.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        desc.container = Some(inner.trim().to_string());
        Ok(())
    } else if detail.is_empty() {
        Ok(())
    } else {
        Err(LoadError::FoonSyntax {
            line,
            message: format!("unrecognised state detail \"{detail}\""),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FoonError;
    use crate::graph::UnitId;

    const SAMPLE: &str = "\
//
O\tflour\t0
S\tpowdered
O\tbowl\t0
S\tempty
M\tpour\t<Assumed>\t<Assumed>
O\tbowl\t1
S\tcontains\t{flour}
//
O\tbowl\t0
S\tcontains\t{flour}
O\twater\t0
S\tliquid\t[cup]
M\tpour
O\tbowl\t1
S\tcontains\t{water, flour}
//
";

    #[test]
    fn parses_units_and_merges_objects() {
        let g = parse_foon_text(SAMPLE).unwrap();
        assert_eq!(g.unit_count(), 2);
        // flour, empty bowl, bowl{flour}, water[cup], bowl{flour,water}
        assert_eq!(g.object_count(), 5);

        let bowl_with_flour = g
            .find(
                &ObjectDescription::new("bowl")
                    .with_states(["contains"])
                    .with_ingredients(["flour"]),
            )
            .unwrap();
        assert_eq!(g.producers_of(bowl_with_flour), &[UnitId(0)]);
        assert_eq!(g.consumers_of(bowl_with_flour), &[UnitId(1)]);

        let water = g
            .find(&ObjectDescription::new("water").with_states(["liquid"]).in_container("cup"))
            .unwrap();
        assert!(g.unit(UnitId(1)).consumes(water));
    }

    #[test]
    fn missing_flag_uses_motion_position() {
        let text = "O\tegg\nS\twhole\nM\tcrack\nO\tegg\nS\tcracked\n//\n";
        let g = parse_foon_text(text).unwrap();
        let unit = g.unit(UnitId(0));
        assert_eq!(unit.inputs.len(), 1);
        assert_eq!(unit.outputs.len(), 1);
        assert_eq!(g.object(unit.outputs[0]).states(), ["cracked".to_string()]);
    }

    #[test]
    fn trailing_block_without_terminator_is_kept() {
        let g = parse_foon_text("O\tegg\t0\nM\tcrack\nO\tshell\t1").unwrap();
        assert_eq!(g.unit_count(), 1);
    }

    #[test]
    fn state_without_object_is_rejected() {
        let err = parse_foon_text("S\traw\n").unwrap_err();
        assert!(matches!(err, FoonError::Load(LoadError::FoonSyntax { line: 1, .. })));
    }

    #[test]
    fn unit_without_motion_is_rejected() {
        let err = parse_foon_text("O\tegg\t0\nO\tshell\t1\n//\n").unwrap_err();
        assert!(matches!(err, FoonError::Load(LoadError::FoonSyntax { line: 3, .. })));
    }

    #[test]
    fn json_form_with_producer_map() {
        let json = r#"{
            "object_nodes": [
                {"label": "egg", "states": ["whole"]},
                {"label": "egg", "states": ["cracked"]}
            ],
            "functional_units": [
                {"input_nodes": [0], "motion_node": "crack", "output_nodes": [1]}
            ],
            "object_to_FU_map": [[], [0]]
        }"#;
        let g = parse_json(json, "inline").unwrap();
        assert_eq!(g.producers_of(ObjectId(1)), &[UnitId(0)]);
        assert_eq!(g.unit(UnitId(0)).motion, "crack");
    }

    #[test]
    fn load_graph_dispatches_on_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("foon.txt");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_graph(&path).unwrap().unit_count(), 2);
    }

    #[test]
    fn detail_only_state_line_adds_no_state() {
        let text = "O\tflour\t0\nS\t\t[bowl]\nM\tsift\nO\tflour\t1\nS\tsifted\t{lumps}\t[sieve]\n//\n";
        let g = parse_foon_text(text).unwrap();
        let unit = g.unit(UnitId(0));

        let input = g.object(unit.inputs[0]);
        assert!(input.states().is_empty());
        assert_eq!(input.container(), Some("bowl"));

        let output = g.object(unit.outputs[0]);
        assert_eq!(output.states(), ["sifted".to_string()]);
        assert_eq!(output.ingredients(), ["lumps".to_string()]);
        assert_eq!(output.container(), Some("sieve"));
    }
}
