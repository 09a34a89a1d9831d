//! Rich diagnostic error types for the FOON planner.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.
//!
//! Dead ends during search (an object that is neither available nor producible)
//! are not errors: the traversal drops the branch and moves on.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the planner.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum FoonError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Report(#[from] ReportError),
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("goal not found: \"{label}\" with states {states:?}")]
    #[diagnostic(
        code(foon::graph::goal_not_found),
        help(
            "No object node matches this description exactly. Label, states, \
             ingredients and container must all agree (state and ingredient order \
             is ignored). Check the goal file against the knowledge base."
        )
    )]
    GoalNotFound { label: String, states: Vec<String> },

    #[error("functional unit {unit} references unknown object {object}")]
    #[diagnostic(
        code(foon::graph::dangling_object),
        help(
            "Every input and output of a functional unit must exist in the object \
             index. The graph file is inconsistent; regenerate it."
        )
    )]
    DanglingObject { unit: usize, object: usize },

    #[error("producer map lists unit {unit} for object {object}, but that unit does not produce it")]
    #[diagnostic(
        code(foon::graph::invalid_producer),
        help(
            "Entries of `object_to_FU_map` must name existing functional units whose \
             outputs contain the object. Drop the map to have it derived automatically."
        )
    )]
    InvalidProducer { object: usize, unit: usize },

    #[error("producer map has {actual} entries, expected one per object ({expected})")]
    #[diagnostic(
        code(foon::graph::producer_map_size),
        help("The producer map must hold exactly one (possibly empty) list per object node.")
    )]
    ProducerMapSize { expected: usize, actual: usize },
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("failed to read {path}")]
    #[diagnostic(
        code(foon::load::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {message}")]
    #[diagnostic(
        code(foon::load::json),
        help(
            "Kitchen and goal files are JSON arrays of objects with `label`, \
             `states`, `ingredients` and `container` fields."
        )
    )]
    Json { path: String, message: String },

    #[error("FOON syntax error on line {line}: {message}")]
    #[diagnostic(
        code(foon::load::foon_syntax),
        help(
            "Each unit is a block of `O` (object), `S` (state) and `M` (motion) \
             lines terminated by `//`. States must follow the object they describe."
        )
    )]
    FoonSyntax { line: usize, message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read planner config: {path}")]
    #[diagnostic(
        code(foon::config::read),
        help("Ensure the config file exists, or create one with `foon init-config`.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse planner config: {path}: {message}")]
    #[diagnostic(
        code(foon::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write planner config: {path}")]
    #[diagnostic(
        code(foon::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid search configuration: {message}")]
    #[diagnostic(
        code(foon::config::invalid),
        help("Adjust the `[search]` table or the matching command-line flag. {message}")
    )]
    Invalid { message: String },
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("failed to write task tree to {path}")]
    #[diagnostic(
        code(foon::report::write),
        help("Ensure the output directory exists and is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type for planner operations.
pub type FoonResult<T> = std::result::Result<T, FoonError>;

/// Result type for input loading.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Result type for configuration handling.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_converts_to_foon_error() {
        let err: FoonError = GraphError::GoalNotFound {
            label: "whipped cream".into(),
            states: vec!["whipped".into()],
        }
        .into();
        assert!(matches!(err, FoonError::Graph(GraphError::GoalNotFound { .. })));
        assert!(err.to_string().contains("whipped cream"));
    }

    #[test]
    fn diagnostic_codes_are_namespaced() {
        let err = ConfigError::Invalid {
            message: "iterations must be at least 1".into(),
        };
        let code = err.code().map(|c| c.to_string()).unwrap_or_default();
        assert_eq!(code, "foon::config::invalid");
    }
}
