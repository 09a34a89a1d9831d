//! File readers shared by the graph, kitchen, utensil and success-rate loaders.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{LoadError, LoadResult};

/// Read a whole file as UTF-8.
pub fn read_text(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let content = read_text(path)?;
    parse_json(&content, &path.display().to_string())
}

/// Deserialize JSON text; `origin` names the source in error messages.
pub fn parse_json<T: DeserializeOwned>(content: &str, origin: &str) -> LoadResult<T> {
    serde_json::from_str(content).map_err(|e| LoadError::Json {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = read_text(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn bad_json_names_its_origin() {
        let err = parse_json::<Vec<u32>>("[1, 2", "goal_nodes.json").unwrap_err();
        match err {
            LoadError::Json { path, .. } => assert_eq!(path, "goal_nodes.json"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
