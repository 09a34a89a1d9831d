//! Planner configuration, persisted as TOML.
//!
//! ```toml
//! [search]
//! iterations = 1000
//! utensil_filter = "all"
//!
//! [inputs]
//! graph = "FOON.txt"
//! kitchen = "kitchen.json"
//!
//! [output]
//! dir = "."
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::search::SearchConfig;

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputPaths {
    #[serde(default = "default_graph")]
    pub graph: PathBuf,
    #[serde(default = "default_kitchen")]
    pub kitchen: PathBuf,
    #[serde(default = "default_utensils")]
    pub utensils: PathBuf,
    #[serde(default = "default_goals")]
    pub goals: PathBuf,
    /// Motion success-rate table; without it every motion uses the fallback rate.
    #[serde(default)]
    pub motion: Option<PathBuf>,
}

fn default_graph() -> PathBuf {
    "FOON.txt".into()
}
fn default_kitchen() -> PathBuf {
    "kitchen.json".into()
}
fn default_utensils() -> PathBuf {
    "utensils.txt".into()
}
fn default_goals() -> PathBuf {
    "goal_nodes.json".into()
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            graph: default_graph(),
            kitchen: default_kitchen(),
            utensils: default_utensils(),
            goals: default_goals(),
            motion: Some("motion.txt".into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives `output_<STRATEGY>_<goal>.txt` reports.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    ".".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Whole planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub inputs: InputPaths,
    #[serde(default)]
    pub output: OutputConfig,
}

impl PlannerConfig {
    /// Load from a TOML file and validate the search table.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::parse(&content, path)?;
        config.search.validate()?;
        Ok(config)
    }

    fn parse(content: &str, path: &Path) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}
