//! Linter configuration.
//!
//! Configuration lives in a `gherlint.jsonc` (or `gherlint.json`) file.
//! The top level is a mapping from checker section name to that checker's
//! options; each checker binds its own section when it is built, so the
//! engine itself only carries the raw sections around.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::LinterError;

const CONFIG_FILE_NAMES: &[&str] = &["gherlint.jsonc", "gherlint.json"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinterConfig {
    #[serde(flatten)]
    sections: HashMap<String, Value>,
}

impl LinterConfig {
    /// Loads the configuration. An explicit path must exist; without one,
    /// the default file names are probed in `dir` and an absent file
    /// yields the empty configuration.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, LinterError> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(LinterError::config(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match Self::find_in(dir) {
                Some(path) => path,
                None => {
                    debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, LinterError> {
        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
            .map_err(|error| LinterError::config(format!("{}: {error}", path.display())))
    }

    pub fn from_str(content: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(content, &Default::default())
            .map_err(|error| LinterError::config(error.to_string()))?
            .unwrap_or(Value::Null);
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).map_err(|error| LinterError::config(error.to_string()))
    }

    fn find_in(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Raw options of one checker section, if configured.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }
}

/// Typed options of one checker, bound from its config section.
///
/// A missing section yields [`Default::default`]; a section whose values
/// do not bind is a configuration error and aborts the run before any
/// file is linted. Unknown keys inside a section are ignored.
pub trait CheckerOptions: serde::de::DeserializeOwned + Default {
    /// Name of the section this checker reads.
    const CONFIG_SECTION: &'static str;

    fn from_config(config: &LinterConfig) -> Result<Self, LinterError> {
        match config.section(Self::CONFIG_SECTION) {
            None => Ok(Self::default()),
            Some(section) => serde_json::from_value(section.clone()).map_err(|error| {
                LinterError::config(format!(
                    "invalid '{}' section: {error}",
                    Self::CONFIG_SECTION
                ))
            }),
        }
    }
}
