//! Construction options read from TOML.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::btree::DEFAULT_DEGREE;
use crate::overlap::{ExclusiveOverlapper, InclusiveOverlapper, Overlapper};

/// Struct for deserializing from a config TOML
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub backend: BackendKind,
    /// Only consulted by the B-tree backend.
    pub degree: usize,
    pub overlapper: OverlapKind,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: BackendKind::default(),
            degree: DEFAULT_DEGREE,
            overlapper: OverlapKind::default(),
        }
    }
}

/// The available tree backends.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all(deserialize = "lowercase"))]
pub enum BackendKind {
    #[serde(alias = "rbtree", alias = "red-black")]
    Llrb,
    #[default]
    #[serde(alias = "b-tree")]
    BTree,
}

/// The built-in overlap policies.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all(deserialize = "lowercase"))]
pub enum OverlapKind {
    #[default]
    #[serde(alias = "closed")]
    Inclusive,
    #[serde(alias = "half-open")]
    Exclusive,
}

impl OverlapKind {
    pub fn to_overlapper(self) -> Arc<dyn Overlapper> {
        match self {
            OverlapKind::Inclusive => Arc::new(InclusiveOverlapper),
            OverlapKind::Exclusive => Arc::new(ExclusiveOverlapper),
        }
    }
}

impl Config {
    /// Read a config TOML and generate a [`Config`] struct
    pub fn read_toml(path: &Path) -> Result<Config, Error> {
        let mut file = File::open(path)?;
        let mut config_toml = String::new();
        file.read_to_string(&mut config_toml)?;
        Config::from_toml_str(&config_toml)
    }

    pub fn from_toml_str(config_toml: &str) -> Result<Config, Error> {
        Ok(toml::from_str(config_toml)?)
    }
}

/// Config parse error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// The one-based line and column of a TOML syntax error.
    pub fn line_col(&self) -> Option<(u32, u16)> {
        match self {
            Error::Io(_) => None,
            Error::Toml(toml) => toml.line_col().map(|(l, c)| (l as u32 + 1, c as u16 + 1)),
        }
    }
}
