//! Radix resolution: the canonical short name used for logging and default
//! output naming. The radix is the path stem, unless a non-empty alias is
//! registered for that stem in the alias table.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Read-only stem-to-alias mapping, typically loaded from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasTable {
    #[serde(flatten)]
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    /// Load a table from a JSON object file, `{"stem": "alias", ...}`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::format(path, e))
    }

    /// Table from the path named by `SCOREBOOK_ALIASES`, or empty when the
    /// variable is unset.
    pub fn load_default() -> Result<Self> {
        match std::env::var_os("SCOREBOOK_ALIASES") {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_map(aliases: BTreeMap<String, String>) -> Self {
        Self { aliases }
    }

    pub fn get(&self, stem: &str) -> Option<&str> {
        self.aliases.get(stem).map(String::as_str)
    }
}

/// Derive the radix for a source path: the file stem, replaced by its alias
/// when one is present and non-empty.
pub fn radix_of(path: &Path, aliases: &AliasTable) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match aliases.get(&stem) {
        Some(alias) if !alias.is_empty() => alias.to_string(),
        _ => stem,
    }
}
