use phf::{Map, phf_map};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

static BUILTIN_SPECIES: Map<&'static str, &'static str> = phf_map! {
    "ca" => "C", "cb" => "C", "cc" => "C", "cd" => "C",
    "ce" => "C", "c1" => "C", "cn" => "C", "co" => "C",
    "o1" => "O", "oc" => "O",
    "n1" => "N", "ns" => "N",
    "ni" => "Ni",
    "cu" => "Cu",
    "h1" => "H", "ha" => "H", "ho" => "H", "hn" => "H",
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown species label '{label}': add it to the species table")]
pub struct UnknownSpeciesError {
    pub label: String,
}

#[derive(Debug, Error)]
pub enum SpeciesLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Maps force-field atom-type labels to chemical element symbols.
///
/// Labels are stored and looked up in lowercase. A label missing from the
/// table is always an error; the element is never guessed from the label text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesTable {
    entries: HashMap<String, String>,
}

impl SpeciesTable {
    /// Creates a table holding the built-in label set.
    pub fn builtin() -> Self {
        let entries = BUILTIN_SPECIES
            .entries()
            .map(|(label, symbol)| (label.to_string(), symbol.to_string()))
            .collect();
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds or replaces a mapping, returning the previous symbol for the label.
    pub fn insert(&mut self, label: &str, symbol: impl Into<String>) -> Option<String> {
        self.entries
            .insert(label.trim().to_ascii_lowercase(), symbol.into())
    }

    pub fn extend<I, L, S>(&mut self, mappings: I)
    where
        I: IntoIterator<Item = (L, S)>,
        L: AsRef<str>,
        S: Into<String>,
    {
        for (label, symbol) in mappings {
            self.insert(label.as_ref(), symbol);
        }
    }

    /// Merges `label = "Symbol"` pairs from a TOML file over the current entries.
    pub fn load_overrides(&mut self, path: &Path) -> Result<usize, SpeciesLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| SpeciesLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let overrides: HashMap<String, String> =
            toml::from_str(&content).map_err(|e| SpeciesLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
        let count = overrides.len();
        self.extend(overrides);
        Ok(count)
    }

    pub fn resolve(&self, label: &str) -> Result<&str, UnknownSpeciesError> {
        self.entries
            .get(&label.to_ascii_lowercase())
            .map(String::as_str)
            .ok_or_else(|| UnknownSpeciesError {
                label: label.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self::builtin()
    }
}
