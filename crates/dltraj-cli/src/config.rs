use crate::cli::ConvertArgs;
use crate::error::{CliError, Result};
use dltraj::core::species::SpeciesTable;
use dltraj::engine::config::{ConvertConfig, ConvertConfigBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialConvertSection {
    #[serde(rename = "flush-lines")]
    flush_lines: Option<usize>,
    #[serde(rename = "io-buffer-bytes")]
    io_buffer_bytes: Option<usize>,
}

/// Contents of a `dltraj.toml` file. Every section and key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConvertConfig {
    convert: Option<PartialConvertSection>,
    species: Option<BTreeMap<String, String>>,
}

/// Converter settings after merging defaults, the config file and CLI flags.
#[derive(Debug)]
pub struct ResolvedConvertConfig {
    pub config: ConvertConfig,
    pub species: SpeciesTable,
}

impl PartialConvertConfig {
    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Io`] if the file cannot be read and
    /// [`CliError::FileParsing`] on invalid TOML or unknown keys.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Species precedence: built-in table, then `[species]` from the config
    /// file, then the `--species` file. Numeric settings from the CLI win
    /// over the config file.
    pub fn merge_with_cli(self, args: &ConvertArgs) -> Result<ResolvedConvertConfig> {
        let section = self.convert.unwrap_or_default();

        let mut builder = ConvertConfigBuilder::new();
        if let Some(lines) = args.flush_lines.or(section.flush_lines) {
            builder = builder.flush_threshold(lines);
        }
        if let Some(bytes) = section.io_buffer_bytes {
            builder = builder.io_buffer_capacity(bytes);
        }
        let config = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let mut species = SpeciesTable::builtin();
        if let Some(entries) = self.species {
            debug!("Applying {} species mapping(s) from config file", entries.len());
            species.extend(entries);
        }
        if let Some(path) = &args.species {
            let count = species.load_overrides(path)?;
            info!("Loaded {} species mapping(s) from {:?}", count, path);
        }

        Ok(ResolvedConvertConfig { config, species })
    }
}
