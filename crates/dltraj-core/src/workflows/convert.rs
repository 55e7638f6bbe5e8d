use crate::core::species::SpeciesTable;
use crate::engine::config::ConvertConfig;
use crate::engine::converter::{self, ConversionSummary};
use crate::engine::error::ConvertError;
use crate::engine::progress::ProgressReporter;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

pub const DEFAULT_INPUT: &str = "HISTORY";
pub const DEFAULT_OUTPUT: &str = "traj.xyz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub summary: ConversionSummary,
}

/// Resolves the HISTORY file and XYZ destination.
///
/// A directory input stands for `<dir>/HISTORY`. With `same_path`, only the
/// file name of `output` is kept and placed next to the resolved input.
pub fn resolve_paths(input: &Path, output: &Path, same_path: bool) -> (PathBuf, PathBuf) {
    let input = if input.is_dir() {
        input.join(DEFAULT_INPUT)
    } else {
        input.to_path_buf()
    };

    let output = if same_path {
        let file_name = output
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        match input.parent() {
            Some(dir) => dir.join(file_name),
            None => file_name,
        }
    } else {
        output.to_path_buf()
    };

    (input, output)
}

#[instrument(skip_all, name = "convert_workflow")]
pub fn run(
    input: &Path,
    output: &Path,
    same_path: bool,
    species: &SpeciesTable,
    config: &ConvertConfig,
    reporter: &ProgressReporter,
) -> Result<ConvertOutcome, ConvertError> {
    let (input, output) = resolve_paths(input, output, same_path);
    if !input.is_file() {
        return Err(ConvertError::FileNotFound { path: input });
    }
    info!("Converting {:?} to {:?}", input, output);

    let reader = BufReader::with_capacity(config.io_buffer_capacity, File::open(&input)?);
    let writer = BufWriter::with_capacity(config.io_buffer_capacity, File::create(&output)?);
    let summary = converter::convert(reader, writer, species, config, reporter)?;

    Ok(ConvertOutcome {
        input,
        output,
        summary,
    })
}
