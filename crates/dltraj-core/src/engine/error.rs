use crate::core::io::history::HeaderError;
use crate::core::species::UnknownSpeciesError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("HISTORY file not found: {path}", path = path.display())]
    FileNotFound { path: PathBuf },

    #[error("Malformed HISTORY header on line {line}: {reason}")]
    MalformedHeader { line: usize, reason: HeaderError },

    #[error(transparent)]
    UnknownSpecies(#[from] UnknownSpeciesError),

    #[error("Invalid float '{value}' on line {line}")]
    ValueParse { line: usize, value: String },

    #[error("Line {line} has {found} values, expected {expected}")]
    MalformedRecord {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unexpected end of file: {expected}")]
    Truncated { expected: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
