use super::traits::LogFile;
use std::io::{self, BufRead};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, trace};

const STATIS_LABELS: [&str; 27] = [
    "total extended system energy",
    "system temperature",
    "configurational energy",
    "VdW/metal/Tersoff energy",
    "electrostatic energy",
    "chemical bond energy",
    "valence angle/3-body potential energy",
    "dihedral/inversion/four body energy",
    "tethering energy",
    "enthalpy (total energy + PV)",
    "rotational temperature",
    "total virial",
    "VdW/metal/Tersoff virial",
    "electrostatic virial",
    "bond virial",
    "valence angle/3-body virial",
    "constraint virial",
    "tethering virial",
    "volume",
    "core-shell temperature",
    "core-shell potential energy",
    "core-shell virial",
    "MD cell angle α",
    "MD cell angle β",
    "MD cell angle γ",
    "Potential of Mean Force virial",
    "pressure",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisMetadata {
    pub system_name: String,
    pub units: String,
    pub n_points: usize,
    pub n_steps: usize,
}

pub type StatisSteps = Vec<Vec<f64>>;

#[derive(Debug, Error)]
pub enum StatisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("STATIS file not found: {path}", path = path.display())]
    FileNotFound { path: PathBuf },
    #[error("Malformed header on line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },
    #[error("Invalid float '{value}' on line {line}")]
    ValueParse { line: usize, value: String },
    #[error(
        "Not all data sets have {n_points} values (found lengths {lengths:?}), is the STATIS file valid?"
    )]
    InvalidData {
        n_points: usize,
        lengths: Vec<usize>,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Returns the descriptions of the first 27 columns of every STATIS step.
///
/// Columns after `pressure` depend on the simulated system and carry no label.
pub fn statis_names() -> &'static [&'static str] {
    &STATIS_LABELS
}

/// Pairs the leading values of a step with their column descriptions.
pub fn label_step(step: &[f64]) -> impl Iterator<Item = (&'static str, f64)> + '_ {
    STATIS_LABELS.iter().copied().zip(step.iter().copied())
}

/// Returns `true` if the last raw token of `line` equals `marker`, the textual
/// form of the per-step point count. Such a line closes the current step.
///
/// The comparison is textual: a data value that happens to print exactly as
/// the point count also closes the step.
pub fn is_step_boundary(line: &str, marker: &str) -> bool {
    line.split_whitespace().next_back() == Some(marker)
}

pub struct StatisFile;

impl StatisFile {
    fn read_header(
        lines: &mut impl Iterator<Item = io::Result<String>>,
    ) -> Result<(String, String, usize), StatisError> {
        let mut next_line = |line: usize| -> Result<String, StatisError> {
            lines.next().transpose()?.ok_or(StatisError::MalformedHeader {
                line,
                reason: "unexpected end of file".to_string(),
            })
        };

        let system_name = next_line(1)?.trim().to_string();
        let units = next_line(2)?
            .trim()
            .rsplit('=')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        let count_line = next_line(3)?;
        let count_token =
            count_line
                .split_whitespace()
                .next_back()
                .ok_or(StatisError::MalformedHeader {
                    line: 3,
                    reason: "missing number of data points".to_string(),
                })?;
        let n_points = count_token
            .parse()
            .map_err(|_| StatisError::MalformedHeader {
                line: 3,
                reason: format!("invalid number of data points '{}'", count_token),
            })?;

        Ok((system_name, units, n_points))
    }
}

impl LogFile for StatisFile {
    type Output = (StatisMetadata, StatisSteps);
    type Error = StatisError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut lines = reader.lines();
        let (system_name, units, n_points) = Self::read_header(&mut lines)?;
        debug!(
            "STATIS header: system '{}', units '{}', {} points per step",
            system_name, units, n_points
        );

        let marker = n_points.to_string();
        let mut steps: StatisSteps = Vec::new();
        let mut current: Vec<f64> = Vec::with_capacity(n_points);

        for (offset, line_res) in lines.enumerate() {
            let line = line_res?;
            let line_num = offset + 4;
            if line.trim().is_empty() {
                continue;
            }

            for token in line.split_whitespace() {
                let value: f64 = token.parse().map_err(|_| StatisError::ValueParse {
                    line: line_num,
                    value: token.to_string(),
                })?;
                current.push(value);
            }

            if is_step_boundary(&line, &marker) {
                trace!("Step {} closed on line {}", steps.len() + 1, line_num);
                steps.push(std::mem::replace(
                    &mut current,
                    Vec::with_capacity(n_points),
                ));
            }
        }
        if !current.is_empty() {
            steps.push(current);
        }
        if steps.is_empty() {
            return Err(StatisError::InvalidData {
                n_points,
                lengths: Vec::new(),
            });
        }

        let bad_lengths: Vec<usize> = steps
            .iter()
            .map(Vec::len)
            .filter(|&len| len != n_points)
            .collect();
        if !bad_lengths.is_empty() {
            return Err(StatisError::InvalidData {
                n_points,
                lengths: bad_lengths,
            });
        }

        let metadata = StatisMetadata {
            system_name,
            units,
            n_points,
            n_steps: steps.len(),
        };
        Ok((metadata, steps))
    }
}
