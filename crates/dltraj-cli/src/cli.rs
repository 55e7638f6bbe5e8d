use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dltraj - convert DL_POLY HISTORY trajectories to extended XYZ and inspect STATIS logs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO and frame progress, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a HISTORY trajectory into an extended XYZ trajectory.
    Convert(ConvertArgs),
    /// Read a STATIS file and print a summary of its steps.
    Statis(StatisArgs),
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input HISTORY file, or a directory containing one.
    #[arg(short, long, default_value = "HISTORY", value_name = "PATH")]
    pub input: PathBuf,

    /// Output XYZ file.
    #[arg(short, long, default_value = "traj.xyz", value_name = "PATH")]
    pub output: PathBuf,

    /// Write the output file into the directory of the input file.
    #[arg(long)]
    pub samepath: bool,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// TOML file with additional `label = "Element"` species mappings.
    #[arg(long, value_name = "PATH")]
    pub species: Option<PathBuf>,

    /// Number of output lines buffered in memory between writes.
    #[arg(long, value_name = "LINES")]
    pub flush_lines: Option<usize>,
}

/// Arguments for the `statis` subcommand.
#[derive(Args, Debug)]
pub struct StatisArgs {
    /// Name of the STATIS file.
    #[arg(short, long, default_value = "STATIS", value_name = "NAME")]
    pub file: String,

    /// Directory containing the STATIS file.
    #[arg(short, long, default_value = "./", value_name = "DIR")]
    pub dir: PathBuf,

    /// Read buffer size in bytes.
    #[arg(long, default_value_t = 1024, value_name = "BYTES")]
    pub chunk_size: usize,

    /// Print the labelled values of one step (1-based).
    #[arg(long, value_name = "STEP")]
    pub step: Option<usize>,
}
