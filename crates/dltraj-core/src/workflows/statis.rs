use crate::core::io::statis::{StatisError, StatisFile, StatisMetadata, StatisSteps};
use crate::core::io::traits::LogFile;
use std::path::Path;
use tracing::{info, instrument};

pub const DEFAULT_STATIS_FILE: &str = "STATIS";
pub const DEFAULT_DIRECTORY: &str = "./";
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Reads `<directory>/<filename>` in reads of `chunk_size` bytes.
///
/// The whole file is held in memory; every step must carry exactly the
/// declared number of points or nothing is returned.
#[instrument(skip_all, name = "statis_workflow")]
pub fn read_statistics(
    filename: &str,
    directory: &Path,
    chunk_size: usize,
) -> Result<(StatisMetadata, StatisSteps), StatisError> {
    let path = directory.join(filename);
    if !path.is_file() {
        return Err(StatisError::FileNotFound { path });
    }
    if chunk_size == 0 {
        return Err(StatisError::InvalidArgument(
            "chunk size must be a positive integer".to_string(),
        ));
    }

    let (metadata, steps) = StatisFile::read_from_path_with_capacity(&path, chunk_size)?;
    info!(
        "Read {} step(s) of {} point(s) from {:?}",
        metadata.n_steps, metadata.n_points, path
    );
    Ok((metadata, steps))
}
