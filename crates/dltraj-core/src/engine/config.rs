use thiserror::Error;

pub const DEFAULT_FLUSH_THRESHOLD: usize = 1_000_000;
pub const DEFAULT_IO_BUFFER_CAPACITY: usize = 1 << 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

/// Tuning knobs of a HISTORY conversion. Neither affects the output bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Number of formatted output lines held in memory before they are written.
    pub flush_threshold: usize,
    /// Capacity in bytes of the buffered reader and writer around the files.
    pub io_buffer_capacity: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            io_buffer_capacity: DEFAULT_IO_BUFFER_CAPACITY,
        }
    }
}

/// Builds a [`ConvertConfig`], falling back to the defaults for unset fields.
#[derive(Default)]
pub struct ConvertConfigBuilder {
    flush_threshold: Option<usize>,
    io_buffer_capacity: Option<usize>,
}

impl ConvertConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flush_threshold(mut self, lines: usize) -> Self {
        self.flush_threshold = Some(lines);
        self
    }

    pub fn io_buffer_capacity(mut self, bytes: usize) -> Self {
        self.io_buffer_capacity = Some(bytes);
        self
    }

    /// Validates the settings and produces the config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] if either value is zero.
    pub fn build(self) -> Result<ConvertConfig, ConfigError> {
        let flush_threshold = self.flush_threshold.unwrap_or(DEFAULT_FLUSH_THRESHOLD);
        if flush_threshold == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "flush_threshold",
                reason: "must be at least one line",
            });
        }
        let io_buffer_capacity = self
            .io_buffer_capacity
            .unwrap_or(DEFAULT_IO_BUFFER_CAPACITY);
        if io_buffer_capacity == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "io_buffer_capacity",
                reason: "must be at least one byte",
            });
        }
        Ok(ConvertConfig {
            flush_threshold,
            io_buffer_capacity,
        })
    }
}
