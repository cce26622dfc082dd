// Error types for the board engine, configuration and the terminal front end

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the board engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Size or mine count outside `size > 0` and `0 < mines < size * size`,
    /// or a mine list with duplicates.
    #[error("invalid board configuration: {mines} mines on a {size}x{size} board")]
    InvalidConfiguration {
        /// Requested side length.
        size: usize,
        /// Requested mine count.
        mines: usize,
    },

    /// A coordinate outside `[0, size) x [0, size)`.
    #[error("coordinate ({row}, {col}) out of range for a {size}x{size} board")]
    CoordinateOutOfRange {
        /// Offending row.
        row: usize,
        /// Offending column.
        col: usize,
        /// Board side length.
        size: usize,
    },
}

/// Errors from loading or saving the TOML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no usable configuration directory")]
    NoConfigDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("configured board is unplayable: {0}")]
    Board(#[from] BoardError),
}

/// Errors surfaced by the terminal front end.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
