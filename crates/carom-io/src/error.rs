use std::path::PathBuf;

use ndarray_npy::{ReadNpyError, WriteNpyError};

/// Custom error types
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    /// Failed to open or create a snapshot file.
    #[error("{path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create a snapshot directory.
    #[error("creating {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A dataset failed to parse as the expected npy array.
    #[error("reading `{name}`: {source}")]
    Read {
        name: String,
        source: ReadNpyError,
    },

    /// A dataset could not be written.
    #[error("writing `{name}`: {source}")]
    Write {
        name: String,
        source: WriteNpyError,
    },

    /// A dataset length disagrees with its declared shape.
    #[error("dataset `{name}` has {found} entries, expected {expected}")]
    Shape {
        name: String,
        expected: usize,
        found: usize,
    },
}
