//! Error types for index construction and clustering.

use thiserror::Error;

/// Errors that can occur while building an index or running the clusterer.
///
/// Approximate search returning fewer results than requested is *not* an
/// error; callers get a shorter (possibly empty) result instead. The same
/// holds for a range query that matches nothing.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameter value (zero projection dimension, amplification
    /// order outside `1..=32`, cluster count exceeding the dataset size).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Malformed dataset: non-uniform vector lengths, bad magic bytes,
    /// truncated payload.
    #[error("dataset format error: {0}")]
    DatasetFormat(String),

    /// An index or clusterer was asked to build over zero vectors.
    #[error("dataset is empty")]
    EmptyDataset,

    /// I/O failure while reading a dataset file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
