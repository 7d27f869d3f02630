use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Where in the stream an I/O failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoContext {
    pub byte_pos: u64,
    pub chunk_num: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("buffer size must be a positive integer, got 0")]
    ZeroBufferSize,
    #[error("buffer size must be a positive integer, got {0:?}")]
    MalformedBufferSize(String),
    #[error("line separator must not be empty")]
    EmptySeparator,
    #[error("no file path given")]
    MissingPath,
    #[error("line separator cannot be used in a pattern: {0}")]
    SeparatorPattern(String),
    #[error("gzip input requested but the `gzip` feature is disabled")]
    GzipDisabled,
}

#[derive(Debug, Error)]
pub enum CountError {
    #[error("cannot open {path:?}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid option: {0}")]
    InvalidOption(#[from] OptionError),
    #[error("I/O error at {ctx:?}: {source}")]
    Io {
        #[source]
        source: io::Error,
        ctx: IoContext,
    },
}

impl CountError {
    pub(crate) fn io_err(source: io::Error, ctx: IoContext) -> Self {
        Self::Io { source, ctx }
    }
    pub(crate) fn not_found(source: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            path: path.into(),
            source,
        }
    }
}
