//! Error types for the stream layer.

use std::io;
use thiserror::Error;

/// Errors reported while pumping stdin to stdout.
///
/// None of these abort the process. They are logged and folded into the
/// pump and shutdown reports.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("error reading from stdin: {0}")]
    Read(#[source] io::Error),

    #[error("error writing to stdout: {0}")]
    Write(#[source] io::Error),

    #[error("error flushing to stdout: {0}")]
    Flush(#[source] io::Error),

    #[error("stream pump task failed: {0}")]
    Task(String),
}

impl StreamError {
    /// True when the reader on the other end of stdout has gone away.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            StreamError::Write(err) | StreamError::Flush(err) => is_broken_pipe(err),
            _ => false,
        }
    }
}

impl From<tokio::task::JoinError> for StreamError {
    fn from(err: tokio::task::JoinError) -> Self {
        StreamError::Task(err.to_string())
    }
}

/// The output's reader closed its end, on write or on flush alike.
pub(crate) fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

pub type Result<T> = std::result::Result<T, StreamError>;
