use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort `Logger::init`. Sink write errors never surface here.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("failed to stat logs directory {path:?}: {source}")]
    StatDirectory { path: PathBuf, source: io::Error },

    #[error("failed to create logs directory {path:?}: {source}")]
    CreateDirectory { path: PathBuf, source: io::Error },

    #[error("failed to open log file {path:?}: {source}")]
    OpenSink { path: PathBuf, source: io::Error },
}

#[cfg(test)]
impl LoggerError {
    pub(crate) fn io_kind(&self) -> io::ErrorKind {
        match self {
            LoggerError::StatDirectory { source, .. }
            | LoggerError::CreateDirectory { source, .. }
            | LoggerError::OpenSink { source, .. } => source.kind(),
        }
    }
}
