use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::error::LoggerError;

/// Append-only destination for log text.
pub trait Sink: Send {
    fn write_str(&mut self, content: &str) -> io::Result<()>;
}

/// A log file opened once in append mode and held until dropped.
pub struct FileSink {
    file: File,
}

impl FileSink {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoggerError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LoggerError::OpenSink {
                path: path.clone(),
                source,
            })?;
        Ok(Self { file })
    }
}

impl Sink for FileSink {
    fn write_str(&mut self, content: &str) -> io::Result<()> {
        self.file.write_all(content.as_bytes())
    }
}

/// Placeholder held by a `Logger` until `init` opens the real files.
struct Unopened;

impl Sink for Unopened {
    fn write_str(&mut self, _content: &str) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::NotConnected,
            "log stream is not open; call init first",
        ))
    }
}

/// Wraps a sink so that write failures are reported and dropped.
pub struct ObservedSink {
    name: &'static str,
    inner: Box<dyn Sink>,
}

impl ObservedSink {
    pub fn new(name: &'static str, inner: Box<dyn Sink>) -> Self {
        Self { name, inner }
    }

    pub fn unopened(name: &'static str) -> Self {
        Self::new(name, Box::new(Unopened))
    }

    /// Returns whether the write reached the inner sink. Failures are
    /// reported on `report` as `<Name> stream encountered error: <err>`.
    pub fn write(&mut self, content: &str, report: &mut dyn Write) -> bool {
        match self.inner.write_str(content) {
            Ok(()) => true,
            Err(err) => {
                if let Err(report_err) =
                    writeln!(report, "{} stream encountered error: {}", self.name, err)
                {
                    eprintln!("failed to report {} stream error: {}", self.name, report_err);
                }
                false
            }
        }
    }
}

/// Locations of the error, access and console log files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkPaths {
    pub error: PathBuf,
    pub access: PathBuf,
    pub console: PathBuf,
}

impl SinkPaths {
    pub fn within(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            error: dir.join("error.log"),
            access: dir.join("access.log"),
            console: dir.join("console.log"),
        }
    }
}

impl Default for SinkPaths {
    // Fixed relative paths, independent of the configured directory.
    fn default() -> Self {
        Self {
            error: PathBuf::from("logs/error.log"),
            access: PathBuf::from("logs/access.log"),
            console: PathBuf::from("logs/console.log"),
        }
    }
}
