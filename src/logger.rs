use std::error::Error;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::fs;

use crate::config::{Config, DEFAULT_DIRECTORY};
use crate::error::LoggerError;
use crate::exchange::{Request, Response};
use crate::sink::{FileSink, ObservedSink, Sink, SinkPaths};

/// Closes every error-log entry.
pub const SEPARATOR: &str = "----------------------------------------------------------------";

/// Body sent by the handler returned from `Logger::internal_error`.
pub const INCIDENT_BODY: &str = "This incident has been logged and will be fixed soon!";

#[cfg(unix)]
const DIRECTORY_MODE: u32 = 0o740;

/// Writes error, access and console entries to three append-only files and
/// mirrors console entries to stdout.
///
/// Sinks stay unopened until [`Logger::init`] succeeds; writes made before
/// that are dropped. Every failed sink write is reported on the console
/// mirror.
pub struct Logger {
    directory: PathBuf,
    paths: SinkPaths,
    error_count: u64,
    access_count: u64,
    error_sink: ObservedSink,
    access_sink: ObservedSink,
    console_sink: ObservedSink,
    echo: Box<dyn Write + Send>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Self {
        Self::with_directory(DEFAULT_DIRECTORY)
    }

    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            paths: SinkPaths::default(),
            error_count: 0,
            access_count: 0,
            error_sink: ObservedSink::unopened("Error"),
            access_sink: ObservedSink::unopened("Access"),
            console_sink: ObservedSink::unopened("Console"),
            echo: Box::new(io::stdout()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_directory(&config.directory).with_sink_paths(config.sink_paths())
    }

    pub fn with_sink_paths(mut self, paths: SinkPaths) -> Self {
        self.paths = paths;
        self
    }

    /// Replaces stdout as the destination of the console mirror and of sink
    /// error reports.
    pub fn with_echo(mut self, echo: impl Write + Send + 'static) -> Self {
        self.echo = Box::new(echo);
        self
    }

    /// Installs already-open sinks. A later `init` replaces them with files.
    pub fn with_sinks(
        mut self,
        error: Box<dyn Sink>,
        access: Box<dyn Sink>,
        console: Box<dyn Sink>,
    ) -> Self {
        self.install(error, access, console);
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn sink_paths(&self) -> &SinkPaths {
        &self.paths
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn access_count(&self) -> u64 {
        self.access_count
    }

    /// Ensures the logs directory exists, then opens the three log files.
    ///
    /// Nothing is installed unless all three files open.
    pub async fn init(&mut self) -> Result<bool, LoggerError> {
        ensure_directory(&self.directory).await?;

        let error = FileSink::open(&self.paths.error)?;
        let access = FileSink::open(&self.paths.access)?;
        let console = FileSink::open(&self.paths.console)?;
        self.install(Box::new(error), Box::new(access), Box::new(console));

        println!("Created Log Streams, switching to logger");
        Ok(true)
    }

    fn install(&mut self, error: Box<dyn Sink>, access: Box<dyn Sink>, console: Box<dyn Sink>) {
        self.error_sink = ObservedSink::new("Error", error);
        self.access_sink = ObservedSink::new("Access", access);
        self.console_sink = ObservedSink::new("Console", console);
    }

    /// Display timestamp such as `03-07 1542`.
    pub fn timestamp(&self) -> String {
        Local::now().format("%m-%d %H%M").to_string()
    }

    pub fn error(&mut self, args: &[&dyn Display]) {
        let timestamp = self.timestamp();
        let count = self.error_count;

        self.error_sink.write(
            &format!("[{}]{} {}\n{}\n", count, timestamp, concat(args), SEPARATOR),
            &mut self.echo,
        );
        self.console_sink.write(
            &format!("[{}]{} Error encountered\n", count, timestamp),
            &mut self.echo,
        );

        self.log(&[&format!("[{}] Error", count)]);
        self.error_count += 1;
    }

    pub fn access<R: Request + ?Sized>(&mut self, signature: impl Display, req: &R) {
        let timestamp = self.timestamp();
        let count = self.access_count;

        let mut entry = format!(
            "[{}]{} ({}) {}\n",
            count,
            timestamp,
            signature,
            req.remote_address()
        );
        entry.push_str(&to_json(req.params()));
        entry.push('\n');
        entry.push_str(&to_json(req.query()));
        entry.push('\n');
        if let Some(body) = req.body() {
            entry.push_str(&body.to_string());
            entry.push('\n');
        }
        self.access_sink.write(&entry, &mut self.echo);

        self.log(&[&format!("[{}] Access", count)]);
        self.access_count += 1;
    }

    /// Appends a timestamped line to the console log and echoes it.
    pub fn log(&mut self, args: &[&dyn Display]) {
        let timestamp = self.timestamp();
        self.console_sink
            .write(&format!("{} {}\n", timestamp, concat(args)), &mut self.echo);

        let mut line = timestamp;
        for arg in args {
            line.push(' ');
            line.push_str(&arg.to_string());
        }
        if let Err(err) = writeln!(self.echo, "{}", line) {
            eprintln!("failed to echo log line: {}", err);
        }
    }

    /// Records a failed request as up to three separate error entries:
    /// the error chain, then the params, then the body.
    pub fn errored_request<R: Request + ?Sized>(&mut self, err: &dyn Error, req: &R) {
        self.error(&[&"Request errored: ", &error_chain(err)]);

        if let Some(params) = present(req.params()) {
            self.error(&[params]);
        }
        if let Some(body) = present(req.body()) {
            self.error(&[body]);
        }
    }

    /// Returns a handler that logs `<id>: <err>` and answers `res` with a 500.
    pub fn internal_error<'a, S: Response + ?Sized>(
        &'a mut self,
        id: impl Display + 'a,
        res: &'a mut S,
    ) -> impl FnMut(&dyn Display) + 'a {
        move |err: &dyn Display| {
            self.error(&[&format!("{}: {}", id, err)]);
            res.send_status(StatusCode::INTERNAL_SERVER_ERROR, INCIDENT_BODY);
        }
    }
}

async fn ensure_directory(dir: &Path) -> Result<(), LoggerError> {
    match fs::metadata(dir).await {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => create_directory(dir).await,
        Err(source) => {
            println!("Unexpected error while stating logs directory: {}", source);
            Err(LoggerError::StatDirectory {
                path: dir.to_path_buf(),
                source,
            })
        }
    }
}

async fn create_directory(dir: &Path) -> Result<(), LoggerError> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    builder.mode(DIRECTORY_MODE);

    builder.create(dir).await.map_err(|source| {
        println!("{}", source);
        LoggerError::CreateDirectory {
            path: dir.to_path_buf(),
            source,
        }
    })
}

fn concat(args: &[&dyn Display]) -> String {
    args.iter().map(|arg| arg.to_string()).collect()
}

fn to_json(value: Option<&Value>) -> String {
    value.unwrap_or(&Value::Null).to_string()
}

/// Drops values a request does not really carry: `null`, `false`, `0` and `""`.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

fn error_chain(err: &dyn Error) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str("\nCaused by: ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}
