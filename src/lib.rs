//! Append-only error, access and console logs for a request-serving process.

pub mod config;
pub mod error;
pub mod exchange;
pub mod logger;
pub mod service;
pub mod sink;

pub use config::Config;
pub use error::LoggerError;
pub use exchange::{Request, RequestRecord, Response, ResponseRecord};
pub use logger::Logger;
pub use service::RequestService;
pub use sink::{FileSink, ObservedSink, Sink, SinkPaths};
