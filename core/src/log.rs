//! Logger and logging macros
//!
//! The macros forward to the `log` facade, so crates using them must depend on `log`.
//! [`init_logger`] wires the facade to `log4rs`.

mod appender;
mod consts;
mod logger;

pub use consts::DEFAULT_LOGGER_ENV;

use appender::AppenderSpec;
use consts::{ERR_LOG_FILE_NAME, LOG_FILE_NAME};
use log::LevelFilter;
use log4rs::{Config, config::Root};
use std::path::Path;
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum LogError {
    #[error("Logger spec parsing error: {0}")]
    ParseLoggerSpecError(String),

    #[error("log directory {0} is not a valid UTF-8 path")]
    InvalidLogDir(String),

    #[error("failed building appender {0}: {1}")]
    Appender(&'static str, String),

    #[error("invalid logger configuration: {0}")]
    Config(String),

    #[error("logger initialization failed: {0}")]
    Init(String),
}

const CONSOLE_APPENDER: &str = "stdout";
const LOG_FILE_APPENDER: &str = "log_file";
const ERR_LOG_FILE_APPENDER: &str = "err_log_file";

/// Initializes the global logger with a console appender and, when `log_dir` is given,
/// a rolling log file plus a rolling warnings-and-errors file.
///
/// `filters` is a `RUST_LOG`-style expression applied on top of the `RUST_LOG`
/// environment variable and an `info` root level.
pub fn init_logger(log_dir: Option<&Path>, filters: &str) -> Result<(), LogError> {
    let mut appenders = vec![AppenderSpec::console(CONSOLE_APPENDER, None)];
    if let Some(log_dir) = log_dir {
        appenders.push(AppenderSpec::roller(LOG_FILE_APPENDER, None, log_dir, LOG_FILE_NAME)?);
        appenders.push(AppenderSpec::roller(ERR_LOG_FILE_APPENDER, Some(LevelFilter::Warn), log_dir, ERR_LOG_FILE_NAME)?);
    }
    let names = appenders.iter().map(|x| x.name).collect::<Vec<_>>();

    let mut builder = logger::Builder::new();
    let loggers = builder.root_level(LevelFilter::Info).parse_env(DEFAULT_LOGGER_ENV).parse_expression(filters).build();
    let rejected = builder.take_rejected();

    let config = Config::builder()
        .appenders(appenders.into_iter().map(|x| x.appender()))
        .loggers(loggers.items())
        .build(Root::builder().appenders(names).build(loggers.root_level()))
        .map_err(|err| LogError::Config(err.to_string()))?;
    log4rs::init_config(config).map_err(|err| LogError::Init(err.to_string()))?;

    for err in rejected {
        log::warn!("Ignoring invalid logging spec: {}", err);
    }
    Ok(())
}

#[macro_export]
macro_rules! trace {
    ($($t:tt)*) => {
        ::log::trace!($($t)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => {
        ::log::debug!($($t)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => {
        ::log::info!($($t)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($t:tt)*) => {
        ::log::warn!($($t)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => {
        ::log::error!($($t)*)
    };
}
