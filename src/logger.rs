use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger};

use crate::config::{Config, Log, LogLevel};

const KEPT_LOG_FILES: usize = 60;

fn to_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Critical => Level::Critical,
        LogLevel::Error => Level::Error,
        LogLevel::Warn => Level::Warn,
        LogLevel::Info => Level::Info,
        LogLevel::Debug => Level::Debug,
        LogLevel::Trace => Level::Trace,
    }
}

fn console_sink(stream: StdStream, filter: LevelFilter) -> spdlog::Result<Arc<StdStreamSink>> {
    let sink = StdStreamSink::builder()
        .std_stream(stream)
        .level_filter(filter)
        .build()?;
    Ok(Arc::new(sink))
}

/// Warnings and errors go to stderr, the rest to stdout.
pub fn build_logger(log: &Log) -> spdlog::Result<Logger> {
    let mut builder = Logger::builder();

    if let Some(ref location) = log.location {
        let file_sink = RotatingFileSink::builder()
            .base_path(location)
            .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
            .max_files(KEPT_LOG_FILES)
            .rotate_on_open(false)
            .build()?;
        builder.sink(Arc::new(file_sink));
    }

    if log.log_to_console {
        builder
            .sink(console_sink(StdStream::Stdout, LevelFilter::MoreVerbose(Level::Warn))?)
            .sink(console_sink(StdStream::Stderr, LevelFilter::MoreSevereEqual(Level::Warn))?);
    }

    let logger = builder.build()?;
    logger.set_level_filter(LevelFilter::MoreSevereEqual(to_level(log.level)));
    Ok(logger)
}

/// Without a `[log]` section the default spdlog console logger stays in place.
pub fn configure_logger(config: &Config) -> spdlog::Result<()> {
    let Some(ref log) = config.log else {
        return Ok(());
    };

    let logger = Arc::new(build_logger(log)?);
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Info));
    logger.set_flush_period(Some(Duration::from_secs(2)));
    spdlog::set_default_logger(logger);

    Ok(())
}
