//! Tracing subscriber setup for the flux-app-generator binaries.
//!
//! Everything is driven by environment variables so the CLI surface stays
//! free of logging flags:
//!
//! | Variable          | Values                               | Default                 |
//! |-------------------|--------------------------------------|-------------------------|
//! | `RUST_LOG`        | any `EnvFilter` directive            | unset                   |
//! | `FLUX_LOG_LEVEL`  | `trace` .. `error`                   | `warn`                  |
//! | `FLUX_LOG_OUTPUT` | `console`, `file`, `both`, `none`    | `console`               |
//! | `FLUX_LOG_FORMAT` | `human`, `json`                      | `human`                 |
//! | `FLUX_LOG_FILE`   | path of the rolling log file         | `/tmp/flux-app-generator.log` |
//!
//! Console output goes to stderr because stdout belongs to the interactive
//! prompts and the generation summary.

use std::{env, io, path::Path};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::writer::MakeWriterExt, prelude::*, registry, EnvFilter};

const DEFAULT_LOG_FILE: &str = "/tmp/flux-app-generator.log";

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
    None,
}

impl LogOutput {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            "none" | "off" => LogOutput::None,
            _ => LogOutput::Console,
        }
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: String,
    pub output: LogOutput,
    pub json: bool,
    pub file_path: String,
}

impl LogSettings {
    /// Read settings from the environment. `level_override` (e.g. from a
    /// `--debug` flag) wins over `FLUX_LOG_LEVEL`.
    pub fn from_env(level_override: Option<&str>) -> Self {
        let level = level_override
            .map(str::to_string)
            .or_else(|| env::var("FLUX_LOG_LEVEL").ok())
            .unwrap_or_else(|| "warn".to_string());
        let output = LogOutput::parse(&env::var("FLUX_LOG_OUTPUT").unwrap_or_default());
        let json = env::var("FLUX_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
        let file_path = env::var("FLUX_LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

        Self {
            level,
            output,
            json,
            file_path,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        // An explicit override must beat RUST_LOG, otherwise --debug would be ignored.
        if self.level != "warn" {
            return EnvFilter::new(&self.level);
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Initializes the global tracing subscriber.
///
/// Returns the guard of the non-blocking file writer when file output is
/// enabled; it must be held until the program exits or buffered lines are lost.
pub fn init_subscriber(level_override: Option<&str>) -> Option<WorkerGuard> {
    init_with(LogSettings::from_env(level_override))
}

pub fn init_with(settings: LogSettings) -> Option<WorkerGuard> {
    let subscriber = registry().with(settings.env_filter());

    let log_path = Path::new(&settings.file_path);
    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("/tmp"));
    let log_filename = log_path
        .file_name()
        .unwrap_or("flux-app-generator.log".as_ref());

    match settings.output {
        LogOutput::None => {
            let _ = subscriber.try_init();
            None
        }
        LogOutput::Console => {
            let layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
            if settings.json {
                let _ = subscriber.with(layer.json()).try_init();
            } else {
                let _ = subscriber.with(layer.compact()).try_init();
            }
            None
        }
        LogOutput::File | LogOutput::Both => {
            let appender = tracing_appender::rolling::daily(log_dir, log_filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            if settings.output == LogOutput::Both {
                let writer = io::stderr.and(non_blocking);
                let layer = tracing_subscriber::fmt::layer().with_writer(writer);
                if settings.json {
                    let _ = subscriber.with(layer.json()).try_init();
                } else {
                    let _ = subscriber.with(layer.compact()).try_init();
                }
            } else {
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false);
                if settings.json {
                    let _ = subscriber.with(layer.json()).try_init();
                } else {
                    let _ = subscriber.with(layer.compact()).try_init();
                }
            }
            Some(guard)
        }
    }
}
