//! Subscriber installation for the bot process.
//!
//! Every crate logs through `tracing`. [`init_from_config`] turns the
//! `[logging]` table of [`AginahConfig`] into a `tracing-subscriber` stack,
//! once per process. Dispatch runs inside one `dispatch` span per event, so
//! `span_events = { new = true, close = true }` shows each event's lifetime.
//!
//! ```toml
//! dev_mode = true          # at least `debug`
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! output = "file"
//! file_path = "logs/bot.log"
//!
//! [logging.filters]
//! aginah_framework = "trace"
//! ```
//!
//! `RUST_LOG`, when set, replaces the base level; per-module filters from the
//! configuration still apply on top of it.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{AginahConfig, LogFormat, LogOutput, SpanEventConfig};

const DEFAULT_LOG_FILE: &str = "aginah.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Installs the global subscriber described by `config`.
///
/// Does nothing if a subscriber is already installed, which keeps repeated
/// runtime builds (tests, embedded bots) harmless.
pub fn init_from_config(config: &AginahConfig) {
    if let Err(err) = LogSetup::new(config).install() {
        debug!(error = %err, "Global subscriber already installed");
    }
}

/// Where log lines go once the configuration has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Sink {
    Stdout,
    Stderr,
    File(PathBuf),
}

/// The subscriber settings derived from one [`AginahConfig`].
#[derive(Debug, Clone)]
pub struct LogSetup {
    level: &'static str,
    filters: Vec<String>,
    format: LogFormat,
    sink: Sink,
    /// Set when `output = "file"` had no path and stdout was used instead.
    missing_path: bool,
    spans: FmtSpan,
    thread_ids: bool,
    file_location: bool,
}

impl LogSetup {
    pub fn new(config: &AginahConfig) -> Self {
        let logging = &config.logging;

        let mut filters: Vec<String> = logging
            .filters
            .iter()
            .map(|(module, level)| format!("{module}={level}"))
            .collect();
        filters.sort();

        let (sink, missing_path) = match (logging.output, &logging.file_path) {
            (LogOutput::Stdout, _) => (Sink::Stdout, false),
            (LogOutput::Stderr, _) => (Sink::Stderr, false),
            (LogOutput::File, Some(path)) => (Sink::File(path.clone()), false),
            (LogOutput::File, None) => (Sink::Stdout, true),
        };

        Self {
            level: config.effective_log_level().as_str(),
            filters,
            format: logging.format,
            sink,
            missing_path,
            spans: span_events(&logging.span_events),
            thread_ids: logging.thread_ids,
            file_location: logging.file_location,
        }
    }

    /// Installs the subscriber, failing if one is already set.
    pub fn install(self) -> Result<(), TryInitError> {
        let layer = self.fmt_layer(self.make_writer());
        tracing_subscriber::registry()
            .with(layer)
            .with(self.env_filter())
            .try_init()?;

        if self.missing_path {
            warn!("Logging to a file needs `logging.file_path`; writing to stdout instead");
        }
        Ok(())
    }

    fn env_filter(&self) -> EnvFilter {
        let base =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level));
        self.filters
            .iter()
            .filter_map(|directive| directive.parse::<Directive>().ok())
            .fold(base, |filter, directive| filter.add_directive(directive))
    }

    fn make_writer(&self) -> BoxMakeWriter {
        match &self.sink {
            Sink::Stdout => BoxMakeWriter::new(std::io::stdout),
            Sink::Stderr => BoxMakeWriter::new(std::io::stderr),
            Sink::File(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new("."));
                let name = path
                    .file_name()
                    .map_or_else(|| DEFAULT_LOG_FILE.into(), |name| name.to_os_string());
                BoxMakeWriter::new(tracing_appender::rolling::never(dir, name))
            }
        }
    }

    fn fmt_layer(&self, writer: BoxMakeWriter) -> BoxedLayer {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_span_events(self.spans.clone())
            .with_thread_ids(self.thread_ids)
            .with_file(self.file_location)
            .with_line_number(self.file_location);

        match self.format {
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Full => layer.boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            #[cfg(feature = "json-log")]
            LogFormat::Json => layer.json().boxed(),
        }
    }
}

fn span_events(config: &SpanEventConfig) -> FmtSpan {
    [
        (config.new, FmtSpan::NEW),
        (config.enter, FmtSpan::ENTER),
        (config.exit, FmtSpan::EXIT),
        (config.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |spans, (_, flag)| spans | flag)
}
