//! Structured logging configuration
//!
//! Logging is off unless a level is configured, through `PROMPTPAD_LOG_LEVEL`
//! or the `[log]` table of `config.toml`. Output goes to stderr, or to
//! `promptpad.log` in a log directory. The terminal UI always uses a file
//! since anything written to stderr would tear the screen.

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    fmt::{format::FmtSpan, MakeWriter},
    EnvFilter,
};

use crate::config::LogSettings;

/// File name used when logging to a directory
pub const LOG_FILE_NAME: &str = "promptpad.log";

/// Logging configuration for different environments
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
    /// Log file directory (None for stderr only)
    pub file_dir: Option<PathBuf>,
    pub colored: bool,
    /// Include source file and line
    pub with_location: bool,
    /// Emit span open/close events
    pub with_spans: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Pretty human-readable for development
    Pretty,
    /// Compact single-line format
    Compact,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "error".to_string(),
            format: LogFormat::Pretty,
            file_dir: None,
            colored: is_terminal::IsTerminal::is_terminal(&std::io::stderr()),
            with_location: false,
            with_spans: false,
        }
    }
}

impl LogConfig {
    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any variable source, `from_env` uses the process environment
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let level = var("PROMPTPAD_LOG_LEVEL")
            .or_else(|| var("LOG_LEVEL"))
            .unwrap_or_else(|| "error".to_string());

        let format = var("PROMPTPAD_LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(LogFormat::Pretty);

        let file_dir = var("PROMPTPAD_LOG_DIR").map(PathBuf::from);

        let colored = var("PROMPTPAD_LOG_COLOR")
            .map(|v| flag(&v))
            .unwrap_or_else(|| is_terminal::IsTerminal::is_terminal(&std::io::stderr()));

        let with_location = var("PROMPTPAD_LOG_LOCATION").map(|v| flag(&v)).unwrap_or(false);
        let with_spans = var("PROMPTPAD_LOG_SPANS").map(|v| flag(&v)).unwrap_or(false);

        Self {
            level,
            format,
            file_dir,
            colored,
            with_location,
            with_spans,
        }
    }

    /// Configuration to install, if any level is configured
    ///
    /// Environment variables win over the config file.
    pub fn resolve(settings: &LogSettings) -> Option<Self> {
        Self::resolve_with(settings, |key| env::var(key).ok())
    }

    pub fn resolve_with(
        settings: &LogSettings,
        var: impl Fn(&str) -> Option<String>,
    ) -> Option<Self> {
        let env_level = var("PROMPTPAD_LOG_LEVEL").is_some() || var("LOG_LEVEL").is_some();
        if !env_level && settings.level.is_none() {
            return None;
        }

        let env_format = var("PROMPTPAD_LOG_FORMAT").is_some();
        let mut config = Self::from_vars(var);
        if !env_level {
            if let Some(level) = &settings.level {
                config.level = level.clone();
            }
        }
        if !env_format {
            if let Some(format) = &settings.format {
                config.format = LogFormat::parse(format);
            }
        }
        if config.file_dir.is_none() {
            config.file_dir = settings.dir.as_deref().map(crate::config::expand_path);
        }
        Some(config)
    }
}

fn flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Initialize the global tracing subscriber
pub fn init_logging(config: LogConfig) -> Result<()> {
    match &config.file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            install(&config, appender, false)?;
        }
        None => install(&config, std::io::stderr, config.colored)?,
    }

    info!(
        level = %config.level,
        format = ?config.format,
        file_dir = ?config.file_dir,
        "Logging initialized"
    );
    Ok(())
}

fn install<W>(config: &LogConfig, writer: W, ansi: bool) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_new(&config.level)
        .or_else(|_| EnvFilter::try_new("error"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    let span_events = if config.with_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_span_events(span_events)
        .with_file(config.with_location)
        .with_line_number(config.with_location);

    let result = match config.format {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Pretty => subscriber.pretty().try_init(),
        LogFormat::Compact => subscriber.compact().try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize {:?} logging: {}", config.format, e))
}

/// Log storage operations for audit trail
pub fn log_storage_operation(
    operation: &str,
    prompt_count: Option<usize>,
    success: bool,
    duration_ms: Option<u64>,
) {
    let span = tracing::info_span!(
        "storage_operation",
        operation = operation,
        prompt_count = prompt_count,
        success = success,
        duration_ms = duration_ms
    );

    let _enter = span.enter();

    if success {
        debug!(
            operation = operation,
            prompt_count = prompt_count,
            duration_ms = duration_ms,
            "Storage operation completed"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Storage operation failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_log_config_from_vars() {
        let config = LogConfig::from_vars(vars(&[
            ("PROMPTPAD_LOG_LEVEL", "debug"),
            ("PROMPTPAD_LOG_FORMAT", "json"),
            ("PROMPTPAD_LOG_COLOR", "false"),
            ("PROMPTPAD_LOG_DIR", "/tmp/logs"),
        ]));
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file_dir, Some(PathBuf::from("/tmp/logs")));
        assert!(!config.colored);

        let defaults = LogConfig::from_vars(vars(&[]));
        assert_eq!(defaults.level, "error");
        assert_eq!(defaults.format, LogFormat::Pretty);
        assert!(defaults.file_dir.is_none());
    }

    #[test]
    fn test_env_wins_over_config_file() {
        let settings = LogSettings {
            level: Some("trace".to_string()),
            format: Some("compact".to_string()),
            dir: None,
        };

        let resolved = LogConfig::resolve_with(
            &settings,
            vars(&[("PROMPTPAD_LOG_LEVEL", "debug"), ("PROMPTPAD_LOG_FORMAT", "json")]),
        )
        .unwrap();
        assert_eq!(resolved.level, "debug");
        assert_eq!(resolved.format, LogFormat::Json);

        let from_file = LogConfig::resolve_with(&settings, vars(&[])).unwrap();
        assert_eq!(from_file.level, "trace");
        assert_eq!(from_file.format, LogFormat::Compact);
    }

    #[test]
    fn test_logging_stays_off_without_a_level() {
        assert!(LogConfig::resolve_with(&LogSettings::default(), vars(&[])).is_none());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_storage_operation_logging() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            log_storage_operation("load", Some(3), true, Some(2));
            log_storage_operation("save", Some(3), false, Some(5));
        });

        let output = captured.text();
        assert!(output.contains("DEBUG"));
        assert!(output.contains("Storage operation completed"));
        assert!(output.contains("WARN"));
        assert!(output.contains("Storage operation failed"));
        assert!(output.contains("duration_ms=5"));
    }
}
