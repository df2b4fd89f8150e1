//! Logger sink that forwards entries to `tracing`

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    logging::{LogEntry, LogLevel, LoggerSink},
};

/// Forwards [`LogEntry`] values to the process-wide `tracing` subscriber.
///
/// Structured fields are rendered as a single `fields` value since their
/// names are only known at runtime.
#[derive(Debug, Clone)]
pub struct TracingLoggerSink {
    min_level: LogLevel,
}

impl TracingLoggerSink {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Trace,
        }
    }

    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Default for TracingLoggerSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoggerSink for TracingLoggerSink {
    async fn log(&self, entry: LogEntry) -> Result<()> {
        if entry.level < self.min_level {
            return Ok(());
        }

        let mut fields: Vec<_> = entry.fields.iter().collect();
        fields.sort();
        let fields = fields
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        let target = entry.target.as_str();
        let message = entry.message.as_str();

        match entry.level {
            LogLevel::Trace => tracing::trace!(sink_target = target, fields = %fields, "{message}"),
            LogLevel::Debug => tracing::debug!(sink_target = target, fields = %fields, "{message}"),
            LogLevel::Info => tracing::info!(sink_target = target, fields = %fields, "{message}"),
            LogLevel::Warn => tracing::warn!(sink_target = target, fields = %fields, "{message}"),
            LogLevel::Error => tracing::error!(sink_target = target, fields = %fields, "{message}"),
        }

        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_every_level() {
        let sink = TracingLoggerSink::new();
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            let entry = LogEntry::new(level, "app", "Saved classroom").with_field("data", "{}");
            assert!(sink.log(entry).await.is_ok());
        }
    }

    #[test]
    fn reports_configured_min_level() {
        assert_eq!(
            TracingLoggerSink::with_min_level(LogLevel::Warn).min_level(),
            LogLevel::Warn
        );
    }
}
