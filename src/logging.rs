use anyhow::Result;
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Initialize structured logging system
///
/// Console output goes to stderr so stdout stays free for progress lines and
/// the nickname prompt. The returned guard must be held until exit when a
/// log file is configured.
pub fn init_logging(log_level: Option<&str>, log_file: Option<&Path>, json: bool) -> Result<Option<WorkerGuard>> {
    // Set up environment filter
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = log_level.unwrap_or("info");
            EnvFilter::try_new(level)
        })
        .map_err(|e| anyhow::anyhow!("Failed to create log filter: {}", e))?;

    // Create registry
    let registry = Registry::default().with(env_filter);

    // Add console layer
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true);

    // Add file layer if log file is specified
    let guard = if let Some(log_path) = log_file {
        let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = log_path
            .file_name()
            .map_or_else(|| "pidgin-to-gajim.log".into(), |name| name.to_string_lossy().into_owned());
        let file_appender = rolling::daily(directory, file_name);
        let (non_blocking_appender, guard) = non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_appender)
            .with_ansi(false)
            .with_target(true);
        let file_layer = if json { file_layer.json().boxed() } else { file_layer.boxed() };

        registry.with(console_layer).with(file_layer).try_init()?;
        Some(guard)
    } else {
        registry.with(console_layer).try_init()?;
        None
    };

    info!("Logging system initialized");
    Ok(guard)
}

/// Performance timing utilities
pub struct OperationTimer {
    operation: String,
    start: std::time::Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: std::time::Instant::now(),
        }
    }

    pub fn finish(self) -> u128 {
        let duration = self.start.elapsed().as_millis();
        tracing::info!(
            operation = %self.operation,
            duration_ms = duration,
            "Operation completed"
        );
        duration
    }
}
