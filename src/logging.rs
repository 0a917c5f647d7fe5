//! Log output setup
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, Layer};

/// Install the global subscriber: a daily rolling file under `log_dir` and stdout, both at INFO.
///
/// The returned guard flushes the file writer when dropped, keep it alive until exit.
pub fn init(log_dir: &str) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, "log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(
                fmt::Layer::default()
                    .with_ansi(false)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(file_writer)
                    .with_filter(LevelFilter::INFO),
            )
            .with(
                fmt::Layer::default()
                    .with_ansi(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(std::io::stdout)
                    .with_filter(LevelFilter::INFO),
            ),
    )
    .expect("Failed to set global log subscriber");
    guard
}
