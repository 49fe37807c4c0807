//! Opt-in trace output for debugging compiles and lookups.
//!
//! With the `trace` feature off (the default) every `tracing` macro in the
//! crate compiles to nothing; with it on, call [`init_tracing`] once from
//! the host to stream JSON span and event lines into
//! `hatchery-trace.jsonl` under the given directory. The `RUST_LOG`
//! environment variable overrides the default `hatchery_core=debug`
//! filter.

#[cfg(feature = "trace")]
use std::path::Path;
#[cfg(feature = "trace")]
use std::sync::Once;

#[cfg(feature = "trace")]
static INIT: Once = Once::new();

#[cfg(feature = "trace")]
pub fn init_tracing(log_dir: &Path) {
    INIT.call_once(|| {
        let appender = tracing_appender::rolling::never(log_dir, "hatchery-trace.jsonl");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        // flushed on process exit; a compile is a batch job, not a daemon
        std::mem::forget(guard);

        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hatchery_core=debug"));
        tracing_subscriber::fmt()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .with_env_filter(filter)
            .init();
    });
}

#[cfg(not(feature = "trace"))]
pub fn init_tracing(_log_dir: &std::path::Path) {}
