use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::conf::Log;
use crate::erx::{Erx, Layouted, PreL4, ResultEX};

/// Discard is a writer that discards all data written to it.
struct Discard;

impl std::io::Write for Discard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

static LOG_WORKER_GUARDS: OnceLock<Vec<WorkerGuard>> = OnceLock::new();

/// Install the global subscriber: console and/or daily rolling file, filtered by `log.level`.
/// Only the first call installs anything.
pub fn logging_initialize(app_name: &str, log_conf: &Log) -> ResultEX {
    if LOG_WORKER_GUARDS.get().is_some() {
        return Ok(());
    }

    let (nonblocking, discard_guard) = tracing_appender::non_blocking(Discard {});
    let (console, console_reload) =
        tracing_subscriber::reload::Layer::new(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(nonblocking.clone()));

    let (persist, persist_reload) =
        tracing_subscriber::reload::Layer::new(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(nonblocking));

    let mut guards: Vec<WorkerGuard> = vec![discard_guard];
    if log_conf.console {
        let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);
        console_reload
            .reload(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(true))
            .map_err(crate::erx::amp("console reload failed"))?;
    }

    let logs_dir = log_conf.dirs.trim();
    if !logs_dir.is_empty() {
        if !std::path::Path::new(logs_dir).is_dir() {
            return Err(Erx::coded(Layouted::conf(PreL4::COMM.four(), "0010"), &format!("log dir is not a directory: {}", logs_dir)));
        }
        let prefix = format!("{}_portal.log", app_name);

        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(logs_dir, prefix));

        guards.push(guard);
        persist_reload
            .reload(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
            .map_err(crate::erx::amp("persist reload failed"))?;
    }

    let filter = tracing_subscriber::EnvFilter::try_new(log_conf.level.as_str())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(console)
        .with(persist)
        .with(filter)
        .try_init()
        .map_err(crate::erx::amp("tracing subscriber already set"))?;

    let _ = LOG_WORKER_GUARDS.set(guards);
    Ok(())
}
