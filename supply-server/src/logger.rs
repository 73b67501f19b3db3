//! Logging Infrastructure
//!
//! `RUST_LOG` drives the filter; `LOG_FORMAT=json` switches to JSON lines and
//! `LOG_DIR` (when the directory exists) routes output to a daily rolling file.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "supply_server=info,tower_http=info";

/// Initialize the global subscriber. Call once from `main`.
pub fn init_logger(json: bool, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    let dir = log_dir
        .map(Path::new)
        .filter(|p| p.exists())
        .and_then(|p| p.to_str());

    match (dir, json) {
        (Some(dir), true) => {
            let appender = tracing_appender::rolling::daily(dir, "supply-server");
            builder.json().with_writer(appender).init();
        }
        (Some(dir), false) => {
            let appender = tracing_appender::rolling::daily(dir, "supply-server");
            builder.with_ansi(false).with_writer(appender).init();
        }
        (None, true) => builder.json().init(),
        (None, false) => builder.init(),
    }
}
