//! Tracing setup for portalctl CLI
//!
//! Console logging goes to stderr so it never interleaves with menu tables
//! on stdout. A second layer captures PostgreSQL notices for the enrollment
//! flow, with its own filter so `RUST_LOG` cannot switch it off.
//!
//! Usage:
//!   portalctl --debug ...               # Debug logging to console
//!   RUST_LOG=portalctl_core=debug ...   # Fine-grained log control

use anyhow::{anyhow, Result};
use portalctl_core::db::{notice_filter, NoticeBuffer, NoticeLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    pub debug: bool,
}

/// Console filter: `RUST_LOG` wins, otherwise warn (or debug with --debug).
///
/// Notices are shown through the menu, so the console layer always skips them.
pub fn console_filter(config: &TracingConfig) -> EnvFilter {
    console_filter_from(config, std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

fn console_filter_from(config: &TracingConfig, rust_log: Option<&str>) -> EnvFilter {
    let default = if config.debug { "debug" } else { "warn" };
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default));
    filter.add_directive(NOTICES_OFF.parse().expect("valid directive"))
}

const NOTICES_OFF: &str = "sqlx::postgres::notice=off";

/// Install the global subscriber.
pub fn init(config: &TracingConfig, notices: NoticeBuffer) -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .with_filter(console_filter(config));

    let notice_layer = NoticeLayer::new(notices).with_filter(notice_filter());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(notice_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
}
