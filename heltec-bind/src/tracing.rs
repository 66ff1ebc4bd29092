//! Tracing setup for the binding daemon.
//!
//! Call [`init_journald_or_stdout`] once at startup; the rest of the
//! crate pulls the level macros from [`prelude`].
//!
//! Under systemd the daemon logs straight to the journal, which already
//! stamps and tags each record. Anywhere else it prints to stdout with a
//! short local timestamp, honoring RUST_LOG and defaulting to INFO so
//! the per-device attach/detach lines are visible out of the box.

use std::env;
use time::OffsetDateTime;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{format::Writer, time::FormatTime},
    prelude::*,
};

pub mod prelude {
    #[allow(unused_imports)]
    pub use tracing::{debug, error, info, trace, warn};
}

use prelude::*;

/// Install the global subscriber: journald under systemd, stdout
/// otherwise.
pub fn init_journald_or_stdout() {
    // systemd sets JOURNAL_STREAM for units whose output is journal-connected
    if env::var_os("JOURNAL_STREAM").is_some() {
        match tracing_journald::layer() {
            Ok(layer) => {
                tracing_subscriber::registry().with(layer).init();
                return;
            }
            Err(e) => {
                init_stdout();
                warn!("Journald unavailable ({e}), logging to stdout.");
                return;
            }
        }
    }
    init_stdout();
}

fn init_stdout() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_timer(HmsTimer))
        .init();
}

// Wall-clock seconds in local time are plenty for a hotplug log.
struct HmsTimer;

impl FormatTime for HmsTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let stamp = now
            .format(time::macros::format_description!(
                "[hour]:[minute]:[second]"
            ))
            .map_err(|_| std::fmt::Error)?;
        write!(w, "{stamp}")
    }
}
