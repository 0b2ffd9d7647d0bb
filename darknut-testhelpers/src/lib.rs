//! Test setup for the darknut crates.
//!
//! Annotate tests with `#[darknut_testhelpers::test]` (or import it as
//! `test`) to get a tracing subscriber installed before the body runs.
//! Set `DARKNUT_LOG` to a target filter such as `darknut_core=trace` to
//! pick what gets printed.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use darknut_testhelpers_macros::test;

// lets the `test` macro's `::darknut_testhelpers::setup()` path resolve in this crate's own tests
#[cfg(test)]
extern crate self as darknut_testhelpers;

use std::sync::LazyLock;
use std::time::Instant;

use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "DARKNUT_LOG";

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Prints time since the first test started instead of wall-clock time.
struct Uptime;

impl FormatTime for Uptime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let elapsed = START_TIME.elapsed();
        write!(w, "{:4}.{:03}s", elapsed.as_secs(), elapsed.subsec_millis())
    }
}

fn filter() -> Targets {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| {
            Targets::new()
                .with_default(tracing::Level::WARN)
                .with_target("darknut_core", tracing::Level::TRACE)
        })
}

static SUBSCRIBER_INIT: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_timer(Uptime)
                .with_target(false)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .with(filter())
        .try_init()
        .ok();
});

/// Installs the global tracing subscriber, once per process.
///
/// Safe to call from every test; only the first call does anything.
pub fn setup() {
    LazyLock::force(&SUBSCRIBER_INIT);
}
