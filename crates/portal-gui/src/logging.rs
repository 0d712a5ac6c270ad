//! Logging setup.
//!
//! Defaults to `info` for the portal crates and `warn` for everything else.
//! `RUST_LOG` overrides the filter; `PORTAL_LOG_FORMAT=json` switches to
//! JSON lines.

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "PORTAL_LOG_FORMAT";

/// Install the global subscriber.
pub fn init() {
    let filter = build_env_filter();
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// Build an `EnvFilter`, respecting the `RUST_LOG` env var.
fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,portal_gui=info,portal_core=info,portal_backdrop=info")
    })
}
