use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` sets the filter (default
/// `info`); `ACTION_ROUTER_LOG_JSON=1` switches to JSON lines. Output goes
/// to stderr. Calling this more than once is a no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let json = matches!(std::env::var("ACTION_ROUTER_LOG_JSON").as_deref(), Ok("1"));
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.pretty().try_init();
    }
}
