pub fn logs_are_json() -> bool {
    matches!(std::env::var("SNARCHIVE_LOG_FORMAT").as_deref(), Ok("json"))
}

/// Initialize tracing according to RUST_LOG and SNARCHIVE_LOG_FORMAT.
/// - Defaults to `info` if `RUST_LOG` is unset
/// - `SNARCHIVE_LOG_FORMAT=json` switches to JSON lines
/// Logs go to stderr so stdout stays free for the result envelope.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let builder = tracing_subscriber::registry().with(filter);

    if logs_are_json() {
        let _ = builder.with(fmt_layer.json().flatten_event(true)).try_init();
    } else {
        let _ = builder.with(fmt_layer.compact()).try_init();
    }
}
