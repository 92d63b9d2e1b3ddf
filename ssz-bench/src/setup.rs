use tracing_subscriber::EnvFilter;

/// JSON lines on stderr, `info` unless `RUST_LOG` says otherwise.
pub fn setup_logger() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_level(true)
        .with_line_number(true)
        .json()
        .init();
}
