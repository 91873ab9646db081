//! Tracing subscriber set-up.

use tracing::Level;

/// Map `-v` occurrences to a maximum log level. Warnings are always shown.
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install a stderr subscriber. Stdout is reserved for the generated URL.
pub fn init(verbose: u8) {
    // `try_init` so tests that drive the CLI in-process can call this repeatedly.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for_verbosity(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
