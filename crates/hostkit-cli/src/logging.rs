//! Tracing subscriber setup.

use hostkit_agent::LogFormat;
use tracing_subscriber::EnvFilter;

/// Initialize logging on stderr; stdout is reserved for host commands.
///
/// The filter comes from `HOSTKIT_LOG`, then `RUST_LOG`, then `info`.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_env("HOSTKIT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
