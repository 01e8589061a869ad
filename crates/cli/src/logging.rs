use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Installs the stderr subscriber.
///
/// `-v` enables info, `-vv` and above debug; otherwise `RUST_LOG` applies,
/// falling back to `warn`.
pub fn init_logging(verbose: u8) {
	let filter = match verbose {
		0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		1 => EnvFilter::new("info"),
		_ => EnvFilter::new("debug,hyper=warn,h2=warn,reqwest=warn,rustls=warn"),
	};

	let _ = tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_filter(filter))
		.try_init();
}
