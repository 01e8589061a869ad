//! Logging sink that forwards host entries to `tracing`.

use keel_protocol::{LogLevel, LoggedEntry};
use tracing::{debug, error, info, trace, warn};

use crate::error::SinkError;

/// Receives log entries from the host.
pub trait LogSink: Send + Sync {
	fn log(&self, entry: LoggedEntry) -> Result<(), SinkError>;
}

/// Emits each entry as a `tracing` event at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
	fn log(&self, entry: LoggedEntry) -> Result<(), SinkError> {
		let LoggedEntry {
			message,
			source,
			level,
			display: show,
		} = entry;

		match level {
			LogLevel::Trace => trace!(target: "keel.plugin", %source, display = show, "{message}"),
			LogLevel::Debug => debug!(target: "keel.plugin", %source, display = show, "{message}"),
			LogLevel::Info => info!(target: "keel.plugin", %source, display = show, "{message}"),
			LogLevel::Warn => warn!(target: "keel.plugin", %source, display = show, "{message}"),
			LogLevel::Error => error!(target: "keel.plugin", %source, display = show, "{message}"),
		}
		Ok(())
	}
}
