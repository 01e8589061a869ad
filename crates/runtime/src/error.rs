use thiserror::Error;

/// Failure raised by a native I/O, URL-opener or terminal collaborator.
#[derive(Debug, Error)]
pub enum IoError {
	#[error("invalid URL `{url}`: {reason}")]
	InvalidUrl { url: String, reason: String },

	#[error("failed to build HTTP client: {0}")]
	Client(#[source] reqwest::Error),

	#[error("HTTP request to {url} failed: {source}")]
	Http {
		url: String,
		#[source]
		source: reqwest::Error,
	},

	#[error("no system URL opener found; open {0} manually")]
	NoOpener(String),

	#[error("failed to spawn `{command}`: {source}")]
	Spawn {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("`{command}` exited with {status}")]
	CommandFailed { command: String, status: std::process::ExitStatus },

	#[error("failed to write to console: {0}")]
	Console(#[source] std::io::Error),
}

/// Failure raised by a logging sink.
#[derive(Debug, Error)]
#[error("log sink rejected entry: {0}")]
pub struct SinkError(pub String);

pub type Result<T> = std::result::Result<T, IoError>;
