use std::path::PathBuf;

use keel::HostError;
use keel::protocol::DescriptorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Host(#[from] HostError),

	#[error("invalid session data: {0}")]
	Descriptor(#[from] DescriptorError),

	#[error("workspace file {path} is unreadable: {reason}")]
	Store { path: PathBuf, reason: String },

	#[error("{0}")]
	InvalidInput(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
