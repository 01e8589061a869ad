//! Log levels and entries handed to the logging sink.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical severity rungs, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Trace = 0,
	Debug = 1,
	Info = 2,
	Warn = 3,
	Error = 4,
}

impl LogLevel {
	pub const ALL: [LogLevel; 5] = [LogLevel::Trace, LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error];

	pub fn ordinal(self) -> u8 {
		self as u8
	}
}

/// Severity as seen by plugins. Same rungs and ordinals as [`LogLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginLogLevel {
	Trace = 0,
	Debug = 1,
	Info = 2,
	Warn = 3,
	Error = 4,
}

impl PluginLogLevel {
	pub const ALL: [PluginLogLevel; 5] = [
		PluginLogLevel::Trace,
		PluginLogLevel::Debug,
		PluginLogLevel::Info,
		PluginLogLevel::Warn,
		PluginLogLevel::Error,
	];

	pub fn ordinal(self) -> u8 {
		self as u8
	}
}

impl From<PluginLogLevel> for LogLevel {
	fn from(level: PluginLogLevel) -> Self {
		match level {
			PluginLogLevel::Trace => LogLevel::Trace,
			PluginLogLevel::Debug => LogLevel::Debug,
			PluginLogLevel::Info => LogLevel::Info,
			PluginLogLevel::Warn => LogLevel::Warn,
			PluginLogLevel::Error => LogLevel::Error,
		}
	}
}

/// Identifier of a host environment instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostId(pub u64);

impl fmt::Display for HostId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "host#{}", self.0)
	}
}

/// Originator of a log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum LogSource {
	/// A plugin-facing host environment.
	Host(HostId),
	/// Any other named component.
	Component(String),
}

impl fmt::Display for LogSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LogSource::Host(id) => id.fmt(f),
			LogSource::Component(name) => f.write_str(name),
		}
	}
}

/// Entry accepted by the logging sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEntry {
	pub message: String,
	pub source: LogSource,
	pub level: LogLevel,
	/// Whether the entry should also be surfaced to the operator.
	pub display: bool,
}

impl LoggedEntry {
	pub fn new(message: impl Into<String>, source: LogSource, level: LogLevel, display: bool) -> Self {
		Self {
			message: message.into(),
			source,
			level,
			display,
		}
	}
}
