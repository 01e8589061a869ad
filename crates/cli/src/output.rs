//! Result envelope printed by every command.

use clap::ValueEnum;
use keel::HostError;
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text
	#[default]
	Text,
	/// One JSON envelope per invocation
	Json,
}

/// The result envelope returned by all commands.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
}

#[derive(Debug, Serialize)]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
}

/// Standardized error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	InvalidInput,
	NotFound,
	UnsupportedSessionType,
	ServiceError,
	NotImplemented,
	IoError,
	ConfigError,
}

impl ErrorCode {
	pub fn for_error(err: &CliError) -> Self {
		match err {
			CliError::Host(host) => match host {
				HostError::MissingCollaborator { .. } => ErrorCode::ConfigError,
				HostError::UnsupportedSessionType(_) => ErrorCode::UnsupportedSessionType,
				HostError::NoServiceForSessionType(_) | HostError::Service(_) => ErrorCode::ServiceError,
				HostError::SessionNotFound(_) | HostError::UnknownProfile(_) | HostError::UnknownIdp(_) => {
					ErrorCode::NotFound
				}
				HostError::NotImplemented(_) => ErrorCode::NotImplemented,
				HostError::Io(_) => ErrorCode::IoError,
			},
			CliError::Descriptor(_) | CliError::InvalidInput(_) => ErrorCode::InvalidInput,
			CliError::Store { .. } => ErrorCode::ConfigError,
			CliError::Io(_) | CliError::Json(_) => ErrorCode::IoError,
		}
	}
}

impl CommandResult {
	pub fn success(command: &str, data: Value) -> Self {
		Self {
			ok: true,
			command: command.to_string(),
			data: Some(data),
			error: None,
		}
	}

	pub fn failure(command: &str, err: &CliError) -> Self {
		Self {
			ok: false,
			command: command.to_string(),
			data: None,
			error: Some(CommandError {
				code: ErrorCode::for_error(err),
				message: err.to_string(),
			}),
		}
	}

	/// Prints the result: the envelope on stdout for JSON, plain text otherwise.
	pub fn print(&self, format: OutputFormat) {
		match format {
			OutputFormat::Json => match serde_json::to_string(self) {
				Ok(json) => println!("{json}"),
				Err(err) => eprintln!("error: failed to serialize result: {err}"),
			},
			OutputFormat::Text => match (&self.data, &self.error) {
				(_, Some(error)) => eprintln!("error[{}]: {}", code_name(error.code), error.message),
				(Some(data), None) => print_text(data),
				(None, None) => {}
			},
		}
	}
}

fn code_name(code: ErrorCode) -> String {
	serde_json::to_value(code)
		.ok()
		.and_then(|v| v.as_str().map(str::to_string))
		.unwrap_or_default()
}

fn print_text(data: &Value) {
	match data {
		Value::Null => {}
		Value::String(s) => println!("{s}"),
		Value::Object(map) if map.values().all(|v| !v.is_object() && !v.is_array()) => {
			for (key, value) in map {
				match value {
					Value::String(s) => println!("{key}: {s}"),
					other => println!("{key}: {other}"),
				}
			}
		}
		other => match serde_json::to_string_pretty(other) {
			Ok(pretty) => println!("{pretty}"),
			Err(_) => println!("{other}"),
		},
	}
}
