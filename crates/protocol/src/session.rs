//! Session type tags and the stored session record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::request::CreateSessionRequest;

/// Provider and auth-mode tag of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
	AwsIamUser,
	AwsIamRoleFederated,
	AwsIamRoleChained,
	AwsSsoRole,
	Azure,
}

impl SessionType {
	/// Every session type, in declaration order.
	pub const ALL: [SessionType; 5] = [
		SessionType::AwsIamUser,
		SessionType::AwsIamRoleFederated,
		SessionType::AwsIamRoleChained,
		SessionType::AwsSsoRole,
		SessionType::Azure,
	];

	/// Returns `true` for sessions provisioned through an integration (AWS SSO, Azure).
	///
	/// These cannot be created or updated through the plugin surface.
	pub fn is_integration_managed(self) -> bool {
		matches!(self, SessionType::AwsSsoRole | SessionType::Azure)
	}

	/// Returns `true` when plugins may create or update sessions of this type.
	pub fn is_creatable(self) -> bool {
		!self.is_integration_managed()
	}

	/// Returns `true` for the AWS session family.
	pub fn is_aws(self) -> bool {
		!matches!(self, SessionType::Azure)
	}

	/// Stable wire name, matching the serde representation.
	pub fn as_str(self) -> &'static str {
		match self {
			SessionType::AwsIamUser => "awsIamUser",
			SessionType::AwsIamRoleFederated => "awsIamRoleFederated",
			SessionType::AwsIamRoleChained => "awsIamRoleChained",
			SessionType::AwsSsoRole => "awsSsoRole",
			SessionType::Azure => "azure",
		}
	}
}

impl fmt::Display for SessionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Lifecycle state of a session's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
	#[default]
	Inactive,
	Pending,
	Active,
}

/// A stored session.
///
/// The host only reads [`Session::session_id`] and [`Session::session_type`];
/// the remaining fields belong to the repository and the per-type services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
	pub session_id: String,
	pub session_name: String,
	pub session_type: SessionType,
	#[serde(default)]
	pub status: SessionStatus,
	pub region: String,
	#[serde(default)]
	pub profile_id: Option<String>,
	/// Request the session was last created or updated from.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub request: Option<CreateSessionRequest>,
}

impl Session {
	/// Builds an inactive session record from a create request.
	pub fn from_request(session_id: impl Into<String>, request: CreateSessionRequest) -> Self {
		Self {
			session_id: session_id.into(),
			session_name: request.session_name().to_string(),
			session_type: request.session_type(),
			status: SessionStatus::Inactive,
			region: request.region().to_string(),
			profile_id: Some(request.profile_id().to_string()),
			request: Some(request),
		}
	}

	/// Returns `true` while credentials are live or being generated.
	pub fn is_running(&self) -> bool {
		matches!(self.status, SessionStatus::Active | SessionStatus::Pending)
	}
}
