//! Create requests consumed by the per-type session services.

use serde::{Deserialize, Serialize};

use crate::session::SessionType;

/// Request for an IAM user session backed by long-lived access keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsIamUserSessionRequest {
	pub session_name: String,
	pub access_key: String,
	pub secret_key: String,
	pub region: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub mfa_device: Option<String>,
	pub profile_id: String,
}

/// Request for a role assumed through a SAML identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsIamRoleFederatedSessionRequest {
	pub session_name: String,
	pub region: String,
	pub role_arn: String,
	pub idp_arn: String,
	/// Internal id of the identity-provider URL, not the URL itself.
	pub idp_url: String,
	pub profile_id: String,
}

/// Request for a role assumed from another (parent) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsIamRoleChainedSessionRequest {
	pub session_name: String,
	pub region: String,
	pub role_arn: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role_session_name: Option<String>,
	pub parent_session_id: String,
	pub profile_id: String,
}

/// Service-specific create request, tagged by session type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "sessionType", rename_all = "camelCase")]
pub enum CreateSessionRequest {
	AwsIamUser(AwsIamUserSessionRequest),
	AwsIamRoleFederated(AwsIamRoleFederatedSessionRequest),
	AwsIamRoleChained(AwsIamRoleChainedSessionRequest),
}

impl CreateSessionRequest {
	/// Session type this request creates.
	pub fn session_type(&self) -> SessionType {
		match self {
			CreateSessionRequest::AwsIamUser(_) => SessionType::AwsIamUser,
			CreateSessionRequest::AwsIamRoleFederated(_) => SessionType::AwsIamRoleFederated,
			CreateSessionRequest::AwsIamRoleChained(_) => SessionType::AwsIamRoleChained,
		}
	}

	pub fn session_name(&self) -> &str {
		match self {
			CreateSessionRequest::AwsIamUser(r) => &r.session_name,
			CreateSessionRequest::AwsIamRoleFederated(r) => &r.session_name,
			CreateSessionRequest::AwsIamRoleChained(r) => &r.session_name,
		}
	}

	pub fn region(&self) -> &str {
		match self {
			CreateSessionRequest::AwsIamUser(r) => &r.region,
			CreateSessionRequest::AwsIamRoleFederated(r) => &r.region,
			CreateSessionRequest::AwsIamRoleChained(r) => &r.region,
		}
	}

	pub fn profile_id(&self) -> &str {
		match self {
			CreateSessionRequest::AwsIamUser(r) => &r.profile_id,
			CreateSessionRequest::AwsIamRoleFederated(r) => &r.profile_id,
			CreateSessionRequest::AwsIamRoleChained(r) => &r.profile_id,
		}
	}

	/// Returns a copy carrying a different session name.
	pub fn with_session_name(mut self, name: impl Into<String>) -> Self {
		let name = name.into();
		match &mut self {
			CreateSessionRequest::AwsIamUser(r) => r.session_name = name,
			CreateSessionRequest::AwsIamRoleFederated(r) => r.session_name = name,
			CreateSessionRequest::AwsIamRoleChained(r) => r.session_name = name,
		}
		self
	}

	/// Returns a copy targeting a different region.
	pub fn with_region(mut self, region: impl Into<String>) -> Self {
		let region = region.into();
		match &mut self {
			CreateSessionRequest::AwsIamUser(r) => r.region = region,
			CreateSessionRequest::AwsIamRoleFederated(r) => r.region = region,
			CreateSessionRequest::AwsIamRoleChained(r) => r.region = region,
		}
		self
	}

	/// Returns a copy bound to a different named profile.
	pub fn with_profile_id(mut self, profile_id: impl Into<String>) -> Self {
		let profile_id = profile_id.into();
		match &mut self {
			CreateSessionRequest::AwsIamUser(r) => r.profile_id = profile_id,
			CreateSessionRequest::AwsIamRoleFederated(r) => r.profile_id = profile_id,
			CreateSessionRequest::AwsIamRoleChained(r) => r.profile_id = profile_id,
		}
		self
	}
}
