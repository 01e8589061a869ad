//! Plugin-supplied session descriptors.
//!
//! A descriptor carries exactly the data one creatable session type needs and
//! builds the matching [`CreateSessionRequest`]. Profile and identity-provider
//! fields hold internal ids, not the names a user sees; plugins resolve them
//! through the host's lookup helpers before constructing a descriptor.
//!
//! Sessions provisioned through integrations (AWS SSO, Azure) have no
//! descriptor variant.

use std::fmt;

use thiserror::Error;

use crate::request::{AwsIamRoleChainedSessionRequest, AwsIamRoleFederatedSessionRequest, AwsIamUserSessionRequest, CreateSessionRequest};
use crate::session::SessionType;

/// Validation failure raised while constructing a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
	#[error("descriptor field `{0}` must not be empty")]
	EmptyField(&'static str),
	#[error("descriptor field `{field}` is not a valid IAM ARN: {value}")]
	InvalidArn { field: &'static str, value: String },
	#[error("invalid AWS region: {0}")]
	InvalidRegion(String),
}

pub type DescriptorResult<T> = std::result::Result<T, DescriptorError>;

/// Capability set the host needs from a descriptor.
///
/// [`SessionDescriptor`] is the canonical implementation. Plugins may supply
/// their own; the host still validates the reported type before dispatch.
pub trait SessionData: Send + Sync {
	/// Session type this descriptor creates.
	fn session_type(&self) -> SessionType;

	/// Builds the create request for the matching service. Must be pure.
	fn build_create_request(&self) -> CreateSessionRequest;
}

/// Descriptor for an IAM user session.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsIamUserSessionData {
	session_name: String,
	access_key: String,
	secret_key: String,
	region: String,
	mfa_device: Option<String>,
	profile_id: String,
}

impl AwsIamUserSessionData {
	pub fn new(
		session_name: impl Into<String>,
		access_key: impl Into<String>,
		secret_key: impl Into<String>,
		region: impl Into<String>,
		profile_id: impl Into<String>,
	) -> DescriptorResult<Self> {
		Ok(Self {
			session_name: non_empty("session_name", session_name.into())?,
			access_key: non_empty("access_key", access_key.into())?,
			secret_key: non_empty("secret_key", secret_key.into())?,
			region: valid_region(region.into())?,
			mfa_device: None,
			profile_id: non_empty("profile_id", profile_id.into())?,
		})
	}

	/// Attaches an MFA device ARN.
	pub fn with_mfa_device(mut self, mfa_device: impl Into<String>) -> DescriptorResult<Self> {
		self.mfa_device = Some(valid_arn("mfa_device", mfa_device.into(), "mfa/")?);
		Ok(self)
	}

	pub fn session_name(&self) -> &str {
		&self.session_name
	}

	pub fn profile_id(&self) -> &str {
		&self.profile_id
	}
}

impl fmt::Debug for AwsIamUserSessionData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AwsIamUserSessionData")
			.field("session_name", &self.session_name)
			.field("access_key", &self.access_key)
			.field("secret_key", &"<redacted>")
			.field("region", &self.region)
			.field("mfa_device", &self.mfa_device)
			.field("profile_id", &self.profile_id)
			.finish()
	}
}

/// Descriptor for a role federated through a SAML identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsIamRoleFederatedSessionData {
	session_name: String,
	region: String,
	role_arn: String,
	idp_arn: String,
	idp_url_id: String,
	profile_id: String,
}

impl AwsIamRoleFederatedSessionData {
	pub fn new(
		session_name: impl Into<String>,
		region: impl Into<String>,
		role_arn: impl Into<String>,
		idp_arn: impl Into<String>,
		idp_url_id: impl Into<String>,
		profile_id: impl Into<String>,
	) -> DescriptorResult<Self> {
		Ok(Self {
			session_name: non_empty("session_name", session_name.into())?,
			region: valid_region(region.into())?,
			role_arn: valid_arn("role_arn", role_arn.into(), "role/")?,
			idp_arn: valid_arn("idp_arn", idp_arn.into(), "saml-provider/")?,
			idp_url_id: non_empty("idp_url_id", idp_url_id.into())?,
			profile_id: non_empty("profile_id", profile_id.into())?,
		})
	}

	pub fn session_name(&self) -> &str {
		&self.session_name
	}

	pub fn role_arn(&self) -> &str {
		&self.role_arn
	}
}

/// Descriptor for a role chained from a parent session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsIamRoleChainedSessionData {
	session_name: String,
	region: String,
	role_arn: String,
	role_session_name: Option<String>,
	parent_session_id: String,
	profile_id: String,
}

impl AwsIamRoleChainedSessionData {
	pub fn new(
		session_name: impl Into<String>,
		region: impl Into<String>,
		role_arn: impl Into<String>,
		parent_session_id: impl Into<String>,
		profile_id: impl Into<String>,
	) -> DescriptorResult<Self> {
		Ok(Self {
			session_name: non_empty("session_name", session_name.into())?,
			region: valid_region(region.into())?,
			role_arn: valid_arn("role_arn", role_arn.into(), "role/")?,
			role_session_name: None,
			parent_session_id: non_empty("parent_session_id", parent_session_id.into())?,
			profile_id: non_empty("profile_id", profile_id.into())?,
		})
	}

	/// Sets the `RoleSessionName` passed to the assume-role call.
	pub fn with_role_session_name(mut self, name: impl Into<String>) -> DescriptorResult<Self> {
		self.role_session_name = Some(non_empty("role_session_name", name.into())?);
		Ok(self)
	}

	pub fn parent_session_id(&self) -> &str {
		&self.parent_session_id
	}
}

/// Descriptor for one creatable session type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionDescriptor {
	AwsIamUser(AwsIamUserSessionData),
	AwsIamRoleFederated(AwsIamRoleFederatedSessionData),
	AwsIamRoleChained(AwsIamRoleChainedSessionData),
}

impl SessionData for SessionDescriptor {
	fn session_type(&self) -> SessionType {
		match self {
			SessionDescriptor::AwsIamUser(_) => SessionType::AwsIamUser,
			SessionDescriptor::AwsIamRoleFederated(_) => SessionType::AwsIamRoleFederated,
			SessionDescriptor::AwsIamRoleChained(_) => SessionType::AwsIamRoleChained,
		}
	}

	fn build_create_request(&self) -> CreateSessionRequest {
		match self {
			SessionDescriptor::AwsIamUser(d) => CreateSessionRequest::AwsIamUser(AwsIamUserSessionRequest {
				session_name: d.session_name.clone(),
				access_key: d.access_key.clone(),
				secret_key: d.secret_key.clone(),
				region: d.region.clone(),
				mfa_device: d.mfa_device.clone(),
				profile_id: d.profile_id.clone(),
			}),
			SessionDescriptor::AwsIamRoleFederated(d) => CreateSessionRequest::AwsIamRoleFederated(AwsIamRoleFederatedSessionRequest {
				session_name: d.session_name.clone(),
				region: d.region.clone(),
				role_arn: d.role_arn.clone(),
				idp_arn: d.idp_arn.clone(),
				idp_url: d.idp_url_id.clone(),
				profile_id: d.profile_id.clone(),
			}),
			SessionDescriptor::AwsIamRoleChained(d) => CreateSessionRequest::AwsIamRoleChained(AwsIamRoleChainedSessionRequest {
				session_name: d.session_name.clone(),
				region: d.region.clone(),
				role_arn: d.role_arn.clone(),
				role_session_name: d.role_session_name.clone(),
				parent_session_id: d.parent_session_id.clone(),
				profile_id: d.profile_id.clone(),
			}),
		}
	}
}

impl From<AwsIamUserSessionData> for SessionDescriptor {
	fn from(data: AwsIamUserSessionData) -> Self {
		SessionDescriptor::AwsIamUser(data)
	}
}

impl From<AwsIamRoleFederatedSessionData> for SessionDescriptor {
	fn from(data: AwsIamRoleFederatedSessionData) -> Self {
		SessionDescriptor::AwsIamRoleFederated(data)
	}
}

impl From<AwsIamRoleChainedSessionData> for SessionDescriptor {
	fn from(data: AwsIamRoleChainedSessionData) -> Self {
		SessionDescriptor::AwsIamRoleChained(data)
	}
}

fn non_empty(field: &'static str, value: String) -> DescriptorResult<String> {
	if value.trim().is_empty() {
		return Err(DescriptorError::EmptyField(field));
	}
	Ok(value)
}

const ARN_PARTITIONS: [&str; 3] = ["aws", "aws-cn", "aws-us-gov"];

// `arn:<partition>:iam::<account>:<kind><name>`, e.g. kind `role/`.
fn valid_arn(field: &'static str, value: String, kind: &str) -> DescriptorResult<String> {
	let value = non_empty(field, value)?;
	let well_formed = value
		.strip_prefix("arn:")
		.and_then(|rest| rest.split_once(':'))
		.filter(|(partition, _)| ARN_PARTITIONS.contains(partition))
		.and_then(|(_, rest)| rest.strip_prefix("iam::"))
		.and_then(|rest| rest.split_once(':'))
		.is_some_and(|(account, resource)| !account.is_empty() && resource.strip_prefix(kind).is_some_and(|name| !name.is_empty()));
	if !well_formed {
		return Err(DescriptorError::InvalidArn { field, value });
	}
	Ok(value)
}

/// Checks that `value` looks like an AWS region code such as `eu-west-1`.
pub fn valid_region(value: String) -> DescriptorResult<String> {
	let well_formed = value.split('-').count() >= 3
		&& value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
		&& value.ends_with(|c: char| c.is_ascii_digit());
	if !well_formed {
		return Err(DescriptorError::InvalidRegion(value));
	}
	Ok(value)
}
