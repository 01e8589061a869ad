//! Credential bundles and workspace lookup rows.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Credentials issued for a session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsBundle {
	pub access_key_id: String,
	pub secret_access_key: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_token: Option<String>,
	/// Expiry as unix seconds, when the credentials are temporary.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expiration: Option<u64>,
}

impl fmt::Debug for CredentialsBundle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CredentialsBundle")
			.field("access_key_id", &self.access_key_id)
			.field("secret_access_key", &"<redacted>")
			.field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
			.field("expiration", &self.expiration)
			.finish()
	}
}

/// Named AWS CLI profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsNamedProfile {
	pub id: String,
	pub name: String,
}

/// Identity-provider login URL used by federated sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdpUrl {
	pub id: String,
	pub url: String,
}
