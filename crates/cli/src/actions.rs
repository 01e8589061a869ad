//! Selected-session actions backed by the workspace and the host facade.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use keel::protocol::{CredentialsBundle, Session, SessionData, SessionStatus, valid_region};
use keel::{HostEnvironment, HostError, PluginEnvironment, SelectedSessionActions};
use tracing::info;

use crate::error::CliError;
use crate::store::WorkspaceStore;

/// Console home page for `region`.
pub fn console_url(region: &str) -> String {
	format!("https://{region}.console.aws.amazon.com/console/home?region={region}")
}

/// Environment exported to commands run with a session's credentials.
pub fn credential_env(credentials: &CredentialsBundle, region: &str) -> HashMap<String, String> {
	let mut env = HashMap::from([
		("AWS_ACCESS_KEY_ID".to_string(), credentials.access_key_id.clone()),
		("AWS_SECRET_ACCESS_KEY".to_string(), credentials.secret_access_key.clone()),
		("AWS_DEFAULT_REGION".to_string(), region.to_string()),
		("AWS_REGION".to_string(), region.to_string()),
	]);
	if let Some(token) = &credentials.session_token {
		env.insert("AWS_SESSION_TOKEN".to_string(), token.clone());
	}
	env
}

pub struct LocalSessionActions {
	store: Arc<WorkspaceStore>,
	host: Arc<HostEnvironment>,
}

impl LocalSessionActions {
	pub fn new(store: Arc<WorkspaceStore>, host: Arc<HostEnvironment>) -> Self {
		Self { store, host }
	}
}

fn into_host_error(err: CliError) -> HostError {
	match err {
		CliError::Host(err) => err,
		other => HostError::Service(other.into()),
	}
}

#[async_trait]
impl SelectedSessionActions for LocalSessionActions {
	fn is_pinned(&self, session: &Session) -> bool {
		self.store.is_pinned(&session.session_id)
	}

	async fn start_session(&self, session: &Session) -> keel::Result<()> {
		self.store.set_status(&session.session_id, SessionStatus::Pending).map_err(into_host_error)?;
		if let Err(err) = self.host.generate_credentials(&session.session_id).await {
			self.store.set_status(&session.session_id, SessionStatus::Inactive).map_err(into_host_error)?;
			return Err(err);
		}
		self.store.set_status(&session.session_id, SessionStatus::Active).map_err(into_host_error)?;
		info!(target: "keel.cli", session_id = %session.session_id, "session started");
		Ok(())
	}

	async fn stop_session(&self, session: &Session) -> keel::Result<()> {
		self.store.set_status(&session.session_id, SessionStatus::Inactive).map_err(into_host_error)?;
		info!(target: "keel.cli", session_id = %session.session_id, "session stopped");
		Ok(())
	}

	async fn open_aws_web_console(&self, session: &Session) -> keel::Result<()> {
		self.host.open_external_url(&console_url(&session.region))
	}

	async fn change_region(&self, session: &Session, region: &str) -> keel::Result<()> {
		let region = valid_region(region.to_string()).map_err(|err| into_host_error(err.into()))?;
		self.store
			.modify_session(&session.session_id, |stored| {
				stored.request = stored.request.take().map(|request| request.with_region(region.as_str()));
				stored.region = region;
			})
			.map_err(into_host_error)?;
		Ok(())
	}

	async fn change_profile(&self, session: &Session, profile_id: &str) -> keel::Result<()> {
		self.store
			.modify_session(&session.session_id, |stored| {
				stored.profile_id = Some(profile_id.to_string());
				stored.request = stored.request.take().map(|request| request.with_profile_id(profile_id));
			})
			.map_err(into_host_error)?;
		Ok(())
	}

	async fn open_ssm(&self, session: &Session, instance_id: &str) -> keel::Result<()> {
		let credentials = self.host.generate_credentials(&session.session_id).await?;
		let command = format!("aws ssm start-session --target {instance_id} --region {}", session.region);
		let env = credential_env(&credentials, &session.region);
		self.host.open_terminal(&command, Some(&env)).await
	}

	async fn edit_session(&self, session: &Session, descriptor: &dyn SessionData) -> keel::Result<()> {
		self.host.update_session(descriptor, &session.session_id).await
	}

	async fn pin_session(&self, session: &Session) -> keel::Result<()> {
		self.store.set_pinned(&session.session_id, true).map_err(into_host_error)
	}

	async fn unpin_session(&self, session: &Session) -> keel::Result<()> {
		self.store.set_pinned(&session.session_id, false).map_err(into_host_error)
	}

	async fn delete_session(&self, session: &Session) -> keel::Result<()> {
		self.store.remove_session(&session.session_id).map_err(into_host_error)?;
		info!(target: "keel.cli", session_id = %session.session_id, "session deleted");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn console_url_targets_the_region() {
		assert_eq!(
			console_url("eu-west-1"),
			"https://eu-west-1.console.aws.amazon.com/console/home?region=eu-west-1"
		);
	}

	#[test]
	fn session_token_is_exported_only_when_present() {
		let mut credentials = CredentialsBundle {
			access_key_id: "AKIA".into(),
			secret_access_key: "secret".into(),
			session_token: None,
			expiration: None,
		};
		let env = credential_env(&credentials, "us-east-1");
		assert_eq!(env["AWS_REGION"], "us-east-1");
		assert!(!env.contains_key("AWS_SESSION_TOKEN"));

		credentials.session_token = Some("token".into());
		let env = credential_env(&credentials, "us-east-1");
		assert_eq!(env["AWS_SESSION_TOKEN"], "token");
	}
}
