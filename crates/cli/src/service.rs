//! Workspace-backed session services for the creatable AWS session types.

use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use keel::protocol::{CreateSessionRequest, CredentialsBundle, Session, SessionType};
use keel::{SessionRepository, SessionService, StaticServiceRegistry};
use tracing::info;

use crate::store::{WorkspaceStore, new_id};

const CLONE_SUFFIX: &str = " (copy)";

/// Stores sessions of one type in the workspace file.
#[derive(Debug)]
pub struct LocalSessionService {
	session_type: SessionType,
	store: Arc<WorkspaceStore>,
}

impl LocalSessionService {
	pub fn new(session_type: SessionType, store: Arc<WorkspaceStore>) -> Self {
		Self { session_type, store }
	}

	fn ensure_owned(&self, request: &CreateSessionRequest) -> anyhow::Result<()> {
		if request.session_type() != self.session_type {
			bail!(
				"{} service cannot handle a {} request",
				self.session_type,
				request.session_type()
			);
		}
		Ok(())
	}
}

#[async_trait]
impl SessionService for LocalSessionService {
	async fn create(&self, request: CreateSessionRequest) -> anyhow::Result<String> {
		self.ensure_owned(&request)?;
		if let CreateSessionRequest::AwsIamRoleChained(chained) = &request {
			if self.store.get_session(&chained.parent_session_id).is_none() {
				bail!("parent session `{}` not found", chained.parent_session_id);
			}
		}

		let session_id = new_id();
		self.store
			.insert_session(Session::from_request(&session_id, request))
			.context("failed to persist new session")?;
		info!(target: "keel.cli", %session_id, session_type = %self.session_type, "session created");
		Ok(session_id)
	}

	fn get_clone_request(&self, session: &Session) -> anyhow::Result<CreateSessionRequest> {
		let Some(request) = &session.request else {
			bail!("session `{}` has no stored configuration to clone", session.session_id);
		};
		let name = format!("{}{CLONE_SUFFIX}", session.session_name);
		Ok(request.clone().with_session_name(name).with_region(session.region.clone()))
	}

	async fn update(&self, session_id: &str, request: CreateSessionRequest) -> anyhow::Result<()> {
		self.ensure_owned(&request)?;
		let Some(existing) = self.store.get_session(session_id) else {
			bail!("session `{session_id}` not found");
		};
		if existing.session_type != self.session_type {
			bail!("session `{session_id}` is a {}, not a {}", existing.session_type, self.session_type);
		}
		self.store
			.replace_request(session_id, request)
			.context("failed to persist session update")?;
		info!(target: "keel.cli", %session_id, "session updated");
		Ok(())
	}

	async fn generate_credentials(&self, session_id: &str) -> anyhow::Result<CredentialsBundle> {
		let Some(session) = self.store.get_session(session_id) else {
			bail!("session `{session_id}` not found");
		};
		match session.request {
			Some(CreateSessionRequest::AwsIamUser(user)) => Ok(CredentialsBundle {
				access_key_id: user.access_key,
				secret_access_key: user.secret_key,
				session_token: None,
				expiration: None,
			}),
			Some(_) => bail!("{} credentials require an STS exchange, which this workspace cannot perform", self.session_type),
			None => bail!("session `{session_id}` has no stored configuration"),
		}
	}
}

/// Registry with a [`LocalSessionService`] for every creatable type.
pub fn local_registry(store: &Arc<WorkspaceStore>) -> StaticServiceRegistry {
	SessionType::ALL
		.into_iter()
		.filter(|t| t.is_creatable())
		.fold(StaticServiceRegistry::new(), |registry, session_type| {
			registry.with_service(session_type, Arc::new(LocalSessionService::new(session_type, store.clone())))
		})
}
