//! The host environment handed to plugins.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use keel_protocol::{CredentialsBundle, HostId, LogSource, LoggedEntry, PluginLogLevel, Session, SessionData, SessionType};
use keel_runtime::{FetchResponse, LogSink, TerminalLauncher};
use tracing::{debug, warn};

use crate::binding::{DeploymentBinding, DeploymentForm, HostConfig};
use crate::error::{HostError, Result};
use crate::plugin::PluginEnvironment;
use crate::service::{SessionRepository, SessionService, SessionServiceRegistry};

static NEXT_HOST_ID: AtomicU64 = AtomicU64::new(1);

/// Facade that plugins use to reach the application's session services.
///
/// Holds no mutable state after construction; every call is independent and
/// concurrent calls are not serialized.
pub struct HostEnvironment {
	id: HostId,
	binding: DeploymentBinding,
	log_sink: Arc<dyn LogSink>,
	registry: Arc<dyn SessionServiceRegistry>,
	repository: Arc<dyn SessionRepository>,
	terminal: Option<Arc<dyn TerminalLauncher>>,
}

impl HostEnvironment {
	/// Binds the collaborators for `form` and validates `config`.
	///
	/// # Errors
	///
	/// Returns [`HostError::MissingCollaborator`] when `config` lacks the
	/// log sink, registry, repository, or the native-I/O/URL-opener pair
	/// required by `form`.
	pub fn new(form: DeploymentForm, config: HostConfig) -> Result<Self> {
		let binding = DeploymentBinding::resolve(form, &config)?;
		let missing = |collaborator| HostError::MissingCollaborator { form, collaborator };

		let host = Self {
			id: HostId(NEXT_HOST_ID.fetch_add(1, Ordering::Relaxed)),
			binding,
			log_sink: config.log_sink.ok_or_else(|| missing("log_sink"))?,
			registry: config.registry.ok_or_else(|| missing("registry"))?,
			repository: config.repository.ok_or_else(|| missing("repository"))?,
			terminal: config.terminal,
		};
		debug!(target: "keel.host", id = %host.id, %form, terminal = host.terminal.is_some(), "host environment ready");
		Ok(host)
	}

	pub fn id(&self) -> HostId {
		self.id
	}

	pub fn form(&self) -> DeploymentForm {
		self.binding.form()
	}

	/// Issues credentials for a stored session through its type's service.
	///
	/// Host-side only: not part of [`PluginEnvironment`].
	pub async fn generate_credentials(&self, session_id: &str) -> Result<CredentialsBundle> {
		let session = self.session(session_id)?;
		let service = self.service_for(session.session_type)?;
		service.generate_credentials(&session.session_id).await.map_err(HostError::Service)
	}

	fn session(&self, session_id: &str) -> Result<Session> {
		self.repository
			.get_session(session_id)
			.ok_or_else(|| HostError::SessionNotFound(session_id.to_string()))
	}

	fn service_for(&self, session_type: SessionType) -> Result<Arc<dyn SessionService>> {
		self.registry
			.get_service_for_type(session_type)
			.ok_or(HostError::NoServiceForSessionType(session_type))
	}
}

fn ensure_creatable(session_type: SessionType) -> Result<()> {
	if session_type.is_integration_managed() {
		return Err(HostError::UnsupportedSessionType(session_type));
	}
	Ok(())
}

#[async_trait]
impl PluginEnvironment for HostEnvironment {
	fn log(&self, message: &str, level: PluginLogLevel, display: bool) {
		let entry = LoggedEntry::new(message, LogSource::Host(self.id), level.into(), display);
		if let Err(err) = self.log_sink.log(entry) {
			warn!(target: "keel.host", id = %self.id, error = %err, "log sink failed; entry dropped");
		}
	}

	async fn fetch(&self, url: &str) -> Result<FetchResponse> {
		Ok(self.binding.native().fetch(url).await?)
	}

	fn open_external_url(&self, url: &str) -> Result<()> {
		Ok(self.binding.url_opener().open_external_url(url)?)
	}

	async fn create_session(&self, descriptor: &dyn SessionData) -> Result<String> {
		let session_type = descriptor.session_type();
		ensure_creatable(session_type)?;
		let service = self.service_for(session_type)?;
		let request = descriptor.build_create_request();

		debug!(target: "keel.host", id = %self.id, %session_type, "dispatching create");
		service.create(request).await.map_err(HostError::Service)
	}

	async fn clone_session(&self, session_id: &str) -> Result<String> {
		let session = self.session(session_id)?;
		let service = self.service_for(session.session_type)?;
		let request = service.get_clone_request(&session).map_err(HostError::Service)?;

		debug!(target: "keel.host", id = %self.id, %session_id, session_type = %session.session_type, "dispatching clone");
		service.create(request).await.map_err(HostError::Service)
	}

	async fn update_session(&self, descriptor: &dyn SessionData, session_id: &str) -> Result<()> {
		let session_type = descriptor.session_type();
		ensure_creatable(session_type)?;
		let service = self.service_for(session_type)?;
		self.session(session_id)?;
		let request = descriptor.build_create_request();

		debug!(target: "keel.host", id = %self.id, %session_id, %session_type, "dispatching update");
		service.update(session_id, request).await.map_err(HostError::Service)
	}

	async fn open_terminal(&self, command: &str, env: Option<&HashMap<String, String>>) -> Result<()> {
		let Some(terminal) = &self.terminal else {
			return Err(HostError::NotImplemented("open_terminal"));
		};
		let empty = HashMap::new();
		Ok(terminal.open_terminal(command, env.unwrap_or(&empty)).await?)
	}

	fn resolve_profile_id_by_name(&self, name: &str) -> Result<String> {
		self.repository
			.profile_id_by_name(name)
			.ok_or_else(|| HostError::UnknownProfile(name.to_string()))
	}

	fn resolve_idp_id_by_url(&self, url: &str) -> Result<String> {
		self.repository.idp_id_by_url(url).ok_or_else(|| HostError::UnknownIdp(url.to_string()))
	}
}

impl std::fmt::Debug for HostEnvironment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HostEnvironment")
			.field("id", &self.id)
			.field("form", &self.form())
			.field("terminal", &self.terminal.is_some())
			.finish_non_exhaustive()
	}
}
