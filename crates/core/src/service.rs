//! Contracts the host consumes from the surrounding application.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use keel_protocol::{CreateSessionRequest, CredentialsBundle, Session, SessionType};

/// Per-type session service. Owns every side effect of a session mutation.
#[async_trait]
pub trait SessionService: Send + Sync {
	/// Creates a session and returns its new id.
	async fn create(&self, request: CreateSessionRequest) -> anyhow::Result<String>;

	/// Builds a create request that duplicates `session`.
	///
	/// The service decides which fields carry over and which are regenerated.
	fn get_clone_request(&self, session: &Session) -> anyhow::Result<CreateSessionRequest>;

	/// Replaces the configuration of an existing session.
	async fn update(&self, session_id: &str, _request: CreateSessionRequest) -> anyhow::Result<()> {
		anyhow::bail!("session `{session_id}` cannot be updated through this service")
	}

	/// Issues credentials for a session.
	async fn generate_credentials(&self, session_id: &str) -> anyhow::Result<CredentialsBundle>;
}

/// Resolves the service responsible for a session type.
pub trait SessionServiceRegistry: Send + Sync {
	fn get_service_for_type(&self, session_type: SessionType) -> Option<Arc<dyn SessionService>>;
}

/// Read access to stored sessions and lookup tables.
pub trait SessionRepository: Send + Sync {
	fn get_session(&self, session_id: &str) -> Option<Session>;

	/// Internal id of the named profile called `name`.
	fn profile_id_by_name(&self, name: &str) -> Option<String>;

	/// Internal id of the identity-provider URL `url`.
	fn idp_id_by_url(&self, url: &str) -> Option<String>;
}

/// Map-backed registry populated at startup.
#[derive(Clone, Default)]
pub struct StaticServiceRegistry {
	services: HashMap<SessionType, Arc<dyn SessionService>>,
}

impl StaticServiceRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `service` for `session_type`, replacing any previous entry.
	pub fn with_service(mut self, session_type: SessionType, service: Arc<dyn SessionService>) -> Self {
		self.register(session_type, service);
		self
	}

	pub fn register(&mut self, session_type: SessionType, service: Arc<dyn SessionService>) {
		self.services.insert(session_type, service);
	}

	pub fn registered_types(&self) -> Vec<SessionType> {
		SessionType::ALL.into_iter().filter(|t| self.services.contains_key(t)).collect()
	}
}

impl SessionServiceRegistry for StaticServiceRegistry {
	fn get_service_for_type(&self, session_type: SessionType) -> Option<Arc<dyn SessionService>> {
		self.services.get(&session_type).cloned()
	}
}

impl std::fmt::Debug for StaticServiceRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StaticServiceRegistry").field("types", &self.registered_types()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct NullService;

	#[async_trait]
	impl SessionService for NullService {
		async fn create(&self, _request: CreateSessionRequest) -> anyhow::Result<String> {
			Ok("new".into())
		}

		fn get_clone_request(&self, session: &Session) -> anyhow::Result<CreateSessionRequest> {
			session.request.clone().ok_or_else(|| anyhow::anyhow!("no request"))
		}

		async fn generate_credentials(&self, _session_id: &str) -> anyhow::Result<CredentialsBundle> {
			anyhow::bail!("unsupported")
		}
	}

	#[test]
	fn registry_returns_only_registered_types() {
		let registry = StaticServiceRegistry::new().with_service(SessionType::AwsIamUser, Arc::new(NullService));
		assert!(registry.get_service_for_type(SessionType::AwsIamUser).is_some());
		assert!(registry.get_service_for_type(SessionType::Azure).is_none());
		assert_eq!(registry.registered_types(), vec![SessionType::AwsIamUser]);
	}

	#[tokio::test]
	async fn default_update_fails_explicitly() {
		let request = CreateSessionRequest::AwsIamUser(keel_protocol::AwsIamUserSessionRequest {
			session_name: "dev".into(),
			access_key: "AKIA".into(),
			secret_key: "s".into(),
			region: "eu-west-1".into(),
			mfa_device: None,
			profile_id: "p".into(),
		});
		let err = NullService.update("s1", request).await.unwrap_err();
		assert!(err.to_string().contains("cannot be updated"));
	}
}
