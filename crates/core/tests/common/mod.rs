//! Recording collaborators shared by the host integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use keel::protocol::{CreateSessionRequest, CredentialsBundle, LoggedEntry, Session, SessionData, SessionType};
use keel::runtime::{ExternalUrlOpener, FetchResponse, LogSink, NativeIo, SinkError, TerminalLauncher};
use keel::{DeploymentForm, HostConfig, HostEnvironment, SessionRepository, SessionService, SessionServiceRegistry};
use parking_lot::Mutex;

#[derive(Default)]
pub struct RecordingSink {
	pub entries: Mutex<Vec<LoggedEntry>>,
	pub fail: bool,
}

impl LogSink for RecordingSink {
	fn log(&self, entry: LoggedEntry) -> Result<(), SinkError> {
		if self.fail {
			return Err(SinkError("sink offline".into()));
		}
		self.entries.lock().push(entry);
		Ok(())
	}
}

#[derive(Default)]
pub struct RecordingNative {
	pub urls: Mutex<Vec<String>>,
}

#[async_trait]
impl NativeIo for RecordingNative {
	async fn fetch(&self, url: &str) -> keel::runtime::Result<FetchResponse> {
		self.urls.lock().push(url.to_string());
		Ok(FetchResponse {
			url: url.to_string(),
			status: 200,
			content_type: Some("text/plain".into()),
			body: "pong".into(),
		})
	}
}

#[derive(Default)]
pub struct RecordingOpener {
	pub urls: Mutex<Vec<String>>,
}

impl ExternalUrlOpener for RecordingOpener {
	fn open_external_url(&self, url: &str) -> keel::runtime::Result<()> {
		self.urls.lock().push(url.to_string());
		Ok(())
	}
}

#[derive(Default)]
pub struct RecordingTerminal {
	pub launches: Mutex<Vec<(String, HashMap<String, String>)>>,
}

#[async_trait]
impl TerminalLauncher for RecordingTerminal {
	async fn open_terminal(&self, command: &str, env: &HashMap<String, String>) -> keel::runtime::Result<()> {
		self.launches.lock().push((command.to_string(), env.clone()));
		Ok(())
	}
}

/// Service stub returning canned answers and recording every call.
#[derive(Default)]
pub struct StubService {
	pub next_id: String,
	pub create_error: Option<fn() -> anyhow::Error>,
	pub clone_request: Option<CreateSessionRequest>,
	pub credentials: Option<CredentialsBundle>,
	pub created: Mutex<Vec<CreateSessionRequest>>,
	pub cloned_from: Mutex<Vec<String>>,
	pub updated: Mutex<Vec<(String, CreateSessionRequest)>>,
}

impl StubService {
	pub fn returning(id: &str) -> Self {
		Self {
			next_id: id.to_string(),
			..Default::default()
		}
	}
}

#[async_trait]
impl SessionService for StubService {
	async fn create(&self, request: CreateSessionRequest) -> anyhow::Result<String> {
		self.created.lock().push(request);
		if let Some(make_error) = self.create_error {
			return Err(make_error());
		}
		Ok(self.next_id.clone())
	}

	fn get_clone_request(&self, session: &Session) -> anyhow::Result<CreateSessionRequest> {
		self.cloned_from.lock().push(session.session_id.clone());
		self.clone_request.clone().ok_or_else(|| anyhow::anyhow!("nothing to clone"))
	}

	async fn update(&self, session_id: &str, request: CreateSessionRequest) -> anyhow::Result<()> {
		self.updated.lock().push((session_id.to_string(), request));
		Ok(())
	}

	async fn generate_credentials(&self, session_id: &str) -> anyhow::Result<CredentialsBundle> {
		self.credentials
			.clone()
			.ok_or_else(|| anyhow::anyhow!("no credentials for `{session_id}`"))
	}
}

/// Registry that records every lookup.
#[derive(Default)]
pub struct RecordingRegistry {
	pub services: HashMap<SessionType, Arc<StubService>>,
	pub lookups: Mutex<Vec<SessionType>>,
}

impl RecordingRegistry {
	pub fn with(mut self, session_type: SessionType, service: Arc<StubService>) -> Self {
		self.services.insert(session_type, service);
		self
	}
}

impl SessionServiceRegistry for RecordingRegistry {
	fn get_service_for_type(&self, session_type: SessionType) -> Option<Arc<dyn SessionService>> {
		self.lookups.lock().push(session_type);
		self.services
			.get(&session_type)
			.map(|service| service.clone() as Arc<dyn SessionService>)
	}
}

#[derive(Default)]
pub struct MemoryRepository {
	pub sessions: HashMap<String, Session>,
	pub profiles: HashMap<String, String>,
	pub idps: HashMap<String, String>,
	pub reads: Mutex<Vec<String>>,
}

impl MemoryRepository {
	pub fn with_session(mut self, session: Session) -> Self {
		self.sessions.insert(session.session_id.clone(), session);
		self
	}
}

impl SessionRepository for MemoryRepository {
	fn get_session(&self, session_id: &str) -> Option<Session> {
		self.reads.lock().push(session_id.to_string());
		self.sessions.get(session_id).cloned()
	}

	fn profile_id_by_name(&self, name: &str) -> Option<String> {
		self.profiles.get(name).cloned()
	}

	fn idp_id_by_url(&self, url: &str) -> Option<String> {
		self.idps.get(url).cloned()
	}
}

/// Plugin-defined descriptor that can claim any session type.
pub struct ForeignDescriptor {
	pub session_type: SessionType,
	pub request: CreateSessionRequest,
	pub builds: AtomicUsize,
}

impl ForeignDescriptor {
	pub fn new(session_type: SessionType, request: CreateSessionRequest) -> Self {
		Self {
			session_type,
			request,
			builds: AtomicUsize::new(0),
		}
	}

	pub fn builds(&self) -> usize {
		self.builds.load(Ordering::SeqCst)
	}
}

impl SessionData for ForeignDescriptor {
	fn session_type(&self) -> SessionType {
		self.session_type
	}

	fn build_create_request(&self) -> CreateSessionRequest {
		self.builds.fetch_add(1, Ordering::SeqCst);
		self.request.clone()
	}
}

/// Every collaborator of a host, kept so tests can inspect them afterwards.
pub struct Harness {
	pub sink: Arc<RecordingSink>,
	pub registry: Arc<RecordingRegistry>,
	pub repository: Arc<MemoryRepository>,
	pub desktop_native: Arc<RecordingNative>,
	pub window: Arc<RecordingOpener>,
	pub cli_native: Arc<RecordingNative>,
	pub console: Arc<RecordingOpener>,
	pub terminal: Option<Arc<RecordingTerminal>>,
}

impl Harness {
	pub fn new(registry: RecordingRegistry, repository: MemoryRepository) -> Self {
		Self {
			sink: Arc::new(RecordingSink::default()),
			registry: Arc::new(registry),
			repository: Arc::new(repository),
			desktop_native: Arc::default(),
			window: Arc::default(),
			cli_native: Arc::default(),
			console: Arc::default(),
			terminal: None,
		}
	}

	pub fn with_sink(mut self, sink: RecordingSink) -> Self {
		self.sink = Arc::new(sink);
		self
	}

	pub fn with_terminal(mut self) -> Self {
		self.terminal = Some(Arc::default());
		self
	}

	pub fn config(&self) -> HostConfig {
		let config = HostConfig::builder()
			.with_log_sink(self.sink.clone())
			.with_registry(self.registry.clone())
			.with_repository(self.repository.clone())
			.with_desktop_native(self.desktop_native.clone())
			.with_window_service(self.window.clone())
			.with_cli_native(self.cli_native.clone())
			.with_cli_web_console(self.console.clone());
		match &self.terminal {
			Some(terminal) => config.with_terminal(terminal.clone()),
			None => config,
		}
	}

	pub fn host(&self, form: DeploymentForm) -> HostEnvironment {
		HostEnvironment::new(form, self.config()).unwrap()
	}
}
