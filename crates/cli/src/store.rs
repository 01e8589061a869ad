//! JSON workspace file holding sessions, profiles and identity-provider URLs.
//!
//! The whole file is loaded into memory on start and written back after
//! every mutation. Mutations are staged on a copy and only replace the
//! in-memory state once the write succeeds. A missing file is an empty
//! workspace with a `default` profile.

use std::fs;
use std::path::{Path, PathBuf};

use keel::{HostError, SessionRepository};
use keel::protocol::{AwsNamedProfile, CreateSessionRequest, IdpUrl, Session, SessionStatus};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, Result};

const WORKSPACE_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_PROFILE_NAME: &str = "default";
/// Fixed so the seeded profile resolves to the same id before the file exists.
pub const DEFAULT_PROFILE_ID: &str = "default";

/// On-disk format of the workspace file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFile {
	pub schema: u32,
	#[serde(default)]
	pub sessions: Vec<Session>,
	#[serde(default)]
	pub profiles: Vec<AwsNamedProfile>,
	#[serde(default)]
	pub idp_urls: Vec<IdpUrl>,
	/// Ids of pinned sessions, in pin order.
	#[serde(default)]
	pub pinned: Vec<String>,
}

impl Default for WorkspaceFile {
	fn default() -> Self {
		Self {
			schema: WORKSPACE_SCHEMA_VERSION,
			sessions: Vec::new(),
			profiles: vec![AwsNamedProfile {
				id: DEFAULT_PROFILE_ID.to_string(),
				name: DEFAULT_PROFILE_NAME.to_string(),
			}],
			idp_urls: Vec::new(),
			pinned: Vec::new(),
		}
	}
}

pub fn new_id() -> String {
	uuid::Uuid::new_v4().to_string()
}

/// Default workspace location under the user's config directory.
pub fn default_workspace_path() -> PathBuf {
	dirs::config_dir()
		.unwrap_or_else(std::env::temp_dir)
		.join("keel")
		.join("workspace.json")
}

/// Shared, file-backed workspace.
#[derive(Debug)]
pub struct WorkspaceStore {
	path: PathBuf,
	file: Mutex<WorkspaceFile>,
}

impl WorkspaceStore {
	/// Loads `path`, treating a missing file as an empty workspace.
	pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let file = match fs::read_to_string(&path) {
			Ok(content) => serde_json::from_str(&content).map_err(|err| CliError::Store {
				path: path.clone(),
				reason: err.to_string(),
			})?,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => WorkspaceFile::default(),
			Err(err) => return Err(err.into()),
		};
		debug!(target: "keel.cli", path = %path.display(), "workspace loaded");
		Ok(Self {
			path,
			file: Mutex::new(file),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn write(&self, file: &WorkspaceFile) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)?;
		}
		let json = serde_json::to_string_pretty(file)?;
		fs::write(&self.path, json)?;
		Ok(())
	}

	/// Applies `edit` to a copy of the workspace, writes it, then commits it.
	fn commit<T>(&self, edit: impl FnOnce(&mut WorkspaceFile) -> Result<T>) -> Result<T> {
		let mut file = self.file.lock();
		let mut staged = file.clone();
		let value = edit(&mut staged)?;
		self.write(&staged)?;
		*file = staged;
		Ok(value)
	}

	pub fn sessions(&self) -> Vec<Session> {
		self.file.lock().sessions.clone()
	}

	pub fn profiles(&self) -> Vec<AwsNamedProfile> {
		self.file.lock().profiles.clone()
	}

	pub fn idp_urls(&self) -> Vec<IdpUrl> {
		self.file.lock().idp_urls.clone()
	}

	pub fn insert_session(&self, session: Session) -> Result<()> {
		self.commit(|file| {
			file.sessions.push(session);
			Ok(())
		})
	}

	/// Applies `edit` to the stored session and persists the result.
	pub fn modify_session(&self, session_id: &str, edit: impl FnOnce(&mut Session)) -> Result<Session> {
		self.commit(|file| {
			let session = file
				.sessions
				.iter_mut()
				.find(|s| s.session_id == session_id)
				.ok_or_else(|| CliError::from(HostError::SessionNotFound(session_id.to_string())))?;
			edit(session);
			Ok(session.clone())
		})
	}

	/// Replaces the request a session was built from, keeping id and status.
	pub fn replace_request(&self, session_id: &str, request: CreateSessionRequest) -> Result<Session> {
		self.modify_session(session_id, |session| {
			session.session_name = request.session_name().to_string();
			session.region = request.region().to_string();
			session.profile_id = Some(request.profile_id().to_string());
			session.request = Some(request);
		})
	}

	pub fn set_status(&self, session_id: &str, status: SessionStatus) -> Result<Session> {
		self.modify_session(session_id, |session| session.status = status)
	}

	pub fn remove_session(&self, session_id: &str) -> Result<()> {
		self.commit(|file| {
			let before = file.sessions.len();
			file.sessions.retain(|s| s.session_id != session_id);
			if file.sessions.len() == before {
				return Err(HostError::SessionNotFound(session_id.to_string()).into());
			}
			file.pinned.retain(|id| id != session_id);
			Ok(())
		})
	}

	pub fn is_pinned(&self, session_id: &str) -> bool {
		self.file.lock().pinned.iter().any(|id| id == session_id)
	}

	pub fn set_pinned(&self, session_id: &str, pinned: bool) -> Result<()> {
		self.commit(|file| {
			file.pinned.retain(|id| id != session_id);
			if pinned {
				file.pinned.push(session_id.to_string());
			}
			Ok(())
		})
	}

	/// Adds a named profile, or returns the id of the existing one.
	pub fn add_profile(&self, name: &str) -> Result<String> {
		let existing = self.file.lock().profiles.iter().find(|p| p.name == name).map(|p| p.id.clone());
		if let Some(id) = existing {
			return Ok(id);
		}
		self.commit(|file| {
			let id = new_id();
			file.profiles.push(AwsNamedProfile {
				id: id.clone(),
				name: name.to_string(),
			});
			Ok(id)
		})
	}

	/// Adds an identity-provider URL, or returns the id of the existing one.
	pub fn add_idp_url(&self, url: &str) -> Result<String> {
		let existing = self.file.lock().idp_urls.iter().find(|i| i.url == url).map(|i| i.id.clone());
		if let Some(id) = existing {
			return Ok(id);
		}
		self.commit(|file| {
			let id = new_id();
			file.idp_urls.push(IdpUrl {
				id: id.clone(),
				url: url.to_string(),
			});
			Ok(id)
		})
	}
}

impl SessionRepository for WorkspaceStore {
	fn get_session(&self, session_id: &str) -> Option<Session> {
		self.file.lock().sessions.iter().find(|s| s.session_id == session_id).cloned()
	}

	fn profile_id_by_name(&self, name: &str) -> Option<String> {
		self.file.lock().profiles.iter().find(|p| p.name == name).map(|p| p.id.clone())
	}

	fn idp_id_by_url(&self, url: &str) -> Option<String> {
		self.file.lock().idp_urls.iter().find(|i| i.url == url).map(|i| i.id.clone())
	}
}

#[cfg(test)]
mod tests {
	use keel::protocol::AwsIamUserSessionRequest;
	use tempfile::TempDir;

	use super::*;

	fn request(name: &str) -> CreateSessionRequest {
		CreateSessionRequest::AwsIamUser(AwsIamUserSessionRequest {
			session_name: name.into(),
			access_key: "AKIAEXAMPLE".into(),
			secret_key: "secret".into(),
			region: "eu-west-1".into(),
			mfa_device: None,
			profile_id: "p1".into(),
		})
	}

	#[test]
	fn missing_file_is_an_empty_workspace_with_default_profile() {
		let dir = TempDir::new().unwrap();
		let store = WorkspaceStore::load(dir.path().join("workspace.json")).unwrap();
		assert!(store.sessions().is_empty());
		assert!(store.profile_id_by_name(DEFAULT_PROFILE_NAME).is_some());
	}

	#[test]
	fn default_profile_id_is_stable_before_first_save() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("workspace.json");
		let first = WorkspaceStore::load(&path).unwrap().profile_id_by_name(DEFAULT_PROFILE_NAME);
		let second = WorkspaceStore::load(&path).unwrap().profile_id_by_name(DEFAULT_PROFILE_NAME);

		assert!(!path.exists());
		assert_eq!(first.as_deref(), Some(DEFAULT_PROFILE_ID));
		assert_eq!(first, second);
	}

	#[test]
	fn failed_write_leaves_memory_unchanged() {
		let dir = TempDir::new().unwrap();
		let blocked = dir.path().join("blocked");
		let store = WorkspaceStore::load(blocked.join("workspace.json")).unwrap();
		fs::write(&blocked, "not a directory").unwrap();

		assert!(store.insert_session(Session::from_request("s1", request("dev"))).is_err());
		assert!(store.add_profile("work").is_err());

		assert!(store.sessions().is_empty());
		assert!(store.profile_id_by_name("work").is_none());
	}

	#[test]
	fn malformed_file_is_reported() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("workspace.json");
		fs::write(&path, "{not json").unwrap();
		let err = WorkspaceStore::load(&path).unwrap_err();
		assert!(matches!(err, CliError::Store { .. }));
	}

	#[test]
	fn mutations_persist_across_loads() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("nested").join("workspace.json");
		let store = WorkspaceStore::load(&path).unwrap();
		store.insert_session(Session::from_request("s1", request("dev"))).unwrap();
		store.set_pinned("s1", true).unwrap();
		let work = store.add_profile("work").unwrap();
		assert_eq!(store.add_profile("work").unwrap(), work);

		let reloaded = WorkspaceStore::load(&path).unwrap();
		assert_eq!(reloaded.get_session("s1").unwrap().session_name, "dev");
		assert!(reloaded.is_pinned("s1"));
		assert_eq!(reloaded.profile_id_by_name("work"), Some(work));
	}

	#[test]
	fn replace_request_keeps_identity_and_status() {
		let dir = TempDir::new().unwrap();
		let store = WorkspaceStore::load(dir.path().join("workspace.json")).unwrap();
		store.insert_session(Session::from_request("s1", request("dev"))).unwrap();
		store.set_status("s1", SessionStatus::Active).unwrap();

		let updated = store.replace_request("s1", request("dev-renamed")).unwrap();

		assert_eq!(updated.session_id, "s1");
		assert_eq!(updated.session_name, "dev-renamed");
		assert_eq!(updated.status, SessionStatus::Active);
	}

	#[test]
	fn removing_a_session_unpins_it() {
		let dir = TempDir::new().unwrap();
		let store = WorkspaceStore::load(dir.path().join("workspace.json")).unwrap();
		store.insert_session(Session::from_request("s1", request("dev"))).unwrap();
		store.set_pinned("s1", true).unwrap();

		store.remove_session("s1").unwrap();

		assert!(store.get_session("s1").is_none());
		assert!(!store.is_pinned("s1"));
		assert!(store.remove_session("s1").is_err());
	}
}
