//! Error type surfaced by the host facade.

use keel_protocol::SessionType;
use keel_runtime::IoError;
use thiserror::Error;

use crate::binding::DeploymentForm;

#[derive(Debug, Error)]
pub enum HostError {
	#[error("deployment form `{form}` requires collaborator `{collaborator}`")]
	MissingCollaborator { form: DeploymentForm, collaborator: &'static str },

	#[error("session type `{0}` is provisioned through an integration and cannot be created or updated by plugins")]
	UnsupportedSessionType(SessionType),

	#[error("no session service registered for `{0}`")]
	NoServiceForSessionType(SessionType),

	#[error("session `{0}` not found")]
	SessionNotFound(String),

	#[error("no named profile called `{0}`")]
	UnknownProfile(String),

	#[error("no identity provider URL `{0}`")]
	UnknownIdp(String),

	#[error("{0} is not implemented by this host")]
	NotImplemented(&'static str),

	#[error(transparent)]
	Io(#[from] IoError),

	/// Failure raised by a session service, passed through untouched.
	#[error(transparent)]
	Service(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HostError>;
