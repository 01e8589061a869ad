//! Plugin host environment for cloud credential sessions.
//!
//! [`HostEnvironment`] is the facade handed to plugins. It binds its I/O
//! collaborators once, according to the [`DeploymentForm`], and dispatches
//! session mutations to the per-type [`SessionService`] resolved through a
//! [`SessionServiceRegistry`].
//!
//! ```ignore
//! let host = HostEnvironment::new(DeploymentForm::Cli, config)?;
//! let descriptor: SessionDescriptor = AwsIamUserSessionData::new("dev", key, secret, "eu-west-1", profile_id)?.into();
//! let session_id = host.create_session(&descriptor).await?;
//! ```

pub mod action_bar;
pub mod binding;
pub mod error;
pub mod host;
pub mod plugin;
pub mod service;

pub use action_bar::{ActionBar, BarAction, SelectedSessionActions};
pub use binding::{DeploymentBinding, DeploymentForm, HostConfig};
pub use error::{HostError, Result};
pub use host::HostEnvironment;
pub use keel_protocol as protocol;
pub use keel_runtime as runtime;
pub use plugin::PluginEnvironment;
pub use service::{SessionRepository, SessionService, SessionServiceRegistry, StaticServiceRegistry};
