//! Data types for the keel session host.
//!
//! This crate contains the serde-serializable types shared between the host
//! facade, its collaborators and the plugins that drive it. These types
//! represent the "model layer" - sessions, create requests, descriptors and
//! log entries as they are stored and exchanged.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond construction-time validation and serialization
//! * Closed: Session types and descriptor variants are enums, not open hierarchies
//! * Stable: Changes only when the persisted workspace format changes
//!
//! Dispatch and I/O are built on top of these types in `keel-rs`.

pub mod descriptor;
pub mod log;
pub mod request;
pub mod session;
pub mod types;

pub use descriptor::*;
pub use log::*;
pub use request::*;
pub use session::*;
pub use types::*;
