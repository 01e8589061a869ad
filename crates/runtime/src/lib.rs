//! I/O collaborators bound into a keel host environment.
//!
//! Each concern is a trait with one implementation per deployment form where
//! the forms differ:
//!
//! * [`NativeIo`] - HTTP fetch ([`DesktopNative`], [`CliNative`])
//! * [`ExternalUrlOpener`] - browser launch ([`WindowService`], [`CliWebConsole`])
//! * [`TerminalLauncher`] - shell commands ([`SystemTerminal`])
//! * [`LogSink`] - log entries ([`TracingLogSink`])

pub mod error;
pub mod native;
pub mod opener;
pub mod platform;
pub mod sink;
pub mod terminal;

pub use error::{IoError, Result, SinkError};
pub use native::{CliNative, DesktopNative, FetchResponse, NativeIo};
pub use opener::{CliWebConsole, ExternalUrlOpener, WindowService};
pub use sink::{LogSink, TracingLogSink};
pub use terminal::{SystemTerminal, TerminalLauncher};
