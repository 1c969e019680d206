//! Logging utilities.
//!
//! Logger initialization lives here together with [`DiagnosticLevel`], the
//! runtime switch that decides whether recoverable misuse (an inert shader,
//! an unknown uniform name) is reported or silently ignored.

mod diagnostics;
mod init;

pub use diagnostics::{DiagnosticLevel, Diagnostics};
pub use init::{init_logging, LoggingConfig};
