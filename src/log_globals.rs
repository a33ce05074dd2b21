//! Global log stream instance.
//!
//! Producers: the byte receiver and the console worker.
//! Consumer: whichever task drains logs to the debug output.

use crate::logging::LogStream;

/// Console log stream.
pub static CLI_LOG_STREAM: LogStream = LogStream::new();
