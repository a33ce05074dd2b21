//! Module: config
//!
//! Purpose: Sizing constants and runtime options for the console.
//!
//! Every buffer in the console is fixed-capacity and sized here. Nothing
//! grows at runtime: when input exceeds a capacity it is dropped.

/// Line buffer capacity in bytes (including the CR LF terminator).
pub const LINE_SIZE: usize = 128;

/// Number of submitted lines kept for recall.
pub const HISTORY_SIZE: usize = 5;

/// Echo produced by one input byte: at most a full history redraw.
pub const ECHO_SIZE: usize = LINE_SIZE + 8;

/// Completed lines that may wait for the worker.
pub const QUEUE_DEPTH: usize = 5;

/// Capacity of one response chunk.
pub const OUTPUT_SIZE: usize = 128;

/// Largest radio payload; `transmit` accepts strictly fewer bytes.
pub const MAX_PAYLOAD: usize = 64;

/// Longest syncword the radio accepts.
pub const SYNCWORD_MAX_LEN: usize = 8;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Runtime console options.
#[derive(Clone, Copy, Debug)]
pub struct ConsoleConfig {
    /// Printed after every response.
    pub prompt: &'static str,
    /// Printed once when the console starts.
    pub banner: &'static str,
    /// Microsecond clock used to timestamp log entries.
    pub clock: fn() -> i64,
}

fn no_clock() -> i64 {
    0
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "> ",
            banner: VERSION,
            clock: no_clock,
        }
    }
}
