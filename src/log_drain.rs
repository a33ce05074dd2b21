//! Log output.
//!
//! Drains a [`LogStream`] into any text sink. The firmware points it at the
//! debug UART, the host simulator at stderr. Runs in task context only.

use core::fmt::Write;

use crate::logging::{LogEntry, LogStream};

/// Format log entry.
///
/// Format: `[timestamp_us] LEVEL: message\r\n`
pub fn format_log_entry(entry: &LogEntry, out: &mut dyn Write) -> core::fmt::Result {
    write!(
        out,
        "[{:10}] {}: {}\r\n",
        entry.timestamp_us,
        entry.level.as_str(),
        entry.text()
    )
}

/// Write every pending entry of `stream` to `out`, then report (and reset)
/// the dropped counter if it is non-zero.
///
/// Returns the number of entries written.
pub fn drain_to<const N: usize>(stream: &LogStream<N>, out: &mut dyn Write) -> usize {
    let mut written = 0;
    while let Some(entry) = stream.drain() {
        let _ = format_log_entry(&entry, out);
        written += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let _ = write!(out, "[WARN] Dropped log messages: {}\r\n", dropped);
        stream.reset_dropped();
    }

    written
}
