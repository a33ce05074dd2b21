//! Byte receiver: the interrupt-side half of the console.
//!
//! Called once per received byte from the UART receive-complete handler.
//! Never blocks on the session. The caller re-arms reception after every
//! call, whatever happened to the byte.

use super::queue::LineProducer;
use super::session::{EchoBuf, Feed, Session};
use crate::config::ConsoleConfig;
use crate::log_globals::CLI_LOG_STREAM;
use crate::sync::{Notify, SharedState};
use crate::{cli_debug, cli_warn};

/// Byte sink for the echo. The wire is 8-bit: bytes go out unchanged.
pub trait Echo {
    fn write(&mut self, bytes: &[u8]);
}

#[cfg(any(test, feature = "std"))]
impl Echo for std::vec::Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Diagnostic hook toggled on every received byte (typically an LED).
pub trait ActivityIndicator {
    fn toggle(&mut self);
}

/// No indicator.
impl ActivityIndicator for () {
    fn toggle(&mut self) {}
}

/// Interrupt-side console state.
pub struct Receiver<'a, S, N, I = ()> {
    session: &'a S,
    queue: LineProducer<'a>,
    line_ready: N,
    indicator: I,
    clock: fn() -> i64,
    dropped_lines: u32,
    overflows: u32,
}

impl<'a, S, N> Receiver<'a, S, N>
where
    S: SharedState<Session>,
    N: Notify,
{
    /// `line_ready` is signalled after every successful put.
    pub fn new(session: &'a S, queue: LineProducer<'a>, line_ready: N, config: &ConsoleConfig) -> Self {
        Self {
            session,
            queue,
            line_ready,
            indicator: (),
            clock: config.clock,
            dropped_lines: 0,
            overflows: 0,
        }
    }
}

impl<'a, S, N, I> Receiver<'a, S, N, I>
where
    S: SharedState<Session>,
    N: Notify,
    I: ActivityIndicator,
{
    /// Attach an activity indicator.
    pub fn with_indicator<J: ActivityIndicator>(self, indicator: J) -> Receiver<'a, S, N, J> {
        Receiver {
            session: self.session,
            queue: self.queue,
            line_ready: self.line_ready,
            indicator,
            clock: self.clock,
            dropped_lines: self.dropped_lines,
            overflows: self.overflows,
        }
    }

    /// Handle one received byte. Echo goes to `echo` once the session is
    /// released.
    pub fn on_byte(&mut self, byte: u8, echo: &mut dyn Echo) {
        self.indicator.toggle();

        let mut pending = EchoBuf::new();
        let feed = self.session.with_mut(|s| s.feed(byte, &mut pending));
        if !pending.is_empty() {
            echo.write(&pending);
        }

        match feed {
            Feed::Pending => {}
            Feed::Overflow => {
                self.overflows = self.overflows.wrapping_add(1);
                cli_debug!(CLI_LOG_STREAM, (self.clock)(), "line buffer overflow, line discarded");
            }
            Feed::Submit(line) => {
                let len = line.len();
                match self.queue.enqueue(line) {
                    Ok(()) => self.line_ready.notify(),
                    Err(_) => {
                        self.dropped_lines = self.dropped_lines.wrapping_add(1);
                        cli_warn!(CLI_LOG_STREAM, (self.clock)(), "command queue full, {} byte line dropped", len);
                    }
                }
            }
        }
    }

    /// Lines lost to a full queue.
    pub fn dropped_lines(&self) -> u32 {
        self.dropped_lines
    }

    /// Lines lost to line buffer overflow.
    pub fn overflows(&self) -> u32 {
        self.overflows
    }
}
