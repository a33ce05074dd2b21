//! Console worker: the task-side half of the console.
//!
//! Takes completed lines off the queue, records them in history, runs them
//! through the [`Dispatcher`] and streams each response chunk to the
//! transmitter. A chunk is never started before the previous one has been
//! reported complete.

use core::fmt::Write;

use super::ansi;
use super::queue::LineConsumer;
use super::registry::{Command, Dispatcher, Output};
use super::session::Session;
use crate::cli_debug;
use crate::config::ConsoleConfig;
use crate::log_globals::CLI_LOG_STREAM;
use crate::radio::Radio;
use crate::sync::{Notify, SharedState};

/// Dispatched in place of a line that is not valid UTF-8.
const INVALID_LINE: &str = "\u{fffd}";

/// Serial transmit path.
pub trait Transmitter {
    /// Start sending `bytes`. Completion is reported by notifying the
    /// worker's `tx_done` (usually from the transmit-complete interrupt).
    fn start(&mut self, bytes: &[u8]);
}

/// Task-side console state.
pub struct Worker<'a, S, N, T, R> {
    session: &'a S,
    queue: LineConsumer<'a>,
    line_ready: N,
    tx_done: N,
    transmitter: T,
    radio: R,
    dispatcher: Dispatcher,
    config: ConsoleConfig,
    out: Output,
}

impl<'a, S, N, T, R> Worker<'a, S, N, T, R>
where
    S: SharedState<Session>,
    N: Notify,
    T: Transmitter,
    R: Radio,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: &'a S,
        queue: LineConsumer<'a>,
        line_ready: N,
        tx_done: N,
        transmitter: T,
        radio: R,
        commands: &'static [Command],
        config: ConsoleConfig,
    ) -> Self {
        Self {
            session,
            queue,
            line_ready,
            tx_done,
            transmitter,
            radio,
            dispatcher: Dispatcher::new(commands),
            config,
            out: Output::new(),
        }
    }

    /// Print the banner and the first prompt.
    pub fn start(&mut self) {
        self.out.clear();
        let _ = write!(self.out, "\r\n{}\r\n", self.config.banner);
        self.send_chunk();
        self.prompt();
    }

    /// Handle at most one queued line. Returns `false` if the queue was empty.
    pub fn service(&mut self) -> bool {
        match self.queue.dequeue() {
            Some(line) => {
                self.handle(&line);
                true
            }
            None => false,
        }
    }

    /// Serve lines forever, blocking while the queue is empty.
    pub fn run(&mut self) -> ! {
        self.start();
        loop {
            while self.service() {}
            self.line_ready.wait();
        }
    }

    fn handle(&mut self, line: &[u8]) {
        self.session.with_mut(|s| s.record(line));

        let text = core::str::from_utf8(line).unwrap_or(INVALID_LINE);
        if !text.is_empty() {
            cli_debug!(CLI_LOG_STREAM, (self.config.clock)(), "dispatch: {}", text);
        }

        loop {
            let more = self.dispatcher.dispatch(text, &mut self.radio, &mut self.out);
            if !self.out.is_empty() {
                self.send_chunk();
            }
            if !more {
                break;
            }
        }

        self.prompt();
        self.session.with_mut(|s| s.reset_cursor());
    }

    fn prompt(&mut self) {
        self.out.clear();
        let _ = self.out.push_str(self.config.prompt);
        let _ = self.out.push_str(ansi::SAVE_CURSOR);
        self.send_chunk();
    }

    fn send_chunk(&mut self) {
        self.transmitter.start(self.out.as_bytes());
        self.tx_done.wait();
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }
}
