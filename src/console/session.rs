//! Console session: everything the byte receiver and the worker share.
//!
//! One `Session` per serial port. The receiver feeds it bytes; the worker
//! records submitted lines and ends responses. Both go through a
//! [`SharedState`](crate::sync::SharedState) so neither touches the fields
//! without exclusive access.

use heapless::Vec;

use super::ansi;
use super::escape::{EscapeEvent, EscapeState};
use super::history::{self, History, HistoryCursor};
use super::line_buffer::{Line, LineBuffer};
use crate::config::ECHO_SIZE;

/// ASCII backspace.
pub const BACKSPACE: u8 = 0x08;
/// ASCII delete, sent by most terminals for the backspace key.
pub const DELETE: u8 = 0x7F;

/// Bytes to send back for one input byte, exactly as they go on the wire.
pub type EchoBuf = Vec<u8, ECHO_SIZE>;

/// Outcome of feeding one byte.
#[derive(Debug, PartialEq, Eq)]
pub enum Feed {
    /// Keep collecting.
    Pending,
    /// CR LF seen; the terminator is already stripped.
    Submit(Line),
    /// The byte did not fit and the whole line was discarded.
    Overflow,
}

/// Console state machine
#[derive(Debug, Default)]
pub struct Session {
    line: LineBuffer,
    escape: EscapeState,
    history: History,
    cursor: HistoryCursor,
}

impl Session {
    /// Create new session
    pub const fn new() -> Self {
        Self {
            line: LineBuffer::new(),
            escape: EscapeState::Idle,
            history: History::new(),
            cursor: None,
        }
    }

    /// Process a single input byte, collecting its echo in `out`.
    pub fn feed(&mut self, byte: u8, out: &mut EchoBuf) -> Feed {
        let (next, event) = self.escape.step(byte);
        self.escape = next;

        match event {
            EscapeEvent::Swallow => Feed::Pending,
            EscapeEvent::HistoryOlder => {
                if let Some(c) = history::older(self.cursor, &self.history) {
                    self.cursor = Some(c);
                    self.render(out);
                }
                Feed::Pending
            }
            EscapeEvent::HistoryNewer => {
                if let Some(c) = history::newer(self.cursor) {
                    self.cursor = c;
                    self.render(out);
                }
                Feed::Pending
            }
            EscapeEvent::Data(BACKSPACE | DELETE) => {
                if self.line.backspace() {
                    put(out, ansi::BACKSPACE_ECHO.as_bytes());
                }
                Feed::Pending
            }
            EscapeEvent::Data(b) => {
                put(out, &[b]);
                if !self.line.push(b) {
                    return Feed::Overflow;
                }
                match self.line.take_terminated() {
                    Some(line) => Feed::Submit(line),
                    None => Feed::Pending,
                }
            }
        }
    }

    /// Copy the entry under the cursor into the line buffer and redraw it
    /// after the saved prompt position.
    fn render(&mut self, out: &mut EchoBuf) {
        match self.cursor.and_then(|c| self.history.get(c)) {
            Some(entry) => self.line.set(entry),
            None => self.line.clear(),
        }

        put(out, ansi::RESTORE_CURSOR.as_bytes());
        put(out, ansi::CLEAR_SCREEN_END.as_bytes());
        put(out, self.line.as_bytes());
    }

    /// Record a submitted line. Empty lines are not kept.
    pub fn record(&mut self, line: &[u8]) {
        if !line.is_empty() {
            self.history.push(line);
        }
    }

    /// Return to live editing after a response has been sent.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Current line buffer.
    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// Submitted lines.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Current history position.
    pub fn cursor(&self) -> HistoryCursor {
        self.cursor
    }
}

/// Append to the echo. `ECHO_SIZE` covers the largest redraw.
fn put(out: &mut EchoBuf, bytes: &[u8]) {
    let _ = out.extend_from_slice(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Everything echoed so far.
    #[derive(Default)]
    struct Wire(std::vec::Vec<u8>);

    fn feed_all(session: &mut Session, bytes: &[u8], wire: &mut Wire) -> Option<Line> {
        let mut submitted = None;
        for &b in bytes {
            let mut echo = EchoBuf::new();
            if let Feed::Submit(line) = session.feed(b, &mut echo) {
                submitted = Some(line);
            }
            wire.0.extend_from_slice(&echo);
        }
        submitted
    }

    #[test]
    fn test_submit_strips_crlf() {
        let mut session = Session::new();
        let mut out = Wire::default();

        let line = feed_all(&mut session, b"freq\r\n", &mut out).unwrap();
        assert_eq!(&line[..], b"freq");
        assert!(session.line().is_empty());
        assert_eq!(out.0, b"freq\r\n");
    }

    #[test]
    fn test_lone_cr_does_not_submit() {
        let mut session = Session::new();
        let mut out = Wire::default();

        assert!(feed_all(&mut session, b"freq\r", &mut out).is_none());
        assert_eq!(session.line().as_bytes(), b"freq\r");
    }

    #[test]
    fn test_backspace_echo() {
        let mut session = Session::new();
        let mut out = Wire::default();

        feed_all(&mut session, b"ab\x7f", &mut out);
        assert_eq!(session.line().as_str(), "a");
        assert!(out.0.ends_with(ansi::BACKSPACE_ECHO.as_bytes()));
    }

    #[test]
    fn test_backspace_on_empty_is_silent() {
        let mut session = Session::new();
        let mut out = Wire::default();

        feed_all(&mut session, b"\x08\x08", &mut out);
        assert_eq!(session.line().len(), 0);
        assert!(out.0.is_empty());
    }

    #[test]
    fn test_escape_bytes_not_echoed() {
        let mut session = Session::new();
        let mut out = Wire::default();

        feed_all(&mut session, b"\x1b[C", &mut out);
        assert!(out.0.is_empty());
        assert!(session.line().is_empty());
    }

    #[test]
    fn test_down_on_live_line_is_noop() {
        let mut session = Session::new();
        let mut out = Wire::default();

        feed_all(&mut session, b"ab\x1b[B", &mut out);
        assert_eq!(session.line().as_str(), "ab");
        assert_eq!(session.cursor(), None);
    }

    #[test]
    fn test_recall_then_edit() {
        let mut session = Session::new();
        let mut out = Wire::default();
        session.record(b"power 10");

        feed_all(&mut session, b"\x1b[A", &mut out);
        assert_eq!(session.cursor(), Some(0));
        assert!(out.0.ends_with(b"\x1b[u\x1b[Jpower 10"));

        let line = feed_all(&mut session, b"\x7f2\r\n", &mut out).unwrap();
        assert_eq!(&line[..], b"power 12");
    }

    #[test]
    fn test_down_past_newest_clears_line() {
        let mut session = Session::new();
        let mut out = Wire::default();
        session.record(b"crc on");

        feed_all(&mut session, b"\x1b[A\x1b[B", &mut out);
        assert_eq!(session.cursor(), None);
        assert!(session.line().is_empty());
    }

    #[test]
    fn test_high_byte_echoed_verbatim() {
        let mut session = Session::new();
        let mut out = Wire::default();

        feed_all(&mut session, &[0xB5], &mut out);
        assert_eq!(out.0, [0xB5u8]);
        assert_eq!(session.line().as_bytes(), [0xB5u8]);
    }

    #[test]
    fn test_recall_of_non_utf8_entry_is_verbatim() {
        let mut session = Session::new();
        let mut out = Wire::default();
        session.record(&[b't', 0xB5, 0xFF]);

        feed_all(&mut session, b"\x1b[A", &mut out);
        assert_eq!(out.0, b"\x1b[u\x1b[Jt\xb5\xff");
    }

    #[test]
    fn test_full_redraw_fits_echo() {
        let mut session = Session::new();
        let mut out = Wire::default();
        session.record(&[b'x'; crate::config::LINE_SIZE]);

        feed_all(&mut session, b"\x1b[A", &mut out);
        assert_eq!(out.0.len(), 6 + crate::config::LINE_SIZE);
    }
}
