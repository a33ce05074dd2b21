//! Escape sequence recognizer for arrow keys.
//!
//! Only `ESC [ A` (up) and `ESC [ B` (down) mean anything. Every other
//! sequence, complete or not, is swallowed so stray bytes never reach the
//! line buffer.

/// ASCII escape.
pub const ESC: u8 = 0x1B;
/// Final byte of the cursor-up report.
pub const CURSOR_UP: u8 = b'A';
/// Final byte of the cursor-down report.
pub const CURSOR_DOWN: u8 = b'B';

/// Parser state between bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EscapeState {
    #[default]
    Idle,
    /// Got ESC
    SawEsc,
    /// Got ESC [
    SawBracket,
}

/// What the receiver should do with the byte it just fed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EscapeEvent {
    /// Ordinary input byte.
    Data(u8),
    /// Part of (or the end of) an escape sequence with no effect.
    Swallow,
    /// Up arrow.
    HistoryOlder,
    /// Down arrow.
    HistoryNewer,
}

impl EscapeState {
    /// Transition table.
    pub const fn step(self, byte: u8) -> (EscapeState, EscapeEvent) {
        match (self, byte) {
            (EscapeState::Idle, ESC) => (EscapeState::SawEsc, EscapeEvent::Swallow),
            (EscapeState::Idle, b) => (EscapeState::Idle, EscapeEvent::Data(b)),
            (EscapeState::SawEsc, b'[') => (EscapeState::SawBracket, EscapeEvent::Swallow),
            (EscapeState::SawEsc, _) => (EscapeState::Idle, EscapeEvent::Swallow),
            (EscapeState::SawBracket, CURSOR_UP) => (EscapeState::Idle, EscapeEvent::HistoryOlder),
            (EscapeState::SawBracket, CURSOR_DOWN) => (EscapeState::Idle, EscapeEvent::HistoryNewer),
            (EscapeState::SawBracket, _) => (EscapeState::Idle, EscapeEvent::Swallow),
        }
    }
}
