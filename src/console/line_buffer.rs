//! Line buffer for console input

use heapless::Vec;

use crate::config::LINE_SIZE;

/// A completed command line, copied by value into the command queue.
pub type Line = Vec<u8, LINE_SIZE>;

/// Line input buffer
///
/// Capacity is fixed. A push into a full buffer discards everything typed so
/// far, so a truncated line is never submitted.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Line,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Push a byte.
    ///
    /// Returns `false` if the buffer was full; the buffer is then cleared and
    /// `c` is dropped.
    pub fn push(&mut self, c: u8) -> bool {
        if self.buf.push(c).is_err() {
            self.buf.clear();
            return false;
        }
        true
    }

    /// Remove last byte. Returns `false` on an empty buffer.
    pub fn backspace(&mut self) -> bool {
        self.buf.pop().is_some()
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Replace the contents, truncating to capacity.
    pub fn set(&mut self, bytes: &[u8]) {
        let copy_len = bytes.len().min(LINE_SIZE);
        self.buf.clear();
        // Cannot fail: copy_len <= LINE_SIZE.
        let _ = self.buf.extend_from_slice(&bytes[..copy_len]);
    }

    /// If the buffer ends in CR LF, take the line before it and clear.
    pub fn take_terminated(&mut self) -> Option<Line> {
        if !self.buf.ends_with(b"\r\n") {
            return None;
        }
        let len = self.buf.len() - 2;
        self.buf.truncate(len);
        let line = self.buf.clone();
        self.buf.clear();
        Some(line)
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf).unwrap_or("")
    }

    /// Get buffer length
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}
