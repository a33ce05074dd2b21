//! Command history with ring buffer
//!
//! Static allocation, 5 entries of 128 bytes each. Oldest entry is
//! evicted first.

use heapless::Vec;

use crate::config::{HISTORY_SIZE, LINE_SIZE};

/// One submitted line.
pub type HistoryEntry = Vec<u8, LINE_SIZE>;

/// Command history ring buffer
#[derive(Debug)]
pub struct History {
    /// Ring buffer of command lines
    entries: [HistoryEntry; HISTORY_SIZE],
    /// Slot of the oldest entry
    start: usize,
    /// Number of valid entries
    length: usize,
}

impl History {
    /// Create empty history
    pub const fn new() -> Self {
        const EMPTY: HistoryEntry = Vec::new();
        Self {
            entries: [EMPTY; HISTORY_SIZE],
            start: 0,
            length: 0,
        }
    }

    /// Push a new command into history, evicting the oldest when full.
    pub fn push(&mut self, line: &[u8]) {
        let len = line.len().min(LINE_SIZE);

        let slot = if self.length < HISTORY_SIZE {
            let slot = (self.start + self.length) % HISTORY_SIZE;
            self.length += 1;
            slot
        } else {
            let slot = self.start;
            self.start = (self.start + 1) % HISTORY_SIZE;
            slot
        };

        let entry = &mut self.entries[slot];
        entry.clear();
        let _ = entry.extend_from_slice(&line[..len]);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Entry at `cursor` (0 = newest). `None` past the oldest entry.
    pub fn get(&self, cursor: usize) -> Option<&[u8]> {
        if cursor >= self.length {
            return None;
        }
        let slot = ((self.length - cursor - 1) + self.start) % HISTORY_SIZE;
        Some(&self.entries[slot])
    }

    /// Iterate from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.length).filter_map(move |c| self.get(c))
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// Navigation position into [`History`].
///
/// `None` is the live line; `Some(0)` the newest entry, larger is older.
pub type HistoryCursor = Option<usize>;

/// Step `cursor` one entry older. Returns the new position, or `None` if
/// there is nothing older to show.
pub fn older(cursor: HistoryCursor, history: &History) -> Option<usize> {
    let next = cursor.map_or(0, |c| c + 1);
    (next < history.len().min(HISTORY_SIZE)).then_some(next)
}

/// Step `cursor` one entry newer. Returns `None` when already live,
/// `Some(None)` when stepping back onto the live line.
pub fn newer(cursor: HistoryCursor) -> Option<HistoryCursor> {
    match cursor {
        None => None,
        Some(0) => Some(None),
        Some(c) => Some(Some(c - 1)),
    }
}
