//! ANSI control sequences emitted by the console.

use core::fmt::Write;

/// Save cursor position.
pub const SAVE_CURSOR: &str = "\x1b[s";
/// Restore saved cursor position.
pub const RESTORE_CURSOR: &str = "\x1b[u";
/// Clear from cursor to end of line.
pub const CLEAR_LINE_END: &str = "\x1b[K";
/// Clear from cursor to end of screen.
pub const CLEAR_SCREEN_END: &str = "\x1b[J";
/// Clear the whole screen and home the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
/// Echo for an accepted backspace.
pub const BACKSPACE_ECHO: &str = "\x08\x1b[K";

/// Write raw bytes into a text response. Bytes that are not UTF-8 are
/// shown as the matching Latin-1 characters.
pub fn write_bytes(out: &mut dyn Write, bytes: &[u8]) {
    match core::str::from_utf8(bytes) {
        Ok(s) => {
            let _ = out.write_str(s);
        }
        Err(_) => {
            for &b in bytes {
                let _ = out.write_char(b as char);
            }
        }
    }
}
