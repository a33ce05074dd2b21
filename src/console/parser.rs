//! Command line splitting
//!
//! The first whitespace-delimited token selects the command. Everything after
//! it is handed to the handler as one raw string, so handlers like
//! `transmit` can keep embedded spaces.

/// Split a line into the command token and the raw argument string.
///
/// The argument string has leading whitespace removed and is empty when
/// there are no arguments.
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(char::is_whitespace) {
        Some(end) => (&line[..end], line[end..].trim_start()),
        None => (line, ""),
    }
}

/// Take the next token from `args`.
///
/// Returns the token and the remaining raw string, or `None` when `args`
/// holds only whitespace.
pub fn next_token(args: &str) -> Option<(&str, &str)> {
    let args = args.trim_start();
    if args.is_empty() {
        return None;
    }
    Some(split_command(args))
}

/// Number of whitespace-delimited arguments.
pub fn count_args(args: &str) -> usize {
    args.split_whitespace().count()
}

/// Parse an unsigned decimal argument.
pub fn parse_u32(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parse `on` / `off`.
pub fn parse_switch(token: &str) -> Option<bool> {
    match token {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}
