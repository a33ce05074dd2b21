//! Command registry and dispatch.
//!
//! The registry is a static, ordered table. Lookup is the first exact,
//! case-sensitive match on the command token, so registration order is both
//! the lookup order and the `help` listing order.
//!
//! A response may span several chunks. The worker calls
//! [`Dispatcher::dispatch`] with the same line until it returns `false`;
//! the dispatcher passes the chunk index to the handler through
//! [`Context::chunk`].

use core::fmt::Write;

use heapless::String;

use super::error::CommandError;
use super::parser::{count_args, split_command};
use crate::config::OUTPUT_SIZE;
use crate::radio::Radio;

/// One response chunk.
pub type Output = String<OUTPUT_SIZE>;

/// What a handler gets besides its arguments.
pub struct Context<'a> {
    pub radio: &'a mut dyn Radio,
    /// The registry the command was found in.
    pub commands: &'static [Command],
    /// 0 on the first call for a line, then 1, 2, ... while the handler
    /// keeps returning `Ok(true)`.
    pub chunk: usize,
}

/// Handler signature.
///
/// `Ok(true)` means more output is pending and the handler wants to be
/// called again.
pub type Handler = fn(&mut Context<'_>, &str, &mut Output) -> Result<bool, CommandError>;

/// Command descriptor
pub struct Command {
    pub name: &'static str,
    pub help: &'static str,
    pub handler: Handler,
    /// Expected argument count. Negative: any number.
    pub arity: i8,
}

impl Command {
    fn accepts(&self, args: &str) -> bool {
        match usize::try_from(self.arity) {
            Ok(expected) => count_args(args) == expected,
            Err(_) => true,
        }
    }
}

impl core::fmt::Debug for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Runs lines against a registry.
#[derive(Debug)]
pub struct Dispatcher {
    commands: &'static [Command],
    chunk: usize,
}

impl Dispatcher {
    pub const fn new(commands: &'static [Command]) -> Self {
        Self { commands, chunk: 0 }
    }

    /// First command named `name`.
    pub fn find(&self, name: &str) -> Option<&'static Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Produce the next response chunk for `line` into `out`.
    ///
    /// Returns `true` while more chunks are pending. Errors are rendered as
    /// text and end the response.
    pub fn dispatch(&mut self, line: &str, radio: &mut dyn Radio, out: &mut Output) -> bool {
        out.clear();

        let (name, args) = split_command(line);
        if name.is_empty() {
            self.chunk = 0;
            return false;
        }

        let result = match self.find(name) {
            None => Err(CommandError::UnknownCommand),
            Some(cmd) if !cmd.accepts(args) => Err(CommandError::InvalidArguments),
            Some(cmd) => {
                let mut ctx = Context {
                    radio,
                    commands: self.commands,
                    chunk: self.chunk,
                };
                (cmd.handler)(&mut ctx, args, out)
            }
        };

        let more = match result {
            Ok(more) => more,
            Err(e) => {
                out.clear();
                let _ = write!(out, "{}\r\n", e);
                false
            }
        };

        self.chunk = if more { self.chunk + 1 } else { 0 };
        more
    }
}
