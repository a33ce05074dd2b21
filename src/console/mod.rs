//! Serial console for radio configuration
//!
//! Two halves joined by a bounded queue:
//! - [`Receiver`]: interrupt side, one byte at a time, line editing and
//!   history recall
//! - [`Worker`]: task side, dispatch and response streaming
//!
//! Zero heap allocation - all fixed-capacity buffers.

pub mod ansi;
pub mod commands;
pub mod error;
pub mod escape;
pub mod history;
pub mod line_buffer;
pub mod parser;
pub mod queue;
pub mod receiver;
pub mod registry;
pub mod session;
pub mod worker;

pub use commands::{command_names, COMMANDS};
pub use error::{CommandError, Parameter};
pub use escape::{EscapeEvent, EscapeState};
pub use history::{History, HistoryCursor};
pub use line_buffer::{Line, LineBuffer};
pub use queue::CommandQueue;
pub use receiver::{ActivityIndicator, Echo, Receiver};
pub use registry::{Command, Context, Dispatcher, Output};
pub use session::{EchoBuf, Feed, Session};
pub use worker::{Transmitter, Worker};
